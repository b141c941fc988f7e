//! Input events and the single queue that carries them.
//!
//! UI callbacks, timer firings and the translation-load completion all land
//! in one unbounded channel and are dispatched one at a time, so every
//! handler runs to completion before the next event is looked at.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::dom::NodeId;
use crate::i18n::{LoadError, TranslationTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    Other(String),
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Key {
        match name {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Deferred work posted back into the queue by a [`Schedule`](crate::timer::Schedule).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    IntroFallback,
    IntroTransition,
    /// Only the tick carrying the latest scroll generation is live.
    ScrollSettled { generation: u64 },
    PageTransitionScroll { target: NodeId },
    PageTransitionRelease,
}

#[derive(Debug)]
pub enum UiEvent {
    Click {
        target: NodeId,
    },
    KeyDown {
        key: Key,
        shift: bool,
        /// Focused element receiving the key, `None` for the document body.
        target: Option<NodeId>,
    },
    Scroll,
    Timer(TimerEvent),
    TranslationsLoaded(Result<TranslationTable, LoadError>),
}

/// Whether the browser's default action for an event should still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Default,
    Prevented,
}

impl Propagation {
    pub fn is_prevented(self) -> bool {
        self == Propagation::Prevented
    }
}

pub type EventSender = UnboundedSender<UiEvent>;
pub type EventReceiver = UnboundedReceiver<UiEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
