//! Intro gate: the full-screen overlay shown until the visitor enters.
//!
//! ```text
//! Pending --(activation | fallback timer)--> Closing --(transition delay)--> Closed
//! ```
//!
//! Only the first trigger moves the gate out of `Pending`; every later
//! trigger, including a fallback timer that was already queued when it got
//! cancelled, finds no transition and is ignored. `Closed` is terminal, so the
//! downstream effects run at most once per page load.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::dom::{selectors, Document, NodeId};
use crate::events::TimerEvent;
use crate::reveal;
use crate::timer::{Schedule, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Pending,
    Closing,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateInput {
    /// Pointer activation or accept key on the gate surface.
    Activated,
    FallbackElapsed,
    TransitionElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStep {
    BeginClosing,
    Finish,
}

/// Pure transition function. `None` means the input is a no-op.
pub fn transition(phase: GatePhase, input: GateInput) -> Option<(GatePhase, GateStep)> {
    match (phase, input) {
        (GatePhase::Pending, GateInput::Activated | GateInput::FallbackElapsed) => {
            Some((GatePhase::Closing, GateStep::BeginClosing))
        }
        (GatePhase::Closing, GateInput::TransitionElapsed) => {
            Some((GatePhase::Closed, GateStep::Finish))
        }
        _ => None,
    }
}

#[derive(Debug)]
pub struct IntroGate {
    surface: NodeId,
    phase: GatePhase,
    fallback: Option<TimerHandle>,
    fallback_delay: Duration,
    transition_delay: Duration,
    reduced_transition_delay: Duration,
}

impl IntroGate {
    pub fn attach<D: Document>(doc: &D, config: &Config) -> Option<Self> {
        let surface = doc.element_by_id(selectors::INTRO_SCREEN_ID)?;
        Some(Self {
            surface,
            phase: GatePhase::Pending,
            fallback: None,
            fallback_delay: config.intro_fallback,
            transition_delay: config.intro_transition,
            reduced_transition_delay: config.intro_transition_reduced,
        })
    }

    /// Lock page scroll and arm the fallback timer.
    pub fn start<D: Document, T: Schedule>(&mut self, doc: &mut D, timers: &mut T) {
        doc.set_scroll_locked(true);
        self.fallback = Some(timers.schedule(self.fallback_delay, TimerEvent::IntroFallback));
        debug!("Intro gate armed, fallback in {:?}", self.fallback_delay);
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// The gate blocks interaction until closing starts.
    pub fn is_active(&self) -> bool {
        self.phase == GatePhase::Pending
    }

    pub fn is_surface<D: Document>(&self, doc: &D, target: NodeId) -> bool {
        doc.contains(self.surface, target)
    }

    pub fn handle<D: Document, T: Schedule>(
        &mut self,
        input: GateInput,
        doc: &mut D,
        timers: &mut T,
    ) -> GatePhase {
        let Some((next, step)) = transition(self.phase, input) else {
            debug!("Intro gate ignoring {:?} while {:?}", input, self.phase);
            return self.phase;
        };
        self.phase = next;

        match step {
            GateStep::BeginClosing => {
                if let Some(handle) = self.fallback.take() {
                    timers.cancel(handle);
                }
                doc.add_class(self.surface, selectors::INTRO_CLOSING_CLASS);
                let delay = if doc.prefers_reduced_motion() {
                    self.reduced_transition_delay
                } else {
                    self.transition_delay
                };
                timers.schedule(delay, TimerEvent::IntroTransition);
                info!("Intro closing ({:?})", input);
            }
            GateStep::Finish => {
                doc.add_class(self.surface, selectors::HIDDEN_CLASS);
                doc.set_scroll_locked(false);
                reveal::start(doc);
                info!("Intro closed");
            }
        }
        self.phase
    }
}
