use tracing::info;

use crate::dom::{selectors, Document, NodeId};
use crate::prefs::{KeyValueStore, PreferenceStore};

/// Colour scheme carried in the document element's `data-theme` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// The `#theme-toggle` control.
#[derive(Debug, Clone)]
pub struct ThemeToggle {
    control: NodeId,
}

impl ThemeToggle {
    pub fn attach<D: Document>(doc: &D) -> Option<Self> {
        let control = doc.element_by_id(selectors::THEME_TOGGLE_ID)?;
        Some(Self { control })
    }

    pub fn is_control<D: Document>(&self, doc: &D, target: NodeId) -> bool {
        doc.contains(self.control, target)
    }

    /// Apply the saved theme, defaulting to dark.
    pub fn apply_saved<D: Document, S: KeyValueStore>(
        &self,
        doc: &mut D,
        prefs: &PreferenceStore<S>,
    ) -> Theme {
        let theme = prefs.theme().unwrap_or_default();
        let root = doc.document_element();
        doc.set_attr(root, selectors::THEME_ATTR, theme.as_str());
        theme
    }

    /// Dark becomes light; anything else (light or unset) becomes dark.
    pub fn toggle<D: Document, S: KeyValueStore>(
        &self,
        doc: &mut D,
        prefs: &mut PreferenceStore<S>,
    ) -> Theme {
        let root = doc.document_element();
        let current = doc
            .attr(root, selectors::THEME_ATTR)
            .and_then(|value| Theme::parse(&value));
        let next = match current {
            Some(Theme::Dark) => Theme::Light,
            _ => Theme::Dark,
        };
        doc.set_attr(root, selectors::THEME_ATTR, next.as_str());
        prefs.set_theme(next);
        info!("Theme switched to {}", next.as_str());
        next
    }
}
