//! Interaction layer for the alemx robotics landing page.
//!
//! The page (markup, styling, hosting) lives elsewhere. This crate owns the
//! behaviour behind it: the intro gate, the translation loader and language
//! switch, scroll-linked navigation highlighting, the project/team modals with
//! their focus trap, and the persisted theme/language preferences.

pub mod app;
pub mod config;
pub mod dom;
pub mod events;
pub mod i18n;
pub mod intro;
pub mod modal;
pub mod nav;
pub mod prefs;
pub mod reveal;
pub mod theme;
pub mod timer;
