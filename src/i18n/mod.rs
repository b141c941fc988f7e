//! Internationalization (i18n) module for the site's language switch.
//!
//! The static markup is written in the canonical language. Other languages
//! arrive as JSON documents fetched once per page load and are applied to
//! every element tagged with a translation key.
//!
//! # Architecture
//!
//! - `registry`: The table of supported languages, markup language first
//! - `language`: Copyable handle onto one table entry
//! - `table`: Loaded documents and dot-path lookup
//! - `loader`: Concurrent fetch of every language document
//! - `validator`: Coverage checks run after a successful load
//! - `controller`: Applies a language to the page and handles the toggle
//!
//! # Example
//!
//! ```rust,ignore
//! use alemx_site::i18n::{Language, TranslationLoader};
//!
//! let loader = TranslationLoader::from_config(&config)?;
//! let table = loader.load().await?;
//! let subtitle = table.lookup(Language::RUSSIAN, "hero.subtitle");
//! ```

mod controller;
mod language;
mod loader;
mod registry;
mod table;
mod validator;

pub use controller::{initial_language, LanguageController, TranslationState};
pub use language::Language;
pub use loader::{spawn_load, LoadError, TranslationLoader};
pub use table::{resolve, TranslationTable};
pub use validator::{TranslationValidator, ValidationReport};
