//! Language type: validated language representation.

use crate::i18n::registry::{self, LanguageEntry};
use anyhow::{bail, Result};

/// One of the supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    entry: &'static LanguageEntry,
}

impl Language {
    pub const ENGLISH: Language = Language {
        entry: &registry::ENGLISH,
    };
    pub const RUSSIAN: Language = Language {
        entry: &registry::RUSSIAN,
    };

    /// Create a Language from an exact language code such as `"ru"`.
    pub fn from_code(code: &str) -> Result<Language> {
        match registry::find(code) {
            Some(entry) => Ok(Language { entry }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Pick a language for a browser-reported locale such as `"ru-RU"`.
    ///
    /// Matches on the locale's prefix, case-insensitively; anything
    /// unrecognised falls back to the canonical language.
    pub fn from_locale(locale: &str) -> Language {
        let locale = locale.to_lowercase();
        Language::enabled()
            .into_iter()
            .find(|lang| locale.starts_with(lang.code()))
            .unwrap_or_else(Language::canonical)
    }

    /// The language the static markup is written in.
    pub fn canonical() -> Language {
        Language {
            entry: registry::SUPPORTED[0],
        }
    }

    /// All supported languages, in toggle order.
    pub fn enabled() -> Vec<Language> {
        registry::SUPPORTED
            .iter()
            .map(|&entry| Language { entry })
            .collect()
    }

    /// The next language in toggle order, wrapping around. With English and
    /// Russian this alternates between the two.
    pub fn toggled(self) -> Language {
        let enabled = Language::enabled();
        match enabled.iter().position(|&lang| lang == self) {
            Some(index) => enabled[(index + 1) % enabled.len()],
            None => Language::canonical(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.entry.code
    }

    /// Text for the language indicator, e.g. `"RU"`.
    pub fn indicator_label(&self) -> String {
        self.entry.code.to_uppercase()
    }

    pub fn name(&self) -> &'static str {
        self.entry.name
    }

    pub fn native_name(&self) -> &'static str {
        self.entry.native_name
    }
}
