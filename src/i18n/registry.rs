//! Supported languages.
//!
//! The site ships one translation document per entry in [`SUPPORTED`]. The
//! first entry is the language the static markup is written in; the toggle
//! walks the rest in table order.

/// Names for one supported language.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct LanguageEntry {
    /// ISO 639-1 code, also the top-level key in a translation document.
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

pub(crate) const ENGLISH: LanguageEntry = LanguageEntry {
    code: "en",
    name: "English",
    native_name: "English",
};

pub(crate) const RUSSIAN: LanguageEntry = LanguageEntry {
    code: "ru",
    name: "Russian",
    native_name: "Русский",
};

/// Toggle order. Index 0 is the markup language.
pub(crate) static SUPPORTED: [&LanguageEntry; 2] = [&ENGLISH, &RUSSIAN];

/// Exact, case-sensitive code match.
pub(crate) fn find(code: &str) -> Option<&'static LanguageEntry> {
    SUPPORTED.iter().copied().find(|entry| entry.code == code)
}
