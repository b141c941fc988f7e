//! Translation coverage validation.
//!
//! Every display string in the canonical document should have a counterpart
//! in each other language. Gaps are not fatal (the element keeps its markup
//! text) but they are worth a warning when the documents are loaded.

use serde::Serialize;
use serde_json::Value;

use crate::i18n::table::{leaf_paths, resolve};
use crate::i18n::{Language, TranslationTable};

/// Validation report containing errors and warnings about a translation table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    /// Leaves that can never be displayed (numbers, arrays, booleans, null)
    pub errors: Vec<String>,

    /// Keys missing or empty in a non-canonical language
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

pub struct TranslationValidator;

impl TranslationValidator {
    pub fn validate(table: &TranslationTable) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut languages: Vec<Language> = table.languages().collect();
        languages.sort_by_key(|lang| lang.code());

        for &language in &languages {
            let Some(document) = table.document(language) else {
                continue;
            };
            for path in leaf_paths(document) {
                if !matches!(resolve(document, &path), Some(Value::String(_))) {
                    report.errors.push(format!(
                        "[{}] '{}' is not a string and will never be displayed",
                        language.code(),
                        path
                    ));
                }
            }
        }

        let canonical = Language::canonical();
        let Some(reference) = table.document(canonical) else {
            return report;
        };
        let reference_keys: Vec<String> = leaf_paths(reference)
            .into_iter()
            .filter(|path| table.lookup(canonical, path).is_some())
            .collect();

        for &language in languages.iter().filter(|lang| **lang != canonical) {
            for key in &reference_keys {
                if table.lookup(language, key).is_none() {
                    report.warnings.push(format!(
                        "[{}] missing translation for '{}'",
                        language.code(),
                        key
                    ));
                }
            }
        }

        report
    }
}
