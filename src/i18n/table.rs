use std::collections::HashMap;

use serde_json::Value;

use crate::i18n::Language;

/// Loaded translation documents, one nested JSON object per language.
///
/// Keys are dot paths (`"hero.subtitle"`) resolved segment by segment. A
/// missing segment yields no value. Only non-empty string leaves are
/// displayed: an empty string keeps the markup text, and so does a number,
/// boolean, array or null leaf (`"count": 3` is never shown as `"3"`). The
/// validator reports those non-string leaves as errors. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    documents: HashMap<Language, Value>,
}

impl TranslationTable {
    pub fn from_documents(documents: impl IntoIterator<Item = (Language, Value)>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.documents.contains_key(&language)
    }

    pub fn document(&self, language: Language) -> Option<&Value> {
        self.documents.get(&language)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.documents.keys().copied()
    }

    /// Resolve `key` for `language`.
    pub fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        let value = resolve(self.document(language)?, key)?;
        value.as_str().filter(|text| !text.is_empty())
    }
}

/// Walk a dot path through nested objects.
pub fn resolve<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(document, |value, segment| value.as_object()?.get(segment))
}

/// Every leaf path in `document`, depth first.
pub fn leaf_paths(document: &Value) -> Vec<String> {
    fn walk(value: &Value, prefix: &str, out: &mut Vec<String>) {
        match value.as_object() {
            Some(object) => {
                for (key, child) in object {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    walk(child, &path, out);
                }
            }
            None if !prefix.is_empty() => out.push(prefix.to_string()),
            None => {}
        }
    }

    let mut paths = Vec::new();
    walk(document, "", &mut paths);
    paths
}
