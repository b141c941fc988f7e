use tracing::{debug, info, warn};

use crate::dom::{selectors, Document, NodeId};
use crate::i18n::{Language, LoadError, TranslationTable};
use crate::prefs::{KeyValueStore, PreferenceStore};

/// Where the translation documents stand for this page load.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationState {
    Loading,
    Ready(TranslationTable),
    /// The load failed; the markup text stays as shipped until a reload.
    Unavailable,
}

/// Applies the chosen language to every `[data-i18n]` element.
///
/// Owns the current language and the translation state: nothing else writes
/// either field.
#[derive(Debug, Clone)]
pub struct LanguageController {
    toggle: NodeId,
    current: Language,
    translations: TranslationState,
}

impl LanguageController {
    /// Bind to `#lang-toggle`. Without the toggle the whole feature is absent.
    pub fn attach<D: Document, S: KeyValueStore>(
        doc: &D,
        prefs: &PreferenceStore<S>,
    ) -> Option<Self> {
        let toggle = doc.element_by_id(selectors::LANG_TOGGLE_ID)?;
        let current = initial_language(prefs.language(), doc.browser_language().as_deref());
        debug!("Initial language: {}", current.code());

        Some(Self {
            toggle,
            current,
            translations: TranslationState::Loading,
        })
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn translations(&self) -> &TranslationState {
        &self.translations
    }

    pub fn is_toggle<D: Document>(&self, doc: &D, target: NodeId) -> bool {
        doc.contains(self.toggle, target)
    }

    /// Store the load outcome, then translate and refresh the indicator.
    pub fn translations_loaded<D: Document>(
        &mut self,
        doc: &mut D,
        result: Result<TranslationTable, LoadError>,
    ) {
        self.translations = match result {
            Ok(table) => TranslationState::Ready(table),
            Err(e) => {
                warn!("Keeping default page text: {}", e);
                TranslationState::Unavailable
            }
        };
        self.apply(doc, self.current);
        self.update_indicator(doc);
    }

    /// Replace the text of every tagged element whose key resolves for
    /// `language`. Unresolved keys leave the element untouched. Returns the
    /// number of elements rewritten.
    pub fn apply<D: Document>(&self, doc: &mut D, language: Language) -> usize {
        let TranslationState::Ready(table) = &self.translations else {
            debug!("No translations loaded, skipping {}", language.code());
            return 0;
        };
        if !table.has_language(language) {
            return 0;
        }

        let mut updated = 0;
        for node in doc.elements_with_attr(selectors::TRANSLATION_KEY_ATTR) {
            let Some(key) = doc.attr(node, selectors::TRANSLATION_KEY_ATTR) else {
                continue;
            };
            if let Some(text) = table.lookup(language, &key) {
                doc.set_text_content(node, text);
                updated += 1;
            }
        }

        info!("Applied {} translation(s) for {}", updated, language.code());
        updated
    }

    /// Switch to the other language, persist it, and re-apply.
    pub fn toggle<D: Document, S: KeyValueStore>(
        &mut self,
        doc: &mut D,
        prefs: &mut PreferenceStore<S>,
    ) -> Language {
        self.current = self.current.toggled();
        prefs.set_language(self.current);
        self.apply(doc, self.current);
        self.update_indicator(doc);
        self.current
    }

    fn update_indicator<D: Document>(&self, doc: &mut D) {
        if let Some(indicator) = doc
            .elements_with_class(selectors::LANG_CURRENT_CLASS)
            .into_iter()
            .next()
        {
            doc.set_text_content(indicator, &self.current.indicator_label());
        }
    }
}

/// Persisted preference first, then the browser locale, then English.
pub fn initial_language(stored: Option<Language>, locale: Option<&str>) -> Language {
    stored
        .or_else(|| locale.map(Language::from_locale))
        .unwrap_or_else(Language::canonical)
}
