use std::time::Duration;

use futures::future::try_join_all;
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::events::{EventSender, UiEvent};
use crate::i18n::{Language, TranslationTable, TranslationValidator};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} is not valid JSON: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} does not contain a JSON object")]
    Shape { url: String },
}

/// Fetches the per-language translation documents that sit next to the page.
///
/// There is no retry: one failed load keeps the page in its markup language
/// until the next reload.
#[derive(Debug, Clone)]
pub struct TranslationLoader {
    client: reqwest::Client,
    base_url: String,
}

impl TranslationLoader {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(config.site_base_url.clone(), config.translation_timeout)
    }

    /// `<base>/i18n/<code>.json`
    pub fn url_for(&self, language: Language) -> String {
        format!(
            "{}/i18n/{}.json",
            self.base_url.trim_end_matches('/'),
            language.code()
        )
    }

    /// Fetch every enabled language concurrently and join the results.
    ///
    /// Any single failure (network, non-success status, malformed JSON, or a
    /// document that is not an object) fails the whole load; a partially
    /// loaded table is never produced.
    pub async fn load(&self) -> Result<TranslationTable, LoadError> {
        let languages = Language::enabled();
        let documents = try_join_all(languages.iter().map(|&lang| self.fetch(lang))).await?;
        let table = TranslationTable::from_documents(documents);

        let report = TranslationValidator::validate(&table);
        if report.is_clean() {
            debug!("Translations cover every canonical key");
        } else {
            for error in &report.errors {
                warn!("Translation error: {}", error);
            }
            for warning in &report.warnings {
                warn!("Translation gap: {}", warning);
            }
            if let Ok(summary) = serde_json::to_string(&report) {
                debug!("Translation coverage report: {}", summary);
            }
        }

        info!(
            "Loaded translations for {}",
            languages
                .iter()
                .map(|lang| lang.code())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(table)
    }

    async fn fetch(&self, language: Language) -> Result<(Language, Value), LoadError> {
        let url = self.url_for(language);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LoadError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status { url, status });
        }

        let body = response.text().await.map_err(|source| LoadError::Request {
            url: url.clone(),
            source,
        })?;

        let document: Value = serde_json::from_str(&body).map_err(|source| LoadError::Parse {
            url: url.clone(),
            source,
        })?;
        if !document.is_object() {
            return Err(LoadError::Shape { url });
        }

        Ok((language, document))
    }
}

/// Run [`TranslationLoader::load`] in the background and post the outcome
/// into the event queue as [`UiEvent::TranslationsLoaded`].
pub fn spawn_load(loader: TranslationLoader, sender: EventSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = loader.load().await;
        if let Err(e) = &result {
            warn!("Translation files not available, using default text: {}", e);
        }
        // A closed queue means the page is gone.
        let _ = sender.send(UiEvent::TranslationsLoaded(result));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn loader(server: &MockServer) -> TranslationLoader {
        TranslationLoader::new(server.uri(), Duration::from_secs(5)).expect("client should build")
    }

    async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    // ==================== url_for Tests ====================

    #[test]
    fn test_url_for_joins_base() {
        let loader = TranslationLoader::new("https://alemx.example/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            loader.url_for(Language::RUSSIAN),
            "https://alemx.example/i18n/ru.json"
        );

        let nested = TranslationLoader::new("https://alemx.example/site", Duration::from_secs(1)).unwrap();
        assert_eq!(
            nested.url_for(Language::ENGLISH),
            "https://alemx.example/site/i18n/en.json"
        );
    }

    // ==================== load Tests ====================

    #[tokio::test]
    async fn test_load_success() {
        let server = MockServer::start().await;
        mount_json(&server, "/i18n/en.json", serde_json::json!({ "hero": { "subtitle": "Robotics" } })).await;
        mount_json(&server, "/i18n/ru.json", serde_json::json!({ "hero": { "subtitle": "Заголовок" } })).await;

        let table = loader(&server).load().await.expect("load should succeed");

        assert_eq!(table.lookup(Language::ENGLISH, "hero.subtitle"), Some("Robotics"));
        assert_eq!(table.lookup(Language::RUSSIAN, "hero.subtitle"), Some("Заголовок"));
    }

    #[tokio::test]
    async fn test_load_fails_when_one_language_404s() {
        let server = MockServer::start().await;
        mount_json(&server, "/i18n/en.json", serde_json::json!({ "a": "b" })).await;
        Mock::given(method("GET"))
            .and(path("/i18n/ru.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = loader(&server).load().await.unwrap_err();
        assert!(matches!(err, LoadError::Status { .. }));
        assert!(err.to_string().contains("404"), "unexpected error: {}", err);
    }

    #[tokio::test]
    async fn test_load_fails_on_malformed_json() {
        let server = MockServer::start().await;
        mount_json(&server, "/i18n/en.json", serde_json::json!({ "a": "b" })).await;
        Mock::given(method("GET"))
            .and(path("/i18n/ru.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ \"hero\": "))
            .mount(&server)
            .await;

        let err = loader(&server).load().await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_load_fails_on_non_object_document() {
        let server = MockServer::start().await;
        mount_json(&server, "/i18n/en.json", serde_json::json!(["not", "an", "object"])).await;
        mount_json(&server, "/i18n/ru.json", serde_json::json!({})).await;

        let err = loader(&server).load().await.unwrap_err();
        assert!(matches!(err, LoadError::Shape { .. }));
    }

    #[tokio::test]
    async fn test_load_fails_when_server_unreachable() {
        let loader = TranslationLoader::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Request { .. }));
    }

    #[tokio::test]
    async fn test_load_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1..=2)
            .mount(&server)
            .await;

        assert!(loader(&server).load().await.is_err());
        // Expectations are verified when the server drops.
    }

    #[tokio::test]
    async fn test_spawn_load_posts_result_into_queue() {
        let server = MockServer::start().await;
        mount_json(&server, "/i18n/en.json", serde_json::json!({})).await;
        mount_json(&server, "/i18n/ru.json", serde_json::json!({})).await;

        let (sender, mut receiver) = events::channel();
        spawn_load(loader(&server), sender).await.unwrap();

        let event = receiver.recv().await.expect("event should be posted");
        assert!(matches!(event, UiEvent::TranslationsLoaded(Ok(_))));
    }
}
