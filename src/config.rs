use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Translation documents are fetched from <site_base_url>/i18n/<code>.json
    pub site_base_url: String,
    pub translation_timeout: Duration,

    // Profile-scoped preference file
    pub preferences_path: PathBuf,

    // Intro gate
    pub intro_fallback: Duration,
    pub intro_transition: Duration,
    pub intro_transition_reduced: Duration,

    // Navigation
    pub scroll_debounce: Duration,
    pub nav_section_offset: f64,
    pub page_transition_step: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_base_url: "http://127.0.0.1:8080/".to_string(),
            translation_timeout: Duration::from_secs(10),
            preferences_path: PathBuf::from(".alemx/preferences.json"),
            intro_fallback: Duration::from_millis(6000),
            intro_transition: Duration::from_millis(800),
            intro_transition_reduced: Duration::from_millis(10),
            scroll_debounce: Duration::from_millis(100),
            nav_section_offset: 100.0,
            page_transition_step: Duration::from_millis(400),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let site_base_url =
            std::env::var("SITE_BASE_URL").unwrap_or(defaults.site_base_url);
        let parsed = reqwest::Url::parse(&site_base_url)
            .with_context(|| format!("SITE_BASE_URL is not a valid URL: {}", site_base_url))?;
        if parsed.cannot_be_a_base() {
            bail!("SITE_BASE_URL cannot be used as a base URL: {}", site_base_url);
        }

        Ok(Self {
            site_base_url,
            translation_timeout: env_secs("TRANSLATION_TIMEOUT_SECS")
                .unwrap_or(defaults.translation_timeout),

            preferences_path: std::env::var("SITE_PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.preferences_path),

            intro_fallback: env_millis("INTRO_FALLBACK_MS").unwrap_or(defaults.intro_fallback),
            intro_transition: env_millis("INTRO_TRANSITION_MS")
                .unwrap_or(defaults.intro_transition),
            intro_transition_reduced: env_millis("INTRO_TRANSITION_REDUCED_MS")
                .unwrap_or(defaults.intro_transition_reduced),

            scroll_debounce: env_millis("SCROLL_DEBOUNCE_MS").unwrap_or(defaults.scroll_debounce),
            nav_section_offset: std::env::var("NAV_SECTION_OFFSET_PX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.nav_section_offset),
            page_transition_step: env_millis("PAGE_TRANSITION_STEP_MS")
                .unwrap_or(defaults.page_transition_step),
        })
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
}
