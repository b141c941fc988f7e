use std::time::Duration;

use alemx_site::app::App;
use alemx_site::config::Config;
use alemx_site::dom::{selectors, Document, MemoryDocument};
use alemx_site::events::{self, Key, UiEvent};
use alemx_site::i18n::{spawn_load, TranslationLoader};
use alemx_site::prefs::{FileStore, PreferenceStore};
use alemx_site::timer::TokioScheduler;
use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("alemx_site=info".parse()?),
        )
        .init();

    info!("Starting page preview session");

    let config = Config::from_env()?;
    let prefs = PreferenceStore::new(FileStore::open(&config.preferences_path));
    let (sender, mut receiver) = events::channel();
    let timers = TokioScheduler::new(sender.clone());

    let mut app = App::start(MemoryDocument::landing_page(), prefs, timers, &config);

    // Step 1: Fetch translations in the background
    let load = if app.wants_translations() {
        let loader = TranslationLoader::from_config(&config)
            .context("Failed to build translation client")?;
        Some(spawn_load(loader, sender.clone()))
    } else {
        None
    };

    // Step 2: Enter the site through the intro gate
    let intro = app
        .document()
        .element_by_id(selectors::INTRO_SCREEN_ID)
        .context("Landing page has no intro screen")?;
    sender.send(UiEvent::Click { target: intro })?;
    settle(&mut app, &mut receiver, config.intro_transition).await;
    if let Some(load) = load {
        load.await.context("Translation task panicked")?;
    }
    app.drain(&mut receiver);

    // Step 3: Open the first project modal and show what was rendered
    let trigger = app
        .document()
        .elements_with_class(selectors::PROJECT_TRIGGER_CLASS)
        .into_iter()
        .next()
        .context("Landing page has no project triggers")?;
    app.dispatch(UiEvent::Click { target: trigger });
    if let Some(body) = app.document().element_by_id(selectors::PROJECT_MODAL_BODY_ID) {
        info!("Project modal body: {}", app.document().snapshot(body).to_html());
    }
    app.dispatch(UiEvent::KeyDown {
        key: Key::Escape,
        shift: false,
        target: app.document().active_element(),
    });

    // Step 4: Switch language and report
    if let Some(toggle) = app.document().element_by_id(selectors::LANG_TOGGLE_ID) {
        app.dispatch(UiEvent::Click { target: toggle });
    }
    if let Some(language) = app.language() {
        let current = language.current();
        info!(
            "Session finished in {} ({}), preferences at {}",
            current.name(),
            current.native_name(),
            config.preferences_path.display()
        );
    }

    Ok(())
}

/// Let queued events and timers due within `window` run.
async fn settle(
    app: &mut App<MemoryDocument, FileStore, TokioScheduler>,
    receiver: &mut events::EventReceiver,
    window: Duration,
) {
    let deadline = tokio::time::Instant::now() + window + Duration::from_millis(50);
    while let Ok(Some(event)) = tokio::time::timeout_at(deadline, receiver.recv()).await {
        app.dispatch(event);
    }
}
