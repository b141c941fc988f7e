//! Wires the components to the document and runs the event queue.

use tracing::{debug, info};

use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::events::{EventReceiver, Key, Propagation, TimerEvent, UiEvent};
use crate::i18n::LanguageController;
use crate::intro::{GateInput, IntroGate};
use crate::modal::ModalManager;
use crate::nav::NavigationHighlighter;
use crate::prefs::{KeyValueStore, PreferenceStore};
use crate::reveal;
use crate::theme::ThemeToggle;
use crate::timer::Schedule;

/// One page session. Every field is only touched from [`App::dispatch`], so
/// handlers never interleave.
pub struct App<D, S, T> {
    doc: D,
    prefs: PreferenceStore<S>,
    timers: T,
    intro: Option<IntroGate>,
    language: Option<LanguageController>,
    theme: Option<ThemeToggle>,
    nav: NavigationHighlighter,
    modals: ModalManager,
}

impl<D: Document, S: KeyValueStore, T: Schedule> App<D, S, T> {
    /// Bind every component that finds its elements, apply the saved theme,
    /// and arm the intro gate.
    pub fn start(mut doc: D, prefs: PreferenceStore<S>, mut timers: T, config: &Config) -> Self {
        let theme = ThemeToggle::attach(&doc);
        if let Some(theme) = &theme {
            theme.apply_saved(&mut doc, &prefs);
        }

        let language = LanguageController::attach(&doc, &prefs);
        let nav = NavigationHighlighter::attach(&doc, config);
        let modals = ModalManager::attach(&doc);

        let mut intro = IntroGate::attach(&doc, config);
        match intro.as_mut() {
            Some(gate) => gate.start(&mut doc, &mut timers),
            None => {
                debug!("No intro screen, starting page effects now");
                reveal::start(&mut doc);
            }
        }

        info!(
            "Page session started (intro: {}, language: {})",
            intro.is_some(),
            language
                .as_ref()
                .map(|controller| controller.current().code())
                .unwrap_or("none")
        );

        Self {
            doc,
            prefs,
            timers,
            intro,
            language,
            theme,
            nav,
            modals,
        }
    }

    /// Translations are only fetched when the language control exists.
    pub fn wants_translations(&self) -> bool {
        self.language.is_some()
    }

    /// Run one event to completion.
    pub fn dispatch(&mut self, event: UiEvent) -> Propagation {
        match event {
            UiEvent::Click { target } => self.on_click(target),
            UiEvent::KeyDown { key, shift, target } => self.on_key(key, shift, target),
            UiEvent::Scroll => {
                self.nav.on_scroll(&mut self.timers);
                Propagation::Default
            }
            UiEvent::Timer(timer) => {
                self.on_timer(timer);
                Propagation::Default
            }
            UiEvent::TranslationsLoaded(result) => {
                if let Some(language) = self.language.as_mut() {
                    language.translations_loaded(&mut self.doc, result);
                }
                Propagation::Default
            }
        }
    }

    fn on_click(&mut self, target: NodeId) -> Propagation {
        if let Some(gate) = self.intro.as_mut() {
            if gate.is_surface(&self.doc, target) {
                gate.handle(GateInput::Activated, &mut self.doc, &mut self.timers);
                return Propagation::Default;
            }
        }

        if let Some(theme) = &self.theme {
            if theme.is_control(&self.doc, target) {
                theme.toggle(&mut self.doc, &mut self.prefs);
                return Propagation::Default;
            }
        }

        if let Some(language) = self.language.as_mut() {
            if language.is_toggle(&self.doc, target) {
                language.toggle(&mut self.doc, &mut self.prefs);
                return Propagation::Default;
            }
        }

        if self.nav.is_mobile_toggle(&self.doc, target) {
            self.nav.toggle_mobile_menu(&mut self.doc);
            return Propagation::Default;
        }

        if let Some(link) = self.nav.link_for(&self.doc, target) {
            return self.nav.on_link_click(&mut self.doc, &mut self.timers, link);
        }

        self.modals.handle_click(&mut self.doc, target);
        Propagation::Default
    }

    fn on_key(
        &mut self,
        key: Key,
        shift: bool,
        target: Option<NodeId>,
    ) -> Propagation {
        match key {
            Key::Enter | Key::Space => {
                let Some(gate) = self.intro.as_mut() else {
                    return Propagation::Default;
                };
                match target {
                    Some(node) if gate.is_active() && gate.is_surface(&self.doc, node) => {
                        gate.handle(GateInput::Activated, &mut self.doc, &mut self.timers);
                        Propagation::Prevented
                    }
                    _ => Propagation::Default,
                }
            }
            Key::Escape => {
                self.modals.close_all(&mut self.doc);
                Propagation::Default
            }
            Key::Tab => self.modals.trap_focus(&mut self.doc, shift),
            Key::Other(_) => Propagation::Default,
        }
    }

    fn on_timer(&mut self, timer: TimerEvent) {
        match timer {
            TimerEvent::IntroFallback => self.gate_input(GateInput::FallbackElapsed),
            TimerEvent::IntroTransition => self.gate_input(GateInput::TransitionElapsed),
            TimerEvent::ScrollSettled { generation } => {
                self.nav.on_scroll_settled(&mut self.doc, generation);
            }
            TimerEvent::PageTransitionScroll { target } => {
                self.nav
                    .on_transition_scroll(&mut self.doc, &mut self.timers, target);
            }
            TimerEvent::PageTransitionRelease => self.nav.on_transition_release(&mut self.doc),
        }
    }

    fn gate_input(&mut self, input: GateInput) {
        if let Some(gate) = self.intro.as_mut() {
            gate.handle(input, &mut self.doc, &mut self.timers);
        }
    }

    /// Dispatch until every sender is gone.
    pub async fn run(&mut self, receiver: &mut EventReceiver) {
        while let Some(event) = receiver.recv().await {
            self.dispatch(event);
        }
        debug!("Event queue closed");
    }

    /// Dispatch whatever is already queued without waiting. Returns the
    /// number of events handled.
    pub fn drain(&mut self, receiver: &mut EventReceiver) -> usize {
        let mut handled = 0;
        while let Ok(event) = receiver.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn preferences(&self) -> &PreferenceStore<S> {
        &self.prefs
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn intro(&self) -> Option<&IntroGate> {
        self.intro.as_ref()
    }

    pub fn language(&self) -> Option<&LanguageController> {
        self.language.as_ref()
    }

    pub fn nav(&self) -> &NavigationHighlighter {
        &self.nav
    }

    pub fn modals(&self) -> &ModalManager {
        &self.modals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{selectors, MemoryDocument, NodeSpec};
    use crate::intro::GatePhase;
    use crate::modal::ModalKind;
    use crate::prefs::{MemoryStore, THEME_KEY};
    use crate::timer::ManualScheduler;
    use std::time::Duration;

    type TestApp = App<MemoryDocument, MemoryStore, ManualScheduler>;

    fn app_with(doc: MemoryDocument, store: MemoryStore) -> TestApp {
        App::start(
            doc,
            PreferenceStore::new(store),
            ManualScheduler::new(),
            &Config::default(),
        )
    }

    fn app() -> TestApp {
        app_with(MemoryDocument::landing_page(), MemoryStore::new())
    }

    /// Advance the manual clock and dispatch every timer that came due.
    fn advance(app: &mut TestApp, by: Duration) {
        let deadline = app.timers_mut().now() + by;
        while let Some(timer) = app.timers_mut().pop_due(deadline) {
            app.dispatch(UiEvent::Timer(timer));
        }
        app.timers_mut().set_now(deadline);
    }

    fn id(app: &TestApp, id: &str) -> NodeId {
        app.document().element_by_id(id).unwrap()
    }

    fn enter_site(app: &mut TestApp) {
        let intro = id(app, selectors::INTRO_SCREEN_ID);
        app.dispatch(UiEvent::Click { target: intro });
        advance(app, Duration::from_millis(800));
        assert_eq!(app.intro().unwrap().phase(), GatePhase::Closed);
    }

    fn click(app: &mut TestApp, node: NodeId) -> Propagation {
        app.dispatch(UiEvent::Click { target: node })
    }

    fn tab(app: &mut TestApp, shift: bool) {
        let focused = app.document().active_element();
        let outcome = app.dispatch(UiEvent::KeyDown {
            key: Key::Tab,
            shift,
            target: focused,
        });
        if !outcome.is_prevented() {
            app.document_mut().tab(!shift);
        }
    }

    // ==================== Startup Tests ====================

    #[test]
    fn test_start_locks_scroll_and_applies_theme() {
        let app = app_with(
            MemoryDocument::landing_page(),
            MemoryStore::new().with(THEME_KEY, "light"),
        );
        let doc = app.document();
        assert!(doc.is_scroll_locked());
        assert_eq!(
            doc.attr(doc.document_element(), selectors::THEME_ATTR).as_deref(),
            Some("light")
        );
        assert!(app.wants_translations());
    }

    #[test]
    fn test_start_without_intro_runs_effects_immediately() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.append(body, &NodeSpec::new("p").class(selectors::REVEAL_CLASS));

        let app = app_with(doc, MemoryStore::new());
        assert!(app.intro().is_none());
        assert!(!app.document().is_scroll_locked());
        assert_eq!(app.document().observed().len(), 1);
        assert_eq!(app.document().hero_entrances(), &[false]);
        assert!(!app.wants_translations());
    }

    // ==================== Intro Tests ====================

    #[test]
    fn test_double_click_then_fallback_starts_effects_once() {
        let mut app = app();
        let intro = id(&app, selectors::INTRO_SCREEN_ID);

        click(&mut app, intro);
        click(&mut app, intro);
        advance(&mut app, Duration::from_secs(10));

        assert_eq!(app.intro().unwrap().phase(), GatePhase::Closed);
        assert_eq!(app.document().hero_entrances().len(), 1);
        assert!(!app.document().is_scroll_locked());
    }

    #[test]
    fn test_fallback_closes_untouched_gate() {
        let mut app = app();
        advance(&mut app, Duration::from_millis(5999));
        assert_eq!(app.intro().unwrap().phase(), GatePhase::Pending);

        advance(&mut app, Duration::from_millis(1));
        assert_eq!(app.intro().unwrap().phase(), GatePhase::Closing);

        advance(&mut app, Duration::from_millis(800));
        assert_eq!(app.intro().unwrap().phase(), GatePhase::Closed);
    }

    #[test]
    fn test_accept_key_on_gate_is_prevented() {
        let mut app = app();
        let intro = id(&app, selectors::INTRO_SCREEN_ID);

        let outcome = app.dispatch(UiEvent::KeyDown {
            key: Key::Space,
            shift: false,
            target: Some(intro),
        });

        assert_eq!(outcome, Propagation::Prevented);
        assert_eq!(app.intro().unwrap().phase(), GatePhase::Closing);
    }

    #[test]
    fn test_accept_key_elsewhere_keeps_default() {
        let mut app = app();
        enter_site(&mut app);
        let cta = app
            .document()
            .elements_with_class("hero-cta")
            .into_iter()
            .next()
            .unwrap();

        let outcome = app.dispatch(UiEvent::KeyDown {
            key: Key::Enter,
            shift: false,
            target: Some(cta),
        });
        assert_eq!(outcome, Propagation::Default);
    }

    // ==================== Modal Tests ====================

    #[test]
    fn test_escape_closes_modal_and_restores_trigger_focus() {
        let mut app = app();
        enter_site(&mut app);
        let trigger = app
            .document()
            .elements_with_class(selectors::TEAM_TRIGGER_CLASS)[0];
        app.document_mut().focus(trigger);

        click(&mut app, trigger);
        assert!(app.modals().is_open(ModalKind::Team));
        assert!(app.document().is_scroll_locked());

        app.dispatch(UiEvent::KeyDown {
            key: Key::Escape,
            shift: false,
            target: app.document().active_element(),
        });

        assert!(!app.modals().is_open(ModalKind::Team));
        assert!(!app.document().is_scroll_locked());
        assert_eq!(app.document().active_element(), Some(trigger));
    }

    #[test]
    fn test_tab_cycles_inside_open_modal() {
        let mut app = app();
        enter_site(&mut app);
        let trigger = app
            .document()
            .elements_with_class(selectors::PROJECT_TRIGGER_CLASS)[0];
        click(&mut app, trigger);
        let modal = id(&app, selectors::PROJECT_MODAL_ID);

        for shift in [false, false, true, true, false] {
            tab(&mut app, shift);
            let focused = app.document().active_element().unwrap();
            assert!(app.document().contains(modal, focused));
        }
    }

    // ==================== Toggle Tests ====================

    #[test]
    fn test_theme_click_persists() {
        let mut app = app();
        enter_site(&mut app);
        let control = id(&app, selectors::THEME_TOGGLE_ID);

        click(&mut app, control);
        assert_eq!(app.preferences().theme(), Some(crate::theme::Theme::Light));
        click(&mut app, control);
        assert_eq!(app.preferences().theme(), Some(crate::theme::Theme::Dark));
    }

    #[test]
    fn test_language_click_updates_indicator() {
        let mut app = app();
        enter_site(&mut app);
        let toggle = id(&app, selectors::LANG_TOGGLE_ID);

        click(&mut app, toggle);

        let indicator = app
            .document()
            .elements_with_class(selectors::LANG_CURRENT_CLASS)[0];
        assert_eq!(app.document().text_content(indicator), "RU");
        assert_eq!(
            app.preferences().language(),
            Some(crate::i18n::Language::RUSSIAN)
        );
    }

    // ==================== Navigation Tests ====================

    #[test]
    fn test_scroll_burst_highlights_once_settled() {
        let mut app = app();
        enter_site(&mut app);
        app.document_mut().set_scroll_y(1500.0);

        for _ in 0..5 {
            app.dispatch(UiEvent::Scroll);
            advance(&mut app, Duration::from_millis(40));
        }
        let projects_link = app.nav().links()[2];
        assert!(!app.document().has_class(projects_link, selectors::ACTIVE_CLASS));

        advance(&mut app, Duration::from_millis(100));
        assert!(app.document().has_class(projects_link, selectors::ACTIVE_CLASS));
    }

    #[test]
    fn test_in_page_link_runs_overlay_sequence() {
        let mut app = app();
        enter_site(&mut app);
        let contact_link = app.nav().links()[4];
        let overlay = app
            .document()
            .elements_with_class(selectors::PAGE_TRANSITION_CLASS)[0];

        assert_eq!(click(&mut app, contact_link), Propagation::Prevented);
        assert!(app.document().has_class(overlay, selectors::ACTIVE_CLASS));
        assert!(app.document().scrolls().is_empty());

        advance(&mut app, Duration::from_millis(400));
        assert_eq!(app.document().scrolls().len(), 1);
        assert!(app.document().has_class(overlay, selectors::ACTIVE_CLASS));

        advance(&mut app, Duration::from_millis(400));
        assert!(!app.document().has_class(overlay, selectors::ACTIVE_CLASS));
    }

    #[test]
    fn test_external_link_keeps_default() {
        let mut app = app();
        enter_site(&mut app);
        let external = app.nav().links()[5];
        assert_eq!(click(&mut app, external), Propagation::Default);
    }

    // ==================== Queue Tests ====================

    #[tokio::test]
    async fn test_run_dispatches_until_senders_drop() {
        let mut app = app();
        let intro = id(&app, selectors::INTRO_SCREEN_ID);
        let (sender, mut receiver) = crate::events::channel();

        sender.send(UiEvent::Click { target: intro }).unwrap();
        sender.send(UiEvent::Scroll).unwrap();
        drop(sender);
        app.run(&mut receiver).await;

        assert_eq!(app.intro().unwrap().phase(), GatePhase::Closing);
        assert!(app
            .timers_mut()
            .pending()
            .contains(&TimerEvent::ScrollSettled { generation: 1 }));
    }
}
