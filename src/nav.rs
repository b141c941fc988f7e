//! Navigation: active-section highlighting, in-page link scrolling, and the
//! mobile menu toggle.

use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::dom::{selectors, Document, NodeId};
use crate::events::{Propagation, TimerEvent};
use crate::timer::{Schedule, TimerHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSnapshot {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSnapshot {
    /// `[top - offset, top - offset + height)`
    pub fn contains(&self, scroll_y: f64, offset: f64) -> bool {
        let start = self.top - offset;
        scroll_y >= start && scroll_y < start + self.height
    }
}

/// Geometry of every `section[id]`, captured fresh for each scroll tick.
/// Nothing survives between ticks, so resizes need no invalidation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    sections: Vec<SectionSnapshot>,
}

impl LayoutSnapshot {
    pub fn capture<D: Document>(doc: &D) -> Self {
        let sections = doc
            .elements_by_tag(selectors::SECTION_TAG)
            .into_iter()
            .filter_map(|node| {
                let id = doc.attr(node, "id")?;
                let layout = doc.layout(node)?;
                Some(SectionSnapshot {
                    id,
                    top: layout.top,
                    height: layout.height,
                })
            })
            .collect();
        Self { sections }
    }

    pub fn from_sections(sections: Vec<SectionSnapshot>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[SectionSnapshot] {
        &self.sections
    }

    /// Where ranges overlap the last matching section in document order wins.
    pub fn active_section(&self, scroll_y: f64, offset: f64) -> Option<&str> {
        self.sections
            .iter()
            .filter(|section| section.contains(scroll_y, offset))
            .last()
            .map(|section| section.id.as_str())
    }
}

#[derive(Debug)]
pub struct NavigationHighlighter {
    menu: Option<NodeId>,
    links: Vec<NodeId>,
    mobile_toggle: Option<NodeId>,
    overlay: Option<NodeId>,
    pending_tick: Option<TimerHandle>,
    scroll_generation: u64,
    debounce: Duration,
    section_offset: f64,
    transition_step: Duration,
}

impl NavigationHighlighter {
    /// Every piece is optional; with no `.nav-menu` there are no links to
    /// mark and scroll ticks do nothing visible.
    pub fn attach<D: Document>(doc: &D, config: &Config) -> Self {
        let menu = doc
            .elements_with_class(selectors::NAV_MENU_CLASS)
            .into_iter()
            .next();
        let links = menu
            .map(|menu| doc.descendants_by_tag(menu, selectors::LINK_TAG))
            .unwrap_or_default();
        let mobile_toggle = doc
            .elements_with_class(selectors::MOBILE_TOGGLE_CLASS)
            .into_iter()
            .next();
        let overlay = doc
            .elements_with_class(selectors::PAGE_TRANSITION_CLASS)
            .into_iter()
            .next();

        Self {
            menu,
            links,
            mobile_toggle,
            overlay,
            pending_tick: None,
            scroll_generation: 0,
            debounce: config.scroll_debounce,
            section_offset: config.nav_section_offset,
            transition_step: config.page_transition_step,
        }
    }

    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    // ==================== Scroll Highlighting ====================

    /// Trailing-edge debounce: every scroll pushes the recompute back.
    pub fn on_scroll<T: Schedule>(&mut self, timers: &mut T) {
        if let Some(handle) = self.pending_tick.take() {
            timers.cancel(handle);
        }
        self.scroll_generation += 1;
        let tick = TimerEvent::ScrollSettled {
            generation: self.scroll_generation,
        };
        self.pending_tick = Some(timers.schedule(self.debounce, tick));
    }

    /// Handle a debounce tick. A tick from a superseded generation may still
    /// arrive after its cancel; it is dropped and the live timer stays armed.
    /// Returns the active section id when the highlight was recomputed.
    pub fn on_scroll_settled<D: Document>(
        &mut self,
        doc: &mut D,
        generation: u64,
    ) -> Option<String> {
        if self.pending_tick.is_none() || generation != self.scroll_generation {
            debug!(
                "Dropping stale scroll tick {} (current {})",
                generation, self.scroll_generation
            );
            return None;
        }
        self.pending_tick = None;
        self.refresh(doc)
    }

    /// Recompute the active section and move the `active` marker. Returns the
    /// active section id, if any.
    pub fn refresh<D: Document>(&self, doc: &mut D) -> Option<String> {
        let snapshot = LayoutSnapshot::capture(doc);
        let active = snapshot
            .active_section(doc.scroll_y(), self.section_offset)
            .map(str::to_string);
        self.mark_active(doc, active.as_deref());
        active
    }

    fn mark_active<D: Document>(&self, doc: &mut D, section: Option<&str>) {
        let target = section.map(|id| format!("#{}", id));
        for &link in &self.links {
            doc.remove_class(link, selectors::ACTIVE_CLASS);
            if target.is_some() && doc.attr(link, "href") == target {
                doc.add_class(link, selectors::ACTIVE_CLASS);
            }
        }
    }

    // ==================== Link Clicks ====================

    pub fn link_for<D: Document>(&self, doc: &D, target: NodeId) -> Option<NodeId> {
        self.links
            .iter()
            .copied()
            .find(|&link| doc.contains(link, target))
    }

    /// In-page anchors suppress navigation and scroll to their section,
    /// behind the page-transition overlay when one exists and motion is
    /// allowed. Other links keep their default behaviour.
    pub fn on_link_click<D: Document, T: Schedule>(
        &mut self,
        doc: &mut D,
        timers: &mut T,
        link: NodeId,
    ) -> Propagation {
        let Some(href) = doc.attr(link, "href") else {
            return Propagation::Default;
        };
        let Some(target_id) = href.strip_prefix('#') else {
            return Propagation::Default;
        };
        let Some(target) = doc.element_by_id(target_id) else {
            debug!("No section for {}", href);
            return Propagation::Prevented;
        };

        self.close_mobile_menu(doc);

        match self.overlay {
            Some(overlay) if !doc.prefers_reduced_motion() => {
                doc.add_class(overlay, selectors::ACTIVE_CLASS);
                timers.schedule(
                    self.transition_step,
                    TimerEvent::PageTransitionScroll { target },
                );
            }
            _ => doc.scroll_into_view(target),
        }
        Propagation::Prevented
    }

    pub fn on_transition_scroll<D: Document, T: Schedule>(
        &mut self,
        doc: &mut D,
        timers: &mut T,
        target: NodeId,
    ) {
        doc.scroll_into_view(target);
        timers.schedule(self.transition_step, TimerEvent::PageTransitionRelease);
    }

    pub fn on_transition_release<D: Document>(&mut self, doc: &mut D) {
        if let Some(overlay) = self.overlay {
            doc.remove_class(overlay, selectors::ACTIVE_CLASS);
        }
    }

    // ==================== Mobile Menu ====================

    pub fn is_mobile_toggle<D: Document>(&self, doc: &D, target: NodeId) -> bool {
        self.mobile_toggle
            .is_some_and(|toggle| doc.contains(toggle, target))
    }

    pub fn toggle_mobile_menu<D: Document>(&mut self, doc: &mut D) {
        let (Some(toggle), Some(menu)) = (self.mobile_toggle, self.menu) else {
            return;
        };
        let expanded = doc.attr(toggle, selectors::ARIA_EXPANDED_ATTR).as_deref() == Some("true");
        doc.toggle_class(menu, selectors::MOBILE_ACTIVE_CLASS);
        doc.set_attr(
            toggle,
            selectors::ARIA_EXPANDED_ATTR,
            if expanded { "false" } else { "true" },
        );
    }

    fn close_mobile_menu<D: Document>(&mut self, doc: &mut D) {
        let Some(menu) = self.menu else {
            return;
        };
        if doc.has_class(menu, selectors::MOBILE_ACTIVE_CLASS) {
            doc.remove_class(menu, selectors::MOBILE_ACTIVE_CLASS);
            if let Some(toggle) = self.mobile_toggle {
                doc.set_attr(toggle, selectors::ARIA_EXPANDED_ATTR, "false");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::timer::ManualScheduler;
    use proptest::prelude::*;

    fn setup() -> (NavigationHighlighter, MemoryDocument, ManualScheduler) {
        let doc = MemoryDocument::landing_page();
        let nav = NavigationHighlighter::attach(&doc, &Config::default());
        (nav, doc, ManualScheduler::new())
    }

    fn active_hrefs(nav: &NavigationHighlighter, doc: &MemoryDocument) -> Vec<String> {
        nav.links()
            .iter()
            .filter(|&&link| doc.has_class(link, selectors::ACTIVE_CLASS))
            .filter_map(|&link| doc.attr(link, "href"))
            .collect()
    }

    fn link(nav: &NavigationHighlighter, doc: &MemoryDocument, href: &str) -> NodeId {
        *nav.links()
            .iter()
            .find(|&&l| doc.attr(l, "href").as_deref() == Some(href))
            .expect("link should exist")
    }

    // ==================== Range Tests ====================

    #[test]
    fn test_section_range_is_half_open() {
        let section = SectionSnapshot {
            id: "about".to_string(),
            top: 800.0,
            height: 600.0,
        };
        assert!(!section.contains(699.0, 100.0));
        assert!(section.contains(700.0, 100.0));
        assert!(section.contains(1299.0, 100.0));
        assert!(!section.contains(1300.0, 100.0));
    }

    #[test]
    fn test_overlapping_sections_last_wins() {
        let snapshot = LayoutSnapshot::from_sections(vec![
            SectionSnapshot { id: "a".into(), top: 0.0, height: 1000.0 },
            SectionSnapshot { id: "b".into(), top: 500.0, height: 1000.0 },
        ]);
        assert_eq!(snapshot.active_section(600.0, 100.0), Some("b"));
        assert_eq!(snapshot.active_section(100.0, 100.0), Some("a"));
        assert_eq!(snapshot.active_section(5000.0, 100.0), None);
    }

    #[test]
    fn test_capture_reads_live_layout() {
        let (_, mut doc, _) = setup();
        let about = doc.element_by_id("about").unwrap();
        doc.set_layout(about, 900.0, 500.0);

        let snapshot = LayoutSnapshot::capture(&doc);
        assert_eq!(snapshot.sections().len(), 5);
        assert_eq!(snapshot.sections()[1].top, 900.0);
    }

    // ==================== Highlight Tests ====================

    #[test]
    fn test_scroll_is_debounced() {
        let (mut nav, mut doc, mut timers) = setup();
        doc.set_scroll_y(850.0);

        nav.on_scroll(&mut timers);
        timers.set_now(Duration::from_millis(60));
        nav.on_scroll(&mut timers);

        let live = TimerEvent::ScrollSettled { generation: 2 };
        assert_eq!(timers.pending(), vec![live]);
        assert_eq!(timers.pop_due(Duration::from_millis(159)), None);
        assert_eq!(timers.pop_due(Duration::from_millis(160)), Some(live));
        assert_eq!(nav.on_scroll_settled(&mut doc, 2).as_deref(), Some("about"));
        assert_eq!(active_hrefs(&nav, &doc), vec!["#about"]);
    }

    #[test]
    fn test_stale_tick_keeps_live_timer_cancellable() {
        let (mut nav, mut doc, mut timers) = setup();
        doc.set_scroll_y(850.0);

        // Tick 1 was already queued when the second scroll cancelled it.
        nav.on_scroll(&mut timers);
        timers.set_now(Duration::from_millis(100));
        nav.on_scroll(&mut timers);
        assert_eq!(nav.on_scroll_settled(&mut doc, 1), None);
        assert!(active_hrefs(&nav, &doc).is_empty());

        // The next scroll must still supersede tick 2.
        timers.set_now(Duration::from_millis(150));
        nav.on_scroll(&mut timers);
        assert_eq!(
            timers.pending(),
            vec![TimerEvent::ScrollSettled { generation: 3 }]
        );
        assert_eq!(nav.on_scroll_settled(&mut doc, 2), None);
        assert_eq!(nav.on_scroll_settled(&mut doc, 3).as_deref(), Some("about"));

        // A repeat of the live tick after it fired is ignored too.
        assert_eq!(nav.on_scroll_settled(&mut doc, 3), None);
    }

    #[test]
    fn test_marker_moves_between_sections() {
        let (nav, mut doc, _) = setup();

        doc.set_scroll_y(1400.0);
        nav.refresh(&mut doc);
        assert_eq!(active_hrefs(&nav, &doc), vec!["#projects"]);

        doc.set_scroll_y(2250.0);
        nav.refresh(&mut doc);
        assert_eq!(active_hrefs(&nav, &doc), vec!["#team"]);
    }

    #[test]
    fn test_no_matching_section_clears_marker() {
        let (nav, mut doc, _) = setup();
        doc.set_scroll_y(1400.0);
        nav.refresh(&mut doc);

        doc.set_scroll_y(10_000.0);
        assert_eq!(nav.refresh(&mut doc), None);
        assert!(active_hrefs(&nav, &doc).is_empty());
    }

    proptest! {
        #[test]
        fn prop_only_containing_section_is_marked(scroll_y in -200.0f64..4000.0) {
            let (nav, mut doc, _) = setup();
            doc.set_scroll_y(scroll_y);
            nav.refresh(&mut doc);

            let snapshot = LayoutSnapshot::capture(&doc);
            let expected: Vec<String> = snapshot
                .active_section(scroll_y, 100.0)
                .map(|id| vec![format!("#{}", id)])
                .unwrap_or_default();
            prop_assert_eq!(active_hrefs(&nav, &doc), expected);

            for &link in nav.links() {
                if doc.has_class(link, selectors::ACTIVE_CLASS) {
                    let href = doc.attr(link, "href").unwrap();
                    let section = snapshot
                        .sections()
                        .iter()
                        .find(|s| format!("#{}", s.id) == href)
                        .unwrap();
                    prop_assert!(section.contains(scroll_y, 100.0));
                }
            }
        }
    }

    // ==================== Link Click Tests ====================

    #[test]
    fn test_anchor_click_runs_overlay_sequence() {
        let (mut nav, mut doc, mut timers) = setup();
        let overlay = doc.elements_with_class(selectors::PAGE_TRANSITION_CLASS)[0];
        let team = doc.element_by_id("team").unwrap();
        let link = link(&nav, &doc, "#team");

        assert_eq!(nav.on_link_click(&mut doc, &mut timers, link), Propagation::Prevented);
        assert!(doc.has_class(overlay, selectors::ACTIVE_CLASS));
        assert!(doc.scrolls().is_empty());

        let timer = timers.pop_due(Duration::from_millis(400)).unwrap();
        assert_eq!(timer, TimerEvent::PageTransitionScroll { target: team });
        nav.on_transition_scroll(&mut doc, &mut timers, team);
        assert_eq!(doc.scrolls(), &[team]);
        assert!(doc.has_class(overlay, selectors::ACTIVE_CLASS));

        assert_eq!(timers.pop_due(Duration::from_millis(799)), None);
        let timer = timers.pop_due(Duration::from_millis(800)).unwrap();
        assert_eq!(timer, TimerEvent::PageTransitionRelease);
        nav.on_transition_release(&mut doc);
        assert!(!doc.has_class(overlay, selectors::ACTIVE_CLASS));
    }

    #[test]
    fn test_anchor_click_with_reduced_motion_scrolls_immediately() {
        let (mut nav, mut doc, mut timers) = setup();
        doc.set_reduced_motion(true);
        let about = doc.element_by_id("about").unwrap();
        let link = link(&nav, &doc, "#about");

        nav.on_link_click(&mut doc, &mut timers, link);
        assert_eq!(doc.scrolls(), &[about]);
        assert!(timers.pending().is_empty());
    }

    #[test]
    fn test_anchor_click_without_overlay_scrolls_immediately() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.append(
            body,
            &crate::dom::NodeSpec::new("ul")
                .class(selectors::NAV_MENU_CLASS)
                .child(crate::dom::NodeSpec::new("a").attr("href", "#contact")),
        );
        let contact = doc.append(body, &crate::dom::NodeSpec::new("section").attr("id", "contact"));
        let mut nav = NavigationHighlighter::attach(&doc, &Config::default());
        let mut timers = ManualScheduler::new();
        let link = nav.links()[0];

        nav.on_link_click(&mut doc, &mut timers, link);
        assert_eq!(doc.scrolls(), &[contact]);
    }

    #[test]
    fn test_external_link_keeps_default() {
        let (mut nav, mut doc, mut timers) = setup();
        let link = link(&nav, &doc, "https://github.com/alemx");

        assert_eq!(nav.on_link_click(&mut doc, &mut timers, link), Propagation::Default);
        assert!(timers.pending().is_empty());
    }

    #[test]
    fn test_anchor_click_closes_mobile_menu() {
        let (mut nav, mut doc, mut timers) = setup();
        let menu = doc.elements_with_class(selectors::NAV_MENU_CLASS)[0];
        let toggle = doc.elements_with_class(selectors::MOBILE_TOGGLE_CLASS)[0];
        nav.toggle_mobile_menu(&mut doc);
        assert!(doc.has_class(menu, selectors::MOBILE_ACTIVE_CLASS));
        assert_eq!(doc.attr(toggle, selectors::ARIA_EXPANDED_ATTR).as_deref(), Some("true"));

        let link = link(&nav, &doc, "#contact");
        nav.on_link_click(&mut doc, &mut timers, link);

        assert!(!doc.has_class(menu, selectors::MOBILE_ACTIVE_CLASS));
        assert_eq!(doc.attr(toggle, selectors::ARIA_EXPANDED_ATTR).as_deref(), Some("false"));
    }

    #[test]
    fn test_mobile_toggle_round_trip() {
        let (mut nav, mut doc, _) = setup();
        let menu = doc.elements_with_class(selectors::NAV_MENU_CLASS)[0];

        nav.toggle_mobile_menu(&mut doc);
        nav.toggle_mobile_menu(&mut doc);
        assert!(!doc.has_class(menu, selectors::MOBILE_ACTIVE_CLASS));
    }
}
