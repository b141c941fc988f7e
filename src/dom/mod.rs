//! Document port: the slice of the page this crate reads and mutates.
//!
//! The interaction layer never owns markup or styling. It looks elements up,
//! flips classes and attributes, swaps text and modal bodies, and moves focus.
//! Everything it needs from the browser goes through the [`Document`] trait so
//! the state machines can run against a real page binding or against the
//! in-memory [`MemoryDocument`].
//!
//! # Architecture
//!
//! - `node`: owned element templates (`NodeSpec`) used to render modal bodies
//! - `memory`: arena-backed `Document` implementation plus the site fixture
//! - `selectors`: the markup contract (ids, classes, attributes) the site ships

mod memory;
mod node;

pub use memory::MemoryDocument;
pub use node::NodeSpec;

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Vertical layout box of an element (`offsetTop` / `offsetHeight`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub top: f64,
    pub height: f64,
}

/// The page as seen by the interaction layer.
///
/// Queries return elements in document order. Detached elements (for example
/// a modal body's previous content) are never returned by queries.
pub trait Document {
    /// The root element (`<html>`), carrier of document-wide attributes.
    fn document_element(&self) -> NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;
    fn elements_with_class(&self, class: &str) -> Vec<NodeId>;
    fn elements_with_attr(&self, name: &str) -> Vec<NodeId>;
    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId>;
    fn descendants_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId>;
    fn descendant_with_class(&self, root: NodeId, class: &str) -> Option<NodeId>;

    /// Nearest inclusive ancestor carrying `class`.
    fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId>;

    /// Nearest inclusive ancestor carrying attribute `name`.
    fn closest_with_attr(&self, node: NodeId, name: &str) -> Option<NodeId>;

    /// `true` when `node` is `ancestor` or lies beneath it.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// `true` while the element is still attached to the document.
    fn is_connected(&self, node: NodeId) -> bool;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Flip `class` on `node`, returning whether it is now present.
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    fn text_content(&self, node: NodeId) -> String;

    /// Replace all children of `node` with a single text run.
    fn set_text_content(&mut self, node: NodeId, text: &str);

    /// Replace all children of `node` with freshly built elements.
    fn replace_children(&mut self, node: NodeId, content: &[NodeSpec]);

    /// Keyboard-focusable descendants of `root`, in document order.
    ///
    /// Matches `button, [href], input, select, textarea,
    /// [tabindex]:not([tabindex="-1"])`. Callers must not cache the result.
    fn focusable_descendants(&self, root: NodeId) -> Vec<NodeId>;

    fn active_element(&self) -> Option<NodeId>;
    fn focus(&mut self, node: NodeId);

    /// Document-level scroll lock (`body { overflow: hidden }`).
    fn set_scroll_locked(&mut self, locked: bool);
    fn is_scroll_locked(&self) -> bool;

    /// Current vertical scroll offset of the viewport.
    fn scroll_y(&self) -> f64;

    /// Live layout query. `None` for elements that are not laid out.
    fn layout(&self, node: NodeId) -> Option<Layout>;

    /// Smooth-scroll `node` to the top of the viewport.
    fn scroll_into_view(&mut self, node: NodeId);

    /// `(prefers-reduced-motion: reduce)`
    fn prefers_reduced_motion(&self) -> bool;

    /// Whether a viewport-intersection observer is available.
    fn supports_reveal_observer(&self) -> bool;

    /// Hand `node` to the intersection observer for deferred reveal.
    fn observe_reveal(&mut self, node: NodeId);

    /// Browser-reported locale, e.g. `"ru-RU"`.
    fn browser_language(&self) -> Option<String>;

    /// Kick off the hero entrance animation.
    fn start_hero_entrance(&mut self, reduced_motion: bool);
}

/// Markup contract shared with the site's HTML.
pub mod selectors {
    pub const INTRO_SCREEN_ID: &str = "intro-screen";
    pub const INTRO_CLOSING_CLASS: &str = "closing";
    pub const HIDDEN_CLASS: &str = "hidden";

    pub const THEME_TOGGLE_ID: &str = "theme-toggle";
    pub const THEME_ATTR: &str = "data-theme";

    pub const LANG_TOGGLE_ID: &str = "lang-toggle";
    pub const LANG_CURRENT_CLASS: &str = "lang-current";
    pub const TRANSLATION_KEY_ATTR: &str = "data-i18n";

    pub const NAV_MENU_CLASS: &str = "nav-menu";
    pub const MOBILE_TOGGLE_CLASS: &str = "mobile-menu-toggle";
    pub const MOBILE_ACTIVE_CLASS: &str = "mobile-active";
    pub const ARIA_EXPANDED_ATTR: &str = "aria-expanded";
    pub const PAGE_TRANSITION_CLASS: &str = "page-transition-overlay";
    pub const SECTION_TAG: &str = "section";
    pub const LINK_TAG: &str = "a";

    pub const ACTIVE_CLASS: &str = "active";

    pub const PROJECT_MODAL_ID: &str = "project-modal";
    pub const PROJECT_MODAL_BODY_ID: &str = "modal-body";
    pub const PROJECT_TRIGGER_CLASS: &str = "project-modal-btn";
    pub const PROJECT_REF_ATTR: &str = "data-project";

    pub const TEAM_MODAL_ID: &str = "team-modal";
    pub const TEAM_MODAL_BODY_ID: &str = "team-modal-body";
    pub const TEAM_TRIGGER_CLASS: &str = "team-modal-btn";
    pub const TEAM_REF_ATTR: &str = "data-member";

    pub const MODAL_CLASS: &str = "modal";
    pub const MODAL_OVERLAY_CLASS: &str = "modal-overlay";
    pub const MODAL_CLOSE_CLASS: &str = "modal-close";

    pub const REVEAL_CLASS: &str = "reveal-element";
    pub const VISIBLE_CLASS: &str = "visible";
}
