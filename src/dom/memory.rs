use std::collections::BTreeMap;

use super::{selectors, Document, Layout, NodeId, NodeSpec};

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    layout: Option<Layout>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            layout: None,
        }
    }
}

/// Arena-backed [`Document`] with no browser behind it.
///
/// Besides the port itself it models the browser pieces the interaction
/// layer relies on: sequential focus navigation ([`tab`](Self::tab)), the
/// viewport scroll offset, media queries, and records of the side effects
/// handed to external collaborators (reveal observer, hero entrance,
/// scroll-into-view requests).
///
/// Nodes are never freed. Replacing or clearing children only detaches the
/// old subtree, so its slots stay in the arena and every [`NodeId`] keeps
/// naming the node it was issued for. A stale id (say, a recorded modal
/// trigger whose card was re-rendered) therefore reads as disconnected
/// instead of aliasing newer content. The arena grows with each re-render,
/// which is fine for one page session but not for a long-lived process.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    focused: Option<NodeId>,
    scroll_locked: bool,
    scroll_y: f64,
    reduced_motion: bool,
    reveal_observer: bool,
    locale: Option<String>,
    observed: Vec<NodeId>,
    hero_entrances: Vec<bool>,
    scrolls: Vec<NodeId>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty `<html><body></body></html>` document.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node::new("html")],
            focused: None,
            scroll_locked: false,
            scroll_y: 0.0,
            reduced_motion: false,
            reveal_observer: true,
            locale: None,
            observed: Vec::new(),
            hero_entrances: Vec::new(),
            scrolls: Vec::new(),
        };
        doc.append(ROOT, &NodeSpec::new("body"));
        doc
    }

    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Build `spec` under `parent`, returning the id of the new subtree root.
    pub fn append(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(&spec.tag);
        for (name, value) in &spec.attrs {
            node.attrs.insert(name.clone(), value.clone());
        }
        for class in &spec.classes {
            if !node.classes.contains(class) {
                node.classes.push(class.clone());
            }
        }
        node.text = spec.text.clone().unwrap_or_default();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);

        for child in &spec.children {
            self.append(id, child);
        }
        id
    }

    /// Copy the subtree at `node` back out as a template.
    pub fn snapshot(&self, node: NodeId) -> NodeSpec {
        let source = self.node(node);
        NodeSpec {
            tag: source.tag.clone(),
            attrs: source
                .attrs
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            classes: source.classes.clone(),
            text: (!source.text.is_empty()).then(|| source.text.clone()),
            children: source
                .children
                .iter()
                .map(|&child| self.snapshot(child))
                .collect(),
        }
    }

    pub fn set_layout(&mut self, node: NodeId, top: f64, height: f64) {
        self.nodes[node.0].layout = Some(Layout { top, height });
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn set_reveal_observer(&mut self, available: bool) {
        self.reveal_observer = available;
    }

    pub fn set_browser_language(&mut self, locale: Option<&str>) {
        self.locale = locale.map(str::to_string);
    }

    /// Elements handed to the reveal observer, in the order received.
    pub fn observed(&self) -> &[NodeId] {
        &self.observed
    }

    /// One entry per hero entrance start, carrying the reduced-motion flag.
    pub fn hero_entrances(&self) -> &[bool] {
        &self.hero_entrances
    }

    pub fn scrolls(&self) -> &[NodeId] {
        &self.scrolls
    }

    /// Browser default for the focus-cycle key: move to the next (or previous)
    /// focusable element in the whole document, wrapping at the ends.
    pub fn tab(&mut self, forward: bool) {
        let focusable = self.focusable_descendants(ROOT);
        if focusable.is_empty() {
            return;
        }
        let len = focusable.len();
        let position = self
            .focused
            .and_then(|current| focusable.iter().position(|&id| id == current));
        let next = match (position, forward) {
            (Some(p), true) => (p + 1) % len,
            (Some(p), false) => (p + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.focused = Some(focusable[next]);
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    fn connected(&self) -> Vec<NodeId> {
        self.preorder(ROOT)
    }

    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&id| self.node(id).parent)
    }

    /// The detached subtree keeps its slots. See the type docs.
    fn detach_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn is_focusable(&self, id: NodeId) -> bool {
        let node = self.node(id);
        matches!(
            node.tag.as_str(),
            "button" | "input" | "select" | "textarea"
        ) || node.attrs.contains_key("href")
            || node.attrs.get("tabindex").is_some_and(|v| v != "-1")
    }

    /// The site's markup, reduced to what the interaction layer touches.
    ///
    /// Section geometry: `home` 0..800, `about` 800..1400, `projects`
    /// 1400..2300, `team` 2300..3000, `contact` 3000..3500.
    pub fn landing_page() -> Self {
        let mut doc = Self::new();
        let body = doc.body();

        let nav_link = |href: &str, key: &str, label: &str| {
            NodeSpec::new("li").child(
                NodeSpec::new("a")
                    .attr("href", href)
                    .attr(selectors::TRANSLATION_KEY_ATTR, key)
                    .text(label),
            )
        };
        let project_card = |id: &str, title: &str| {
            NodeSpec::new("article")
                .class("project-card")
                .attr(selectors::PROJECT_REF_ATTR, id)
                .child(NodeSpec::new("h3").text(title))
                .child(
                    NodeSpec::new("button")
                        .class("btn")
                        .class(selectors::PROJECT_TRIGGER_CLASS)
                        .child(
                            NodeSpec::new("span")
                                .attr(selectors::TRANSLATION_KEY_ATTR, "projects.details")
                                .text("Learn More"),
                        ),
                )
        };
        let team_card = |id: &str, name: &str| {
            NodeSpec::new("article")
                .class("team-card")
                .attr(selectors::TEAM_REF_ATTR, id)
                .child(NodeSpec::new("h3").text(name))
                .child(
                    NodeSpec::new("button")
                        .class("btn")
                        .class(selectors::TEAM_TRIGGER_CLASS)
                        .text("View Profile"),
                )
        };
        let modal = |id: &str, body_id: &str| {
            NodeSpec::new("div")
                .attr("id", id)
                .attr("role", "dialog")
                .attr("aria-modal", "true")
                .class(selectors::MODAL_CLASS)
                .child(NodeSpec::new("div").class(selectors::MODAL_OVERLAY_CLASS))
                .child(
                    NodeSpec::new("div")
                        .class("modal-content")
                        .child(
                            NodeSpec::new("button")
                                .class(selectors::MODAL_CLOSE_CLASS)
                                .attr("aria-label", "Close")
                                .text("×"),
                        )
                        .child(NodeSpec::new("div").attr("id", body_id)),
                )
        };

        doc.append(
            body,
            &NodeSpec::new("div")
                .attr("id", selectors::INTRO_SCREEN_ID)
                .attr("tabindex", "0")
                .attr("role", "button")
                .child(
                    NodeSpec::new("p")
                        .attr(selectors::TRANSLATION_KEY_ATTR, "intro.hint")
                        .text("Click anywhere to enter"),
                ),
        );
        doc.append(
            body,
            &NodeSpec::new("div").class(selectors::PAGE_TRANSITION_CLASS),
        );
        doc.append(
            body,
            &NodeSpec::new("header").child(
                NodeSpec::new("nav")
                    .child(
                        NodeSpec::new("button")
                            .attr("id", selectors::THEME_TOGGLE_ID)
                            .attr("aria-label", "Toggle theme"),
                    )
                    .child(
                        NodeSpec::new("button")
                            .attr("id", selectors::LANG_TOGGLE_ID)
                            .child(
                                NodeSpec::new("span")
                                    .class(selectors::LANG_CURRENT_CLASS)
                                    .text("EN"),
                            ),
                    )
                    .child(
                        NodeSpec::new("button")
                            .class(selectors::MOBILE_TOGGLE_CLASS)
                            .attr(selectors::ARIA_EXPANDED_ATTR, "false"),
                    )
                    .child(
                        NodeSpec::new("ul")
                            .class(selectors::NAV_MENU_CLASS)
                            .child(nav_link("#home", "nav.home", "Home"))
                            .child(nav_link("#about", "nav.about", "About"))
                            .child(nav_link("#projects", "nav.projects", "Projects"))
                            .child(nav_link("#team", "nav.team", "Team"))
                            .child(nav_link("#contact", "nav.contact", "Contact"))
                            .child(nav_link("https://github.com/alemx", "nav.github", "GitHub")),
                    ),
            ),
        );

        let sections = [
            NodeSpec::new("section")
                .attr("id", "home")
                .child(
                    NodeSpec::new("h1")
                        .class("hero-title")
                        .attr(selectors::TRANSLATION_KEY_ATTR, "hero.title")
                        .text("Building Intelligent Robots"),
                )
                .child(
                    NodeSpec::new("p")
                        .class("hero-subtitle")
                        .attr(selectors::TRANSLATION_KEY_ATTR, "hero.subtitle")
                        .text("Robotics and AI engineering"),
                )
                .child(
                    NodeSpec::new("a")
                        .class("hero-cta")
                        .attr("href", "#projects")
                        .attr(selectors::TRANSLATION_KEY_ATTR, "hero.cta")
                        .text("Explore our work"),
                ),
            NodeSpec::new("section")
                .attr("id", "about")
                .child(
                    NodeSpec::new("h2")
                        .attr(selectors::TRANSLATION_KEY_ATTR, "about.title")
                        .text("About Us"),
                )
                .child(
                    NodeSpec::new("p")
                        .class(selectors::REVEAL_CLASS)
                        .attr(selectors::TRANSLATION_KEY_ATTR, "about.text")
                        .text("We design autonomous systems."),
                ),
            NodeSpec::new("section")
                .attr("id", "projects")
                .child(
                    NodeSpec::new("h2")
                        .class(selectors::REVEAL_CLASS)
                        .attr(selectors::TRANSLATION_KEY_ATTR, "projects.title")
                        .text("Projects"),
                )
                .child(project_card("1", "Autonomous Navigation System"))
                .child(project_card("2", "Smart Manufacturing Assistant"))
                .child(project_card("3", "Vision Recognition Platform")),
            NodeSpec::new("section")
                .attr("id", "team")
                .child(
                    NodeSpec::new("h2")
                        .class(selectors::REVEAL_CLASS)
                        .attr(selectors::TRANSLATION_KEY_ATTR, "team.title")
                        .text("Our Team"),
                )
                .child(team_card("founder1", "Alex Chen"))
                .child(team_card("founder2", "Sarah Williams"))
                .child(team_card("engineer1", "Dana Petrova")),
            NodeSpec::new("section").attr("id", "contact").child(
                NodeSpec::new("h2")
                    .attr(selectors::TRANSLATION_KEY_ATTR, "contact.title")
                    .text("Get in Touch"),
            ),
        ];
        let geometry = [(0.0, 800.0), (800.0, 600.0), (1400.0, 900.0), (2300.0, 700.0), (3000.0, 500.0)];
        for (section, (top, height)) in sections.iter().zip(geometry) {
            let id = doc.append(body, section);
            doc.set_layout(id, top, height);
        }

        doc.append(
            body,
            &modal(selectors::PROJECT_MODAL_ID, selectors::PROJECT_MODAL_BODY_ID),
        );
        doc.append(
            body,
            &modal(selectors::TEAM_MODAL_ID, selectors::TEAM_MODAL_BODY_ID),
        );
        doc
    }
}

impl Document for MemoryDocument {
    fn document_element(&self) -> NodeId {
        ROOT
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.connected()
            .into_iter()
            .find(|&node| self.node(node).attrs.get("id").is_some_and(|v| v == id))
    }

    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.connected()
            .into_iter()
            .filter(|&node| self.has_class(node, class))
            .collect()
    }

    fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.connected()
            .into_iter()
            .filter(|&node| self.node(node).attrs.contains_key(name))
            .collect()
    }

    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants_by_tag(ROOT, tag)
    }

    fn descendants_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.preorder(root)
            .into_iter()
            .skip(1)
            .filter(|&node| self.node(node).tag == tag)
            .collect()
    }

    fn descendant_with_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.preorder(root)
            .into_iter()
            .skip(1)
            .find(|&node| self.has_class(node, class))
    }

    fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.ancestors(node).find(|&id| self.has_class(id, class))
    }

    fn closest_with_attr(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.ancestors(node)
            .find(|&id| self.node(id).attrs.contains_key(name))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.contains(ROOT, node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).attrs.get(name).cloned()
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    fn text_content(&self, node: NodeId) -> String {
        self.preorder(node)
            .into_iter()
            .map(|id| self.node(id).text.as_str())
            .collect()
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.detach_children(node);
        self.nodes[node.0].text = text.to_string();
    }

    fn replace_children(&mut self, node: NodeId, content: &[NodeSpec]) {
        self.detach_children(node);
        self.nodes[node.0].text.clear();
        for spec in content {
            self.append(node, spec);
        }
    }

    fn focusable_descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.preorder(root)
            .into_iter()
            .skip(1)
            .filter(|&node| self.is_focusable(node))
            .collect()
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused.filter(|&node| self.is_connected(node))
    }

    fn focus(&mut self, node: NodeId) {
        if self.is_connected(node) {
            self.focused = Some(node);
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn layout(&self, node: NodeId) -> Option<Layout> {
        self.node(node).layout
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if let Some(layout) = self.node(node).layout {
            self.scroll_y = layout.top;
        }
        self.scrolls.push(node);
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn supports_reveal_observer(&self) -> bool {
        self.reveal_observer
    }

    fn observe_reveal(&mut self, node: NodeId) {
        self.observed.push(node);
    }

    fn browser_language(&self) -> Option<String> {
        self.locale.clone()
    }

    fn start_hero_entrance(&mut self, reduced_motion: bool) {
        self.hero_entrances.push(reduced_motion);
    }
}
