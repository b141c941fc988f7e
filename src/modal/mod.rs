//! Project and team dialogs: open/close lifecycle and the keyboard focus trap.
//!
//! Each modal surface is a small state machine (`Closed` / `Open`). All
//! dismissal paths (close control, backdrop, cancel key) go through
//! [`ModalManager::close`], which is idempotent.
//!
//! Only one modal is expected to be open at a time, but nothing enforces it;
//! the scroll lock is a single shared flag and the last modal to close
//! releases it.

mod content;
mod render;

pub use content::{ContentRegistry, ProjectEntry, TeamEntry};
pub use render::{project_body, team_body, team_placeholder};

use tracing::{debug, info};

use crate::dom::{selectors, Document, NodeId, NodeSpec};
use crate::events::Propagation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Project,
    Team,
}

impl ModalKind {
    pub const ALL: [ModalKind; 2] = [ModalKind::Project, ModalKind::Team];

    fn root_id(self) -> &'static str {
        match self {
            ModalKind::Project => selectors::PROJECT_MODAL_ID,
            ModalKind::Team => selectors::TEAM_MODAL_ID,
        }
    }

    fn body_id(self) -> &'static str {
        match self {
            ModalKind::Project => selectors::PROJECT_MODAL_BODY_ID,
            ModalKind::Team => selectors::TEAM_MODAL_BODY_ID,
        }
    }

    fn trigger_class(self) -> &'static str {
        match self {
            ModalKind::Project => selectors::PROJECT_TRIGGER_CLASS,
            ModalKind::Team => selectors::TEAM_TRIGGER_CLASS,
        }
    }

    fn reference_attr(self) -> &'static str {
        match self {
            ModalKind::Project => selectors::PROJECT_REF_ATTR,
            ModalKind::Team => selectors::TEAM_REF_ATTR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open {
        /// Element that held focus before the modal took it.
        last_focused_trigger: Option<NodeId>,
    },
}

#[derive(Debug, Clone)]
pub struct ModalInstance {
    kind: ModalKind,
    root: NodeId,
    body: NodeId,
    state: ModalState,
}

impl ModalInstance {
    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }
}

#[derive(Debug, Default)]
pub struct ModalManager {
    instances: Vec<ModalInstance>,
}

impl ModalManager {
    /// A modal whose root or body element is missing is simply absent.
    pub fn attach<D: Document>(doc: &D) -> Self {
        let instances = ModalKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let root = doc.element_by_id(kind.root_id())?;
                let body = doc.element_by_id(kind.body_id())?;
                Some(ModalInstance {
                    kind,
                    root,
                    body,
                    state: ModalState::Closed,
                })
            })
            .collect();
        Self { instances }
    }

    pub fn instance(&self, kind: ModalKind) -> Option<&ModalInstance> {
        self.instances.iter().find(|instance| instance.kind == kind)
    }

    fn instance_mut(&mut self, kind: ModalKind) -> Option<&mut ModalInstance> {
        self.instances
            .iter_mut()
            .find(|instance| instance.kind == kind)
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.instance(kind).is_some_and(ModalInstance::is_open)
    }

    /// The first open modal in document order.
    pub fn open_modal(&self) -> Option<&ModalInstance> {
        self.instances.iter().find(|instance| instance.is_open())
    }

    /// Open the project modal for `id`. Unknown ids open nothing and leave
    /// every modal as it was.
    pub fn open_project<D: Document>(&mut self, doc: &mut D, id: &str) -> bool {
        let Some(project) = ContentRegistry::get().project(id) else {
            debug!("No project '{}', nothing to open", id);
            return false;
        };
        self.show(doc, ModalKind::Project, &project_body(project))
    }

    /// Open the team modal for `id`, with a placeholder profile when the
    /// registry has no entry.
    pub fn open_team_member<D: Document>(&mut self, doc: &mut D, id: &str) -> bool {
        let body = match ContentRegistry::get().team_member(id) {
            Some(member) => team_body(member),
            None => {
                debug!("No profile for '{}', showing placeholder", id);
                team_placeholder()
            }
        };
        self.show(doc, ModalKind::Team, &body)
    }

    fn show<D: Document>(&mut self, doc: &mut D, kind: ModalKind, content: &[NodeSpec]) -> bool {
        let previously_focused = doc.active_element();
        let Some(instance) = self.instance_mut(kind) else {
            return false;
        };

        doc.replace_children(instance.body, content);
        doc.add_class(instance.root, selectors::ACTIVE_CLASS);
        doc.set_scroll_locked(true);

        let last_focused_trigger = match &instance.state {
            ModalState::Open {
                last_focused_trigger,
            } => *last_focused_trigger,
            ModalState::Closed => previously_focused,
        };
        instance.state = ModalState::Open {
            last_focused_trigger,
        };

        if let Some(close) = doc.descendant_with_class(instance.root, selectors::MODAL_CLOSE_CLASS) {
            doc.focus(close);
        }
        info!("Opened {:?} modal", kind);
        true
    }

    /// Close the modal rooted at `root`. Closing a closed modal is a no-op.
    pub fn close<D: Document>(&mut self, doc: &mut D, root: NodeId) -> bool {
        match self.instances.iter().find(|instance| instance.root == root) {
            Some(instance) => {
                let kind = instance.kind;
                self.close_kind(doc, kind)
            }
            None => false,
        }
    }

    pub fn close_kind<D: Document>(&mut self, doc: &mut D, kind: ModalKind) -> bool {
        let Some(instance) = self.instance_mut(kind) else {
            return false;
        };
        let ModalState::Open {
            last_focused_trigger,
        } = std::mem::replace(&mut instance.state, ModalState::Closed)
        else {
            return false;
        };

        doc.remove_class(instance.root, selectors::ACTIVE_CLASS);
        doc.set_scroll_locked(false);
        if let Some(trigger) = last_focused_trigger.filter(|&node| doc.is_connected(node)) {
            doc.focus(trigger);
        }
        info!("Closed {:?} modal", kind);
        true
    }

    /// Cancel key: close every open modal. Returns how many were closed.
    pub fn close_all<D: Document>(&mut self, doc: &mut D) -> usize {
        ModalKind::ALL
            .into_iter()
            .filter(|&kind| self.close_kind(doc, kind))
            .count()
    }

    /// Wrap the focus-cycle key inside the open modal.
    ///
    /// The focusable set is queried on every press because the body is
    /// replaced on each open. Returns `Prevented` only when focus was wrapped.
    pub fn trap_focus<D: Document>(&self, doc: &mut D, backward: bool) -> Propagation {
        let Some(modal) = self.open_modal() else {
            return Propagation::Default;
        };
        let focusable = doc.focusable_descendants(modal.root);
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            return Propagation::Default;
        };
        let active = doc.active_element();

        if backward && active == Some(first) {
            doc.focus(last);
            Propagation::Prevented
        } else if !backward && active == Some(last) {
            doc.focus(first);
            Propagation::Prevented
        } else {
            Propagation::Default
        }
    }

    /// Route a click: open triggers, close controls and backdrops.
    pub fn handle_click<D: Document>(&mut self, doc: &mut D, target: NodeId) -> bool {
        for kind in ModalKind::ALL {
            if doc.closest_with_class(target, kind.trigger_class()).is_none() {
                continue;
            }
            let Some(id) = doc
                .closest_with_attr(target, kind.reference_attr())
                .and_then(|card| doc.attr(card, kind.reference_attr()))
            else {
                continue;
            };
            return match kind {
                ModalKind::Project => self.open_project(doc, &id),
                ModalKind::Team => self.open_team_member(doc, &id),
            };
        }

        let dismiss = doc
            .closest_with_class(target, selectors::MODAL_CLOSE_CLASS)
            .or_else(|| doc.closest_with_class(target, selectors::MODAL_OVERLAY_CLASS));
        match dismiss.and_then(|control| doc.closest_with_class(control, selectors::MODAL_CLASS)) {
            Some(root) => self.close(doc, root),
            None => false,
        }
    }
}
