//! Post-intro effects: reveal-on-scroll and the hero entrance.

use tracing::debug;

use crate::dom::{selectors, Document};

/// Start both downstream effects. Called exactly once per page load.
pub fn start<D: Document>(doc: &mut D) {
    observe_reveal_elements(doc);
    let reduced_motion = doc.prefers_reduced_motion();
    doc.start_hero_entrance(reduced_motion);
}

/// Without an intersection observer every revealable element is shown at
/// once rather than never.
fn observe_reveal_elements<D: Document>(doc: &mut D) {
    let elements = doc.elements_with_class(selectors::REVEAL_CLASS);
    if doc.supports_reveal_observer() {
        for element in elements {
            doc.observe_reveal(element);
        }
    } else {
        debug!("No reveal observer, showing {} element(s)", elements.len());
        for element in elements {
            doc.add_class(element, selectors::VISIBLE_CLASS);
        }
    }
}
