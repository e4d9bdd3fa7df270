//! Removal of legacy help-viewer chrome from content bodies.

use log::debug;
use kuchikiki::NodeRef;

use crate::config::ChromeMarkers;
use super::dom::{is_tag, select_all, TransformError};

/// Remove every element matched by the chrome markers from `body`.
///
/// Navigation panels, footers and slide controls are removed as matched.
/// A theme-switch control takes its parent with it when that parent is a
/// plain `div`. Returns how many subtrees were removed.
pub fn strip_chrome(body: &NodeRef, markers: &ChromeMarkers) -> Result<usize, TransformError> {
    let mut removed = 0;

    for selector in markers
        .nav_panel
        .iter()
        .chain(markers.footer.iter())
        .chain(markers.slide_controls.iter())
    {
        removed += detach_all(select_all(body, selector)?, body);
    }

    for selector in &markers.theme_switch {
        let targets = select_all(body, selector)?
            .into_iter()
            .map(|control| match control.parent() {
                Some(parent) if is_tag(&parent, "div") && &parent != body => parent,
                _ => control,
            })
            .collect();
        removed += detach_all(targets, body);
    }

    if removed > 0 {
        debug!("Removed {} chrome elements", removed);
    }
    Ok(removed)
}

/// Detach nodes, skipping the body itself and nodes already gone with an ancestor
fn detach_all(nodes: Vec<NodeRef>, body: &NodeRef) -> usize {
    let mut removed = 0;
    for node in nodes {
        if &node == body || !node.ancestors().any(|ancestor| &ancestor == body) {
            continue;
        }
        node.detach();
        removed += 1;
    }
    removed
}
