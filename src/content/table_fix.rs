//! Layout repair for orphaned `display: table-row` elements.
//!
//! A table-row box with no table ancestor collapses in normal flow. Each
//! such element sitting directly in `<body>`, or in a `div` that is not
//! itself displayed as a table, gets a synthetic `display: table` wrapper.

use kuchikiki::NodeRef;

use super::dom::{inline_display, is_tag, new_element};

const WRAPPER_STYLE: &str = "display: table; width: 100%;";

/// Wrap orphaned table rows below `body`; returns how many were wrapped
pub fn repair_table_rows(body: &NodeRef) -> usize {
    let orphans: Vec<NodeRef> = body
        .descendants()
        .filter(|node| inline_display(node).as_deref() == Some("table-row"))
        .filter(|node| needs_wrapper(node, body))
        .collect();

    for row in &orphans {
        let wrapper = new_element("div", &[("style", WRAPPER_STYLE)]);
        row.insert_before(wrapper.clone());
        wrapper.append(row.clone());
    }

    orphans.len()
}

fn needs_wrapper(row: &NodeRef, body: &NodeRef) -> bool {
    match row.parent() {
        Some(parent) if &parent == body => true,
        Some(parent) if is_tag(&parent, "div") => !matches!(
            inline_display(&parent).as_deref(),
            Some("table") | Some("inline-table")
        ),
        _ => false,
    }
}
