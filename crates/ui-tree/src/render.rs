//! Snapshot text for the agent.
//!
//! One line per node, two spaces of indent per level:
//!
//! ```text
//! Screen
//!   Text "Settings"
//!   Switch [ref=0] "Wi-Fi" [checked]
//!   Button [ref=1] "Save" (saves changes) [disabled]
//! ```
//!
//! Bounds and raw flags never appear in the text.

use crate::node::{Node, UiTree};
use crate::tables::{role_for_class, XCUI_PREFIX};

const DEFAULT_ROLE: &str = "Element";
const INDENT: &str = "  ";

/// Display role for a class: table entry, else the short class name
#[must_use]
pub fn role_label(class: &str) -> String {
    if let Some(role) = role_for_class(class) {
        return role.to_string();
    }

    let short = match class.strip_prefix(XCUI_PREFIX) {
        Some(rest) => rest,
        None => class.rsplit('.').next().unwrap_or(class),
    };
    if short.is_empty() {
        DEFAULT_ROLE.to_string()
    } else {
        short.to_string()
    }
}

/// Serialize a pruned tree; an empty tree renders as an empty string
#[must_use]
pub fn render(tree: &UiTree) -> String {
    tree.preorder()
        .into_iter()
        .filter_map(|(id, depth)| tree.get(id).map(|node| render_line(node, depth)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_line(node: &Node, depth: usize) -> String {
    let mut line = INDENT.repeat(depth);
    line.push_str(&role_label(&node.class));

    if let Some(ref_id) = node.ref_id {
        line.push_str(&format!(" [ref={ref_id}]"));
    }
    if let Some(text) = node.text.as_deref().filter(|t| !t.is_empty()) {
        line.push_str(&format!(" \"{}\"", escape(text)));
    }
    if let Some(label) = node.label.as_deref().filter(|l| !l.is_empty()) {
        line.push_str(&format!(" ({})", escape(label)));
    }

    let states = states(node);
    if !states.is_empty() {
        line.push_str(&format!(" [{}]", states.join(", ")));
    }

    line
}

fn states(node: &Node) -> Vec<&'static str> {
    [
        (node.checked, "checked"),
        (node.selected, "selected"),
        (node.focused, "focused"),
        (!node.enabled, "disabled"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}

/// Keep every node on exactly one line
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
