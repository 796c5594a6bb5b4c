//! iOS accessibility-audit elements.
//!
//! The audit channel lists elements flat, each described only by its spoken
//! caption, e.g. `"Wi-Fi, vanCampers, Button"` (label, value, role).

use super::ParseFailure;
use crate::node::{Node, UiTree};
use crate::tables::{capability_for_type, is_toggle_type, SYNTHETIC_ROOT_CLASS};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role tokens that can close a caption
static CAPTION_ROLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "Button",
        "Header",
        "StaticText",
        "TextField",
        "SecureTextField",
        "Image",
        "Cell",
        "Table",
        "Switch",
        "Slider",
        "Link",
        "NavigationBar",
        "TabBar",
        "Tab",
        "SearchField",
        "Alert",
        "Sheet",
        "Toolbar",
        "SegmentedControl",
        "Picker",
        "ScrollView",
        "PageIndicator",
        "ProgressIndicator",
        "ActivityIndicator",
        "Stepper",
        "Map",
        "WebView",
        "Toggle",
        "Checkbox",
        "Adjustable",
        "Selected",
        "Heading",
    ])
});

const SELECTED_TOKEN: &str = "Selected";

/// A caption split into its parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub label: String,
    pub role: String,
    pub value: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
}

impl Caption {
    fn is_selected(&self) -> bool {
        self.role == SELECTED_TOKEN
            || self.value.as_deref() == Some(SELECTED_TOKEN)
            || self.traits.iter().any(|t| t == SELECTED_TOKEN)
    }
}

/// Split a caption into label, value, traits and role.
///
/// The first part is the label. The role is the last known role token after
/// it; parts in between are the value followed by traits.
#[must_use]
pub fn parse_caption(caption: &str) -> Caption {
    if caption.is_empty() {
        return Caption::default();
    }

    let parts: Vec<&str> = caption.split(", ").map(str::trim).collect();
    if parts.len() == 1 {
        return Caption {
            label: parts[0].to_string(),
            ..Default::default()
        };
    }

    let role_idx = (1..parts.len())
        .rev()
        .find(|&i| CAPTION_ROLES.contains(parts[i]))
        .unwrap_or(parts.len());
    let role = parts.get(role_idx).copied().unwrap_or_default();

    let middle = &parts[1..role_idx];
    Caption {
        label: parts[0].to_string(),
        role: role.to_string(),
        value: middle.first().map(|v| (*v).to_string()),
        traits: middle.iter().skip(1).map(|t| (*t).to_string()).collect(),
    }
}

#[derive(Debug, Deserialize)]
struct AuditElement {
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    traits: Vec<String>,
}

impl AuditElement {
    fn into_caption(self) -> Caption {
        match self.caption.as_deref().filter(|c| !c.is_empty()) {
            Some(caption) => parse_caption(caption),
            None => Caption {
                label: self.label.unwrap_or_default(),
                role: self.role.unwrap_or_default(),
                value: self.value,
                traits: self.traits,
            },
        }
    }
}

/// Convert an audit element list (JSON array) into a flat canonical tree
#[must_use]
pub fn adapt_audit(raw: &str) -> Option<UiTree> {
    match try_adapt_audit(raw) {
        Ok(tree) => Some(tree),
        Err(failure) => {
            log::debug!("audit dump produced no tree: {failure}");
            None
        }
    }
}

/// Like [`adapt_audit`], keeping the failure reason
pub fn try_adapt_audit(raw: &str) -> Result<UiTree, ParseFailure> {
    if raw.trim().is_empty() {
        return Err(ParseFailure::Empty);
    }
    let elements: Vec<AuditElement> =
        serde_json::from_str(raw).map_err(|e| ParseFailure::Json(e.to_string()))?;
    if elements.is_empty() {
        return Err(ParseFailure::NoRoot);
    }

    let mut tree = UiTree::new();
    let root = tree.add(Node::new(SYNTHETIC_ROOT_CLASS));
    for element in elements {
        tree.add_child(root, caption_node(&element.into_caption()));
    }
    tree.set_root(Some(root));
    Ok(tree)
}

fn caption_node(caption: &Caption) -> Node {
    let capability = capability_for_type(&caption.role);
    let checked = is_toggle_type(&caption.role)
        && matches!(caption.value.as_deref(), Some("1" | "On" | "on"));

    Node {
        text: Some(caption.label.clone()).filter(|l| !l.is_empty()),
        label: caption
            .value
            .clone()
            .filter(|v| !v.is_empty() && v != SELECTED_TOKEN),
        clickable: capability.clickable,
        editable: capability.editable,
        scrollable: capability.scrollable,
        checked,
        selected: caption.is_selected(),
        ..Node::new(caption.role.clone())
    }
}
