use serde::{Deserialize, Serialize};

/// Axis-aligned element rectangle in platform units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Bounds {
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from an origin and a size
    #[must_use]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x.saturating_add(width),
            y2: y.saturating_add(height),
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1)
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Integer center of the rectangle
    #[must_use]
    pub fn center(&self) -> Point {
        let x = (i64::from(self.x1) + i64::from(self.x2)) / 2;
        let y = (i64::from(self.y1) + i64::from(self.y2)) / 2;
        Point::new(x as i32, y as i32)
    }
}

/// A screen coordinate handed to the interaction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Handle of a node inside one [`UiTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One UI element in the canonical, platform-independent shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Platform class or element type (e.g. `android.widget.Button`)
    pub class: String,

    /// Display text
    pub text: Option<String>,

    /// Secondary accessibility label
    pub label: Option<String>,

    /// Platform element id, informational only
    pub identifier: Option<String>,

    /// Geometry, absent when the dump carried none or it did not parse
    pub bounds: Option<Bounds>,

    pub clickable: bool,
    pub scrollable: bool,
    pub editable: bool,
    pub enabled: bool,
    pub checked: bool,
    pub selected: bool,
    pub focused: bool,
    pub visible: bool,

    /// Ordered children, as handles into the owning arena
    #[serde(default)]
    pub children: Vec<NodeId>,

    /// Snapshot ref, set only on interactive nodes during pruning
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<u32>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            class: String::new(),
            text: None,
            label: None,
            identifier: None,
            bounds: None,
            clickable: false,
            scrollable: false,
            editable: false,
            enabled: true,
            checked: false,
            selected: false,
            focused: false,
            visible: true,
            children: Vec::new(),
            ref_id: None,
        }
    }
}

impl Node {
    /// Create a node of the given class with default flags
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Default::default()
        }
    }

    /// Builder: set text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: set secondary label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set bounds
    #[must_use]
    pub const fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Builder: mark clickable
    #[must_use]
    pub const fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    /// Builder: mark editable
    #[must_use]
    pub const fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    /// Builder: mark scrollable
    #[must_use]
    pub const fn scrollable(mut self) -> Self {
        self.scrollable = true;
        self
    }

    /// Whether the agent can act on this node (and so it earns a ref)
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.clickable || self.editable || self.scrollable
    }

    /// Whether any state worth rendering is set
    #[must_use]
    pub const fn has_state(&self) -> bool {
        self.checked || self.selected || self.focused
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn has_label(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// Arena holding every node of one snapshot stage.
///
/// Children and refs point at nodes by [`NodeId`]; a handle is only
/// meaningful for the arena that issued it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl UiTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Add a detached node, returning its handle
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add a node and append it to `parent`'s children
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.add(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get node data
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Root node data
    #[must_use]
    pub fn root_node(&self) -> Option<&Node> {
        self.root.and_then(|id| self.get(id))
    }

    /// Number of nodes stored in the arena
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order walk from the root yielding `(id, depth)`
    #[must_use]
    pub fn preorder(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.root.into_iter().map(|id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            out.push((id, depth));
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }

        out
    }

    /// Number of nodes reachable from the root
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.preorder().len()
    }
}
