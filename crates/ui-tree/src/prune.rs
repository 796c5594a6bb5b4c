//! The pruning engine.
//!
//! 1. Ref assignment: pre-order over the unmodified canonical tree.
//! 2. Wrapper collapsing: a generic container with one child, no ref and no
//!    text or label is replaced by that child.
//! 3. Empty-leaf removal: childless nodes with no ref, text, label or state go.
//! 4. Sibling dedup: consecutive ref-free siblings with the same class and
//!    text keep only the first. Siblings without text match each other.
//!
//! Stages 2-4 run in one bottom-up walk over an explicit work list, so deep
//! dumps never grow the call stack. A node's child list is final
//! (children pruned, then deduplicated) before the node itself is tested for
//! collapse or removal, so the output is a fixed point of the walk. Survivors
//! are then copied forward in pre-order into a fresh arena; the [`RefMap`]
//! points into that arena.

use crate::node::{Node, NodeId, UiTree};
use crate::tables::is_wrapper_class;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First ref handed out in every snapshot
pub const REF_BASE: u32 = 0;

/// Ref → surviving node in the pruned arena
pub type RefMap = BTreeMap<u32, NodeId>;

/// Node and ref counts for one pruning run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneStats {
    /// Nodes in the canonical tree
    pub input_nodes: usize,
    /// Nodes that survived pruning
    pub output_nodes: usize,
    /// Refs issued
    pub refs: usize,
}

/// Output of [`prune`]: the surviving tree plus its ref map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrunedTree {
    pub tree: UiTree,
    pub refs: RefMap,
    pub stats: PruneStats,
}

impl PrunedTree {
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    /// The node a ref was issued for
    #[must_use]
    pub fn node_for_ref(&self, ref_id: u32) -> Option<&Node> {
        self.refs.get(&ref_id).and_then(|id| self.tree.get(*id))
    }

    /// Whether the whole tree pruned away
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.root().is_none()
    }
}

/// Run all four stages over a canonical tree.
///
/// `None` in gives an empty tree and an empty map. Deterministic: the same
/// input always yields the same arena, refs and handles.
#[must_use]
pub fn prune(canonical: Option<UiTree>) -> PrunedTree {
    let Some(mut tree) = canonical else {
        return PrunedTree::default();
    };

    let input_nodes = tree.reachable_count();
    let assigned = assign_refs(&mut tree);
    let (pruned, remap) = compact(&tree);

    let mut refs = RefMap::new();
    for (ref_id, old) in assigned {
        match remap.get(old.index()).copied().flatten() {
            Some(new) => {
                refs.insert(ref_id, new);
            }
            None => log::warn!("ref {ref_id} was pruned away"),
        }
    }

    let stats = PruneStats {
        input_nodes,
        output_nodes: pruned.len(),
        refs: refs.len(),
    };
    log::debug!(
        "pruned {} -> {} nodes, {} refs",
        stats.input_nodes,
        stats.output_nodes,
        stats.refs
    );

    PrunedTree {
        tree: pruned,
        refs,
        stats,
    }
}

/// Stage 1: number interactive nodes in document order
fn assign_refs(tree: &mut UiTree) -> Vec<(u32, NodeId)> {
    let mut next = REF_BASE;
    let mut assigned = Vec::new();

    for (id, _) in tree.preorder() {
        let Some(node) = tree.get_mut(id) else {
            continue;
        };
        if node.is_interactive() {
            node.ref_id = Some(next);
            assigned.push((next, id));
            next += 1;
        } else {
            node.ref_id = None;
        }
    }

    assigned
}

/// Stages 2-4, returning the new arena and an old→new handle map
fn compact(src: &UiTree) -> (UiTree, Vec<Option<NodeId>>) {
    let mut plan = Plan {
        src,
        kept_children: vec![Vec::new(); src.len()],
        carries_ref: vec![false; src.len()],
    };
    let survivor = plan.run();

    let mut remap = vec![None; src.len()];
    let out = match survivor {
        Some(root) => copy_forward(src, &plan.kept_children, root, &mut remap),
        None => UiTree::new(),
    };

    (out, remap)
}

struct Plan<'a> {
    src: &'a UiTree,
    /// Final child list of every node that survives as itself
    kept_children: Vec<Vec<NodeId>>,
    /// Whether the node or anything below it holds a ref
    carries_ref: Vec<bool>,
}

impl Plan<'_> {
    /// Decide every node bottom-up and return what the root becomes.
    ///
    /// Reverse pre-order visits each child before its parent, so a node's
    /// child outcomes are settled by the time it is decided.
    fn run(&mut self) -> Option<NodeId> {
        let root = self.src.root()?;
        let mut outcome: Vec<Option<NodeId>> = vec![None; self.src.len()];
        for (id, _) in self.src.preorder().into_iter().rev() {
            let decided = self.decide(id, &outcome);
            outcome[id.index()] = decided;
        }
        outcome[root.index()]
    }

    /// What `id` becomes: itself, a collapsed descendant, or nothing
    fn decide(&mut self, id: NodeId, outcome: &[Option<NodeId>]) -> Option<NodeId> {
        let src = self.src;
        let node = src.get(id)?;

        let kids: Vec<NodeId> = node
            .children
            .iter()
            .filter_map(|child| outcome.get(child.index()).copied().flatten())
            .collect();
        let kids = self.dedup_siblings(kids);

        let carries = node.ref_id.is_some() || kids.iter().any(|kid| self.carries_ref[kid.index()]);
        self.carries_ref[id.index()] = carries;

        if is_transparent_wrapper(node) && kids.len() == 1 {
            return Some(kids[0]);
        }

        if kids.is_empty() && is_empty_leaf(node) {
            return None;
        }

        self.kept_children[id.index()] = kids;
        Some(id)
    }

    fn dedup_siblings(&self, kids: Vec<NodeId>) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::with_capacity(kids.len());
        for kid in kids {
            if let Some(&prev) = out.last() {
                if self.is_repeat(prev, kid) {
                    continue;
                }
            }
            out.push(kid);
        }
        out
    }

    /// Same class and text, and neither side holds a ref anywhere below it
    fn is_repeat(&self, prev: NodeId, kid: NodeId) -> bool {
        if self.carries_ref[prev.index()] || self.carries_ref[kid.index()] {
            return false;
        }
        let (Some(a), Some(b)) = (self.src.get(prev), self.src.get(kid)) else {
            return false;
        };
        // Labels are not part of the key; two missing texts match.
        a.class == b.class && a.text == b.text
    }
}

fn is_transparent_wrapper(node: &Node) -> bool {
    is_wrapper_class(&node.class) && node.ref_id.is_none() && !node.has_text() && !node.has_label()
}

fn is_empty_leaf(node: &Node) -> bool {
    node.ref_id.is_none() && !node.has_text() && !node.has_label() && !node.has_state()
}

/// Copy survivors into a fresh arena in pre-order, recording old→new handles
fn copy_forward(
    src: &UiTree,
    kept_children: &[Vec<NodeId>],
    root: NodeId,
    remap: &mut [Option<NodeId>],
) -> UiTree {
    let mut out = UiTree::new();
    let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(root, None)];

    while let Some((id, parent)) = stack.pop() {
        let Some(node) = src.get(id) else {
            continue;
        };
        let mut node = node.clone();
        node.children = Vec::new();

        let new_id = match parent {
            Some(parent) => out.add_child(parent, node),
            None => {
                let new_id = out.add(node);
                out.set_root(Some(new_id));
                new_id
            }
        };
        remap[id.index()] = Some(new_id);

        for &child in kept_children[id.index()].iter().rev() {
            stack.push((child, Some(new_id)));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Bounds;
    use pretty_assertions::assert_eq;

    const FRAME: &str = "android.widget.FrameLayout";
    const LINEAR: &str = "android.widget.LinearLayout";
    const TEXT: &str = "android.widget.TextView";
    const BUTTON: &str = "android.widget.Button";

    fn tree_with_root(build: impl FnOnce(&mut UiTree) -> NodeId) -> UiTree {
        let mut tree = UiTree::new();
        let root = build(&mut tree);
        tree.set_root(Some(root));
        tree
    }

    fn shape(tree: &UiTree) -> Vec<(usize, String, Option<String>, Option<u32>)> {
        tree.preorder()
            .into_iter()
            .map(|(id, depth)| {
                let node = tree.get(id).unwrap();
                (depth, node.class.clone(), node.text.clone(), node.ref_id)
            })
            .collect()
    }

    #[test]
    fn test_none_input() {
        let pruned = prune(None);
        assert!(pruned.is_empty());
        assert!(pruned.refs.is_empty());
        assert_eq!(pruned.stats, PruneStats::default());
    }

    #[test]
    fn test_nested_wrappers_collapse_to_button() {
        let tree = tree_with_root(|t| {
            let a = t.add(Node::new(FRAME));
            let b = t.add_child(a, Node::new(LINEAR));
            let c = t.add_child(b, Node::new(FRAME));
            t.add_child(c, Node::new(BUTTON).text("OK").clickable());
            a
        });

        let pruned = prune(Some(tree));
        assert_eq!(
            shape(&pruned.tree),
            vec![(0, BUTTON.to_string(), Some("OK".to_string()), Some(0))]
        );
        assert_eq!(pruned.tree.len(), 1);
        assert_eq!(pruned.refs.get(&0), pruned.root().as_ref());
    }

    #[test]
    fn test_wrapper_with_two_children_kept() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(FRAME));
            t.add_child(root, Node::new(TEXT).text("a"));
            t.add_child(root, Node::new(TEXT).text("b"));
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(pruned.tree.root_node().unwrap().class, FRAME);
        assert_eq!(pruned.tree.len(), 3);
    }

    #[test]
    fn test_wrapper_with_text_or_label_kept() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(FRAME).label("card"));
            t.add_child(root, Node::new(TEXT).text("a"));
            root
        });
        assert_eq!(prune(Some(tree)).tree.len(), 2);
    }

    #[test]
    fn test_interactive_wrapper_not_collapsed() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(LINEAR).clickable());
            t.add_child(root, Node::new(TEXT).text("row"));
            root
        });
        let pruned = prune(Some(tree));
        assert_eq!(
            shape(&pruned.tree),
            vec![
                (0, LINEAR.to_string(), None, Some(0)),
                (1, TEXT.to_string(), Some("row".to_string()), None),
            ]
        );
    }

    #[test]
    fn test_empty_leaves_removed_text_leaf_kept() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("android.widget.ScrollView").scrollable());
            t.add_child(root, Node::new("android.view.View"));
            t.add_child(root, Node::new("android.widget.ImageView"));
            t.add_child(root, Node::new(TEXT).text("keep me"));
            let mut checked = Node::new("android.widget.CheckBox");
            checked.checked = true;
            t.add_child(root, checked);
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(
            shape(&pruned.tree),
            vec![
                (0, "android.widget.ScrollView".to_string(), None, Some(0)),
                (1, TEXT.to_string(), Some("keep me".to_string()), None),
                (1, "android.widget.CheckBox".to_string(), None, None),
            ]
        );
    }

    #[test]
    fn test_five_identical_siblings_keep_one() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("androidx.recyclerview.widget.RecyclerView"));
            for _ in 0..5 {
                t.add_child(root, Node::new(TEXT).text("Loading"));
            }
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(
            shape(&pruned.tree),
            vec![
                (0, "androidx.recyclerview.widget.RecyclerView".to_string(), None, None),
                (1, TEXT.to_string(), Some("Loading".to_string()), None),
            ]
        );
    }

    #[test]
    fn test_dedup_only_collapses_consecutive_runs() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("androidx.recyclerview.widget.RecyclerView"));
            for text in ["a", "a", "b", "a"] {
                t.add_child(root, Node::new(TEXT).text(text));
            }
            root
        });

        let texts: Vec<Option<String>> = shape(&prune(Some(tree)).tree)
            .into_iter()
            .skip(1)
            .map(|(_, _, text, _)| text)
            .collect();
        assert_eq!(
            texts,
            vec![Some("a".to_string()), Some("b".to_string()), Some("a".to_string())]
        );
    }

    #[test]
    fn test_dedup_never_removes_ref_carriers() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("androidx.recyclerview.widget.RecyclerView"));
            for _ in 0..3 {
                t.add_child(root, Node::new(BUTTON).text("Buy").clickable());
            }
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(pruned.tree.len(), 4);
        assert_eq!(pruned.refs.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_dedup_keeps_rows_holding_refs_below() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("androidx.recyclerview.widget.RecyclerView"));
            for _ in 0..2 {
                let row = t.add_child(root, Node::new(LINEAR).text("Row"));
                t.add_child(row, Node::new(BUTTON).text("Open").clickable());
            }
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(pruned.refs.len(), 2);
        assert_eq!(pruned.tree.len(), 5);
    }

    #[test]
    fn test_dedup_ignores_label_differences() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("androidx.recyclerview.widget.RecyclerView"));
            t.add_child(root, Node::new(TEXT).text("Item").label("first"));
            t.add_child(root, Node::new(TEXT).text("Item").label("second"));
            root
        });
        assert_eq!(prune(Some(tree)).tree.len(), 2);
    }

    #[test]
    fn test_textless_siblings_dedup_on_class() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("androidx.recyclerview.widget.RecyclerView"));
            for _ in 0..5 {
                let mut star = Node::new("android.widget.ImageView").label("star");
                star.selected = true;
                t.add_child(root, star);
            }
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(
            shape(&pruned.tree),
            vec![
                (0, "androidx.recyclerview.widget.RecyclerView".to_string(), None, None),
                (1, "android.widget.ImageView".to_string(), None, None),
            ]
        );
        assert_eq!(pruned.tree.len(), 2);
    }

    #[test]
    fn test_textless_siblings_of_other_classes_kept() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new("androidx.recyclerview.widget.RecyclerView"));
            t.add_child(root, Node::new("android.widget.ImageView").label("star"));
            t.add_child(root, Node::new("android.widget.ProgressBar").label("busy"));
            t.add_child(root, Node::new("android.widget.ImageView").label("star"));
            root
        });
        assert_eq!(prune(Some(tree)).tree.len(), 4);
    }

    #[test]
    fn test_refs_follow_document_order_not_pruned_shape() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(FRAME));
            let wrap = t.add_child(root, Node::new(LINEAR));
            t.add_child(wrap, Node::new(BUTTON).text("first").clickable());
            t.add_child(root, Node::new("android.widget.EditText").editable());
            t.add_child(root, Node::new("android.widget.ListView").scrollable());
            root
        });

        let pruned = prune(Some(tree));
        let by_ref: Vec<(u32, String)> = pruned
            .refs
            .iter()
            .map(|(r, id)| (*r, pruned.tree.get(*id).unwrap().class.clone()))
            .collect();
        assert_eq!(
            by_ref,
            vec![
                (0, BUTTON.to_string()),
                (1, "android.widget.EditText".to_string()),
                (2, "android.widget.ListView".to_string()),
            ]
        );
    }

    #[test]
    fn test_ref_map_points_at_surviving_nodes() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(FRAME));
            let wrap = t.add_child(root, Node::new(LINEAR));
            t.add_child(
                wrap,
                Node::new(BUTTON)
                    .text("Save")
                    .clickable()
                    .bounds(Bounds::new(0, 0, 10, 10)),
            );
            t.add_child(root, Node::new(TEXT).text("caption"));
            root
        });

        let pruned = prune(Some(tree));
        let reachable: Vec<NodeId> = pruned.tree.preorder().into_iter().map(|(id, _)| id).collect();
        for (ref_id, id) in &pruned.refs {
            assert!(reachable.contains(id));
            assert_eq!(pruned.tree.get(*id).unwrap().ref_id, Some(*ref_id));
        }
        assert_eq!(
            pruned.node_for_ref(0).unwrap().bounds,
            Some(Bounds::new(0, 0, 10, 10))
        );
    }

    #[test]
    fn test_everything_prunes_away() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(FRAME));
            let inner = t.add_child(root, Node::new(LINEAR));
            t.add_child(inner, Node::new("android.view.View"));
            root
        });

        let pruned = prune(Some(tree));
        assert!(pruned.is_empty());
        assert!(pruned.refs.is_empty());
        assert_eq!(pruned.stats.input_nodes, 3);
        assert_eq!(pruned.stats.output_nodes, 0);
    }

    #[test]
    fn test_dedup_then_collapse_reaches_fixed_point() {
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(FRAME));
            t.add_child(root, Node::new(TEXT).text("same"));
            t.add_child(root, Node::new(TEXT).text("same"));
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(
            shape(&pruned.tree),
            vec![(0, TEXT.to_string(), Some("same".to_string()), None)]
        );

        let (again, _) = compact(&pruned.tree);
        assert_eq!(again, pruned.tree);
    }

    #[test]
    fn test_deep_wrapper_chain_collapses_without_recursion() {
        const DEPTH: usize = 50_000;
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(FRAME));
            let mut parent = root;
            for _ in 0..DEPTH {
                parent = t.add_child(parent, Node::new(FRAME));
            }
            t.add_child(parent, Node::new(BUTTON).text("OK").clickable());
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(pruned.stats.input_nodes, DEPTH + 2);
        assert_eq!(
            shape(&pruned.tree),
            vec![(0, BUTTON.to_string(), Some("OK".to_string()), Some(0))]
        );
    }

    #[test]
    fn test_deep_labelled_chain_survives_intact() {
        const DEPTH: usize = 20_000;
        let tree = tree_with_root(|t| {
            let root = t.add(Node::new(LINEAR).label("level"));
            let mut parent = root;
            for _ in 0..DEPTH {
                parent = t.add_child(parent, Node::new(LINEAR).label("level"));
            }
            root
        });

        let pruned = prune(Some(tree));
        let order = pruned.tree.preorder();
        assert_eq!(order.len(), DEPTH + 1);
        assert_eq!(order.last().map(|(_, depth)| *depth), Some(DEPTH));
        let (again, _) = compact(&pruned.tree);
        assert_eq!(again, pruned.tree);
    }

    #[test]
    fn test_stale_refs_are_reassigned() {
        let tree = tree_with_root(|t| {
            let mut stale = Node::new(TEXT).text("old");
            stale.ref_id = Some(42);
            let root = t.add(Node::new(FRAME));
            t.add_child(root, stale);
            t.add_child(root, Node::new(BUTTON).clickable().text("new"));
            root
        });

        let pruned = prune(Some(tree));
        assert_eq!(pruned.refs.keys().copied().collect::<Vec<_>>(), vec![0]);
        assert!(pruned
            .tree
            .preorder()
            .into_iter()
            .all(|(id, _)| pruned.tree.get(id).unwrap().ref_id != Some(42)));
    }
}
