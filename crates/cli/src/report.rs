use serde_json::json;
use uisnap_protocol::{
    ErrorEnvelope, GesturePayload, NextAction, Point, Rect, RefEntry, ResolveResponse,
    SnapshotResponse, SnapshotStats, SNAPSHOT_SCHEMA_VERSION,
};
use uisnap_tree::{role_label, Gesture, PrunedTree, Snapshot, UiTreeError};

pub(crate) const NO_TREE: &str = "no_tree";

pub(crate) fn snapshot_response(
    platform: Option<&str>,
    snapshot: &Snapshot,
    pruned: &PrunedTree,
) -> SnapshotResponse {
    SnapshotResponse {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        platform: platform.map(str::to_string),
        generation: snapshot.generation,
        text: snapshot.text.clone(),
        stats: SnapshotStats {
            input_nodes: snapshot.stats.input_nodes,
            output_nodes: snapshot.stats.output_nodes,
            refs: snapshot.stats.refs,
        },
        refs: ref_entries(pruned),
    }
}

fn ref_entries(pruned: &PrunedTree) -> Vec<RefEntry> {
    pruned
        .refs
        .keys()
        .filter_map(|&ref_id| {
            let node = pruned.node_for_ref(ref_id)?;
            Some(RefEntry {
                ref_id,
                role: role_label(&node.class),
                text: node.text.clone(),
                label: node.label.clone(),
                bounds: node.bounds.map(|b| Rect {
                    x1: b.x1,
                    y1: b.y1,
                    x2: b.x2,
                    y2: b.y2,
                }),
                center: node.bounds.map(|b| point(b.center())),
            })
        })
        .collect()
}

pub(crate) fn resolve_response(ref_id: u32, pruned: &PrunedTree, gesture: Gesture) -> ResolveResponse {
    ResolveResponse {
        ref_id,
        role: pruned
            .node_for_ref(ref_id)
            .map(|node| role_label(&node.class))
            .unwrap_or_default(),
        gesture: gesture_payload(gesture),
    }
}

const fn point(p: uisnap_tree::Point) -> Point {
    Point { x: p.x, y: p.y }
}

const fn gesture_payload(gesture: Gesture) -> GesturePayload {
    match gesture {
        Gesture::Tap { at } => GesturePayload::Tap { at: point(at) },
        Gesture::LongPress { at, duration_ms } => GesturePayload::LongPress {
            at: point(at),
            duration_ms,
        },
        Gesture::Swipe {
            from,
            to,
            duration_ms,
        } => GesturePayload::Swipe {
            from: point(from),
            to: point(to),
            duration_ms,
        },
    }
}

fn snapshot_action(reason: &str) -> NextAction {
    NextAction {
        command: "snapshot".to_string(),
        args: json!({}),
        reason: reason.to_string(),
    }
}

pub(crate) fn error_envelope(err: &UiTreeError) -> ErrorEnvelope {
    let envelope = ErrorEnvelope::new(err.code(), err.to_string());
    match err {
        UiTreeError::RefNotFound(ref_id) => envelope
            .with_details(json!({ "ref": ref_id }))
            .with_hint("Refs are only valid for the snapshot that issued them")
            .with_next_action(snapshot_action("list the refs of the current screen")),
        UiTreeError::MissingBounds(ref_id) => envelope
            .with_details(json!({ "ref": ref_id }))
            .with_hint("The element has no on-screen geometry; pick another ref"),
        UiTreeError::InvalidConfig(_) => envelope,
    }
}

pub(crate) fn no_tree_envelope() -> ErrorEnvelope {
    ErrorEnvelope::new(NO_TREE, "The dump produced no usable tree")
        .with_hint("The device may be mid-transition; capture a new dump")
        .with_next_action(snapshot_action("retry with a fresh dump"))
}
