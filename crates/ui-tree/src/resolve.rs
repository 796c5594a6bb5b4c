//! Ref → geometry for the interaction layer.
//!
//! Nothing here issues input events; callers turn the returned points into
//! platform gestures.

use crate::config::GestureConfig;
use crate::error::{Result, UiTreeError};
use crate::node::{Bounds, Point};
use crate::prune::PrunedTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction the content should scroll toward.
///
/// `Down` reveals content below, so the finger travels upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrollDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown scroll direction: {other}")),
        }
    }
}

/// What the caller wants to do with a ref
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Tap,
    LongPress,
    Scroll(ScrollDirection),
}

/// Geometry and timing for one interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gesture {
    Tap { at: Point },
    LongPress { at: Point, duration_ms: u64 },
    Swipe { from: Point, to: Point, duration_ms: u64 },
}

/// Bounds-center of the element behind `ref_id`
pub fn resolve(ref_id: u32, pruned: &PrunedTree) -> Result<Point> {
    bounds_for(ref_id, pruned).map(|bounds| bounds.center())
}

/// Start and end of a swipe across the element, one third of its extent
/// either side of the center
pub fn scroll_span(
    ref_id: u32,
    direction: ScrollDirection,
    pruned: &PrunedTree,
) -> Result<(Point, Point)> {
    let bounds = bounds_for(ref_id, pruned)?;
    let center = bounds.center();
    let dx = bounds.width() / 3;
    let dy = bounds.height() / 3;

    let (from, to) = match direction {
        ScrollDirection::Down => ((0, dy), (0, -dy)),
        ScrollDirection::Up => ((0, -dy), (0, dy)),
        ScrollDirection::Right => ((dx, 0), (-dx, 0)),
        ScrollDirection::Left => ((-dx, 0), (dx, 0)),
    };

    Ok((offset(center, from), offset(center, to)))
}

/// Full gesture for a ref; long-press shares the tap point
pub fn gesture(
    ref_id: u32,
    kind: GestureKind,
    pruned: &PrunedTree,
    config: &GestureConfig,
) -> Result<Gesture> {
    let gesture = match kind {
        GestureKind::Tap => Gesture::Tap {
            at: resolve(ref_id, pruned)?,
        },
        GestureKind::LongPress => Gesture::LongPress {
            at: resolve(ref_id, pruned)?,
            duration_ms: config.long_press_ms,
        },
        GestureKind::Scroll(direction) => {
            let (from, to) = scroll_span(ref_id, direction, pruned)?;
            Gesture::Swipe {
                from,
                to,
                duration_ms: config.swipe_ms,
            }
        }
    };
    log::debug!("ref {ref_id} -> {gesture:?}");
    Ok(gesture)
}

fn bounds_for(ref_id: u32, pruned: &PrunedTree) -> Result<Bounds> {
    let node = pruned
        .node_for_ref(ref_id)
        .ok_or(UiTreeError::RefNotFound(ref_id))?;
    node.bounds.ok_or(UiTreeError::MissingBounds(ref_id))
}

const fn offset(point: Point, (dx, dy): (i32, i32)) -> Point {
    Point::new(point.x.saturating_add(dx), point.y.saturating_add(dy))
}
