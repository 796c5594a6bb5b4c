use crate::adapter::{adapt, adapt_auto, audit::adapt_audit};
use crate::config::GestureConfig;
use crate::error::Result;
use crate::node::Point;
use crate::platform::Platform;
use crate::prune::{prune, PruneStats, PrunedTree};
use crate::render::render;
use crate::resolve::{self, Gesture, GestureKind, ScrollDirection};
use serde::{Deserialize, Serialize};

/// Where the session's dumps come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Fixed(Platform),
    Detect,
    Audit,
}

/// Result of one snapshot call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Serialized tree for the agent
    pub text: String,
    pub stats: PruneStats,
    /// Snapshot counter of the session that produced this
    pub generation: u64,
}

/// Owns the live pruned tree and ref map for one device.
///
/// Each [`snapshot`](Self::snapshot) replaces both wholesale; refs from an
/// earlier snapshot are never carried over. Callers serialize access per
/// device.
#[derive(Debug, Clone)]
pub struct SnapshotSession {
    source: Source,
    config: GestureConfig,
    current: PrunedTree,
    generation: u64,
}

impl SnapshotSession {
    /// Session reading dumps of a known platform
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self::with_source(Source::Fixed(platform))
    }

    /// Session that sniffs the platform of every dump
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::with_source(Source::Detect)
    }

    /// Session reading accessibility-audit element lists
    #[must_use]
    pub fn audit() -> Self {
        Self::with_source(Source::Audit)
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            config: GestureConfig::default(),
            current: PrunedTree::default(),
            generation: 0,
        }
    }

    /// Builder: set gesture timing
    #[must_use]
    pub const fn with_config(mut self, config: GestureConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Adapt, prune and serialize a raw dump, replacing the current state.
    ///
    /// An unusable dump yields empty text and leaves no refs behind.
    pub fn snapshot(&mut self, raw: &str) -> Snapshot {
        let canonical = match self.source {
            Source::Fixed(platform) => adapt(platform, raw),
            Source::Detect => adapt_auto(raw),
            Source::Audit => adapt_audit(raw),
        };
        if canonical.is_none() {
            log::debug!("snapshot {} has no usable tree", self.generation + 1);
        }

        self.current = prune(canonical);
        self.generation += 1;

        Snapshot {
            text: render(&self.current.tree),
            stats: self.current.stats,
            generation: self.generation,
        }
    }

    /// The tree and ref map of the latest snapshot
    #[must_use]
    pub const fn current(&self) -> &PrunedTree {
        &self.current
    }

    /// Number of snapshots taken so far
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn resolve(&self, ref_id: u32) -> Result<Point> {
        resolve::resolve(ref_id, &self.current)
    }

    pub fn scroll_span(&self, ref_id: u32, direction: ScrollDirection) -> Result<(Point, Point)> {
        resolve::scroll_span(ref_id, direction, &self.current)
    }

    pub fn gesture(&self, ref_id: u32, kind: GestureKind) -> Result<Gesture> {
        resolve::gesture(ref_id, kind, &self.current, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UiTreeError;
    use pretty_assertions::assert_eq;

    const LOGIN: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<hierarchy rotation="0">
  <node class="android.widget.FrameLayout" bounds="[0,0][1080,1920]">
    <node class="android.widget.LinearLayout" bounds="[0,0][1080,1920]">
      <node class="android.widget.TextView" text="Sign in" bounds="[40,100][1040,180]"/>
      <node class="android.widget.EditText" text="" resource-id="app:id/email" clickable="true" focused="true" bounds="[40,200][1040,300]"/>
      <node class="android.widget.Button" text="Continue" clickable="true" bounds="[40,340][1040,440]"/>
    </node>
  </node>
</hierarchy>"#;

    #[test]
    fn test_snapshot_then_resolve() {
        let mut session = SnapshotSession::new(Platform::Android);
        let snapshot = session.snapshot(LOGIN);

        assert_eq!(
            snapshot.text,
            "Group\n  Text \"Sign in\"\n  TextField [ref=0] [focused]\n  Button [ref=1] \"Continue\""
        );
        assert_eq!(snapshot.stats.refs, 2);
        assert_eq!(snapshot.generation, 1);
        assert_eq!(session.resolve(1), Ok(Point::new(540, 390)));
    }

    #[test]
    fn test_new_snapshot_replaces_refs() {
        let mut session = SnapshotSession::new(Platform::Android);
        session.snapshot(LOGIN);
        assert!(session.resolve(1).is_ok());

        let single = r#"<hierarchy><node class="android.widget.Button" text="Only" clickable="true" bounds="[0,0][10,10]"/></hierarchy>"#;
        session.snapshot(single);
        assert_eq!(session.resolve(1), Err(UiTreeError::RefNotFound(1)));
        assert_eq!(session.resolve(0), Ok(Point::new(5, 5)));
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_unusable_dump_clears_state() {
        let mut session = SnapshotSession::new(Platform::Android);
        session.snapshot(LOGIN);

        let snapshot = session.snapshot("ERROR: could not get idle state.");
        assert_eq!(snapshot.text, "");
        assert!(session.current().is_empty());
        assert_eq!(session.resolve(0), Err(UiTreeError::RefNotFound(0)));
    }

    #[test]
    fn test_auto_detect_session() {
        let mut session = SnapshotSession::auto_detect();
        let snapshot = session.snapshot(
            r#"<AppiumAUT><XCUIElementTypeButton type="XCUIElementTypeButton" label="Done" x="0" y="0" width="80" height="40"/></AppiumAUT>"#,
        );
        assert_eq!(snapshot.text, r#"Button [ref=0] "Done""#);
        assert_eq!(session.resolve(0), Ok(Point::new(40, 20)));
    }

    #[test]
    fn test_audit_refs_have_no_bounds() {
        let mut session = SnapshotSession::audit();
        let snapshot = session.snapshot(r#"[{"caption": "Settings, Header"}, {"caption": "Wi-Fi, vanCampers, Button"}]"#);
        assert_eq!(snapshot.text, "Screen\n  Header \"Settings\"\n  Button [ref=0] \"Wi-Fi\" (vanCampers)");
        assert_eq!(session.resolve(0), Err(UiTreeError::MissingBounds(0)));
    }

    #[test]
    fn test_gesture_uses_session_config() {
        let mut session = SnapshotSession::new(Platform::Android).with_config(GestureConfig {
            long_press_ms: 1500,
            swipe_ms: 200,
        });
        session.snapshot(LOGIN);
        assert_eq!(
            session.gesture(1, GestureKind::LongPress),
            Ok(Gesture::LongPress {
                at: Point::new(540, 390),
                duration_ms: 1500
            })
        );
    }
}
