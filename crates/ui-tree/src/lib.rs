//! # uisnap tree
//!
//! Turns a mobile accessibility dump into a compact, addressable snapshot for UI agents.
//!
//! ## Philosophy
//!
//! The snapshot keeps everything an agent could act on and drops the rest:
//! - Both platform vocabularies land on one canonical [`Node`] shape
//! - Every clickable, editable or scrollable element gets an integer ref
//! - Layout noise (single-child wrappers, empty leaves, repeated rows) is pruned
//! - A ref resolves to the exact geometry of the element it was issued for
//!
//! ## Architecture
//!
//! ```text
//! Raw dump (XML string)
//!     │
//!     ├──> Adapter (Android native dump | iOS automation source)
//!     │      └─> UiTree (canonical arena, invisible subtrees already dropped)
//!     │
//!     ├──> Pruning engine
//!     │      ├─> 1. Ref assignment (pre-order, unmodified tree)
//!     │      ├─> 2. Wrapper collapsing
//!     │      ├─> 3. Empty-leaf removal
//!     │      └─> 4. Sibling dedup
//!     │
//!     ├──> Serializer → snapshot text for the agent
//!     │
//!     └──> RefMap → resolve / scroll_span / gesture for the interaction layer
//! ```
//!
//! ## Example
//!
//! ```rust
//! use uisnap_tree::{Platform, SnapshotSession};
//!
//! let dump = r#"<hierarchy rotation="0">
//!   <node class="android.widget.FrameLayout" bounds="[0,0][1080,1920]">
//!     <node class="android.widget.Button" text="OK" clickable="true" bounds="[0,0][100,50]"/>
//!   </node>
//! </hierarchy>"#;
//!
//! let mut session = SnapshotSession::new(Platform::Android);
//! let snapshot = session.snapshot(dump);
//! assert_eq!(snapshot.text, r#"Button [ref=0] "OK""#);
//!
//! let point = session.resolve(0).unwrap();
//! assert_eq!((point.x, point.y), (50, 25));
//! ```

pub mod adapter;
mod config;
mod error;
mod node;
mod platform;
mod prune;
mod render;
mod resolve;
mod session;
mod tables;

pub use adapter::audit::{adapt_audit, parse_caption, try_adapt_audit, Caption};
pub use adapter::bounds::parse_bounds;
pub use adapter::{adapt, adapt_auto, try_adapt, ParseFailure};
pub use config::GestureConfig;
pub use error::{Result, UiTreeError};
pub use node::{Bounds, Node, NodeId, Point, UiTree};
pub use platform::Platform;
pub use prune::{prune, PruneStats, PrunedTree, RefMap};
pub use render::{render, role_label};
pub use resolve::{gesture, resolve, scroll_span, Gesture, GestureKind, ScrollDirection};
pub use session::{Snapshot, SnapshotSession};
