//! Platform adapters: raw dump string in, canonical [`UiTree`] out.
//!
//! Adapters are total. Empty input, an error sentinel from the dump tool and
//! malformed XML all come back as `None` from [`adapt`]; [`try_adapt`] keeps
//! the reason for callers that want to report it.

pub mod audit;
pub mod bounds;
mod native;
mod remote;

use crate::node::{Node, NodeId, UiTree};
use crate::platform::Platform;
use crate::tables::SYNTHETIC_ROOT_CLASS;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Why a dump produced no usable tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// Nothing but whitespace
    #[error("Empty dump")]
    Empty,

    /// The dump tool reported a failure instead of a tree
    #[error("Dump reported an error: {0}")]
    ErrorSentinel(String),

    /// Malformed markup
    #[error("XML error: {0}")]
    Xml(String),

    /// Malformed audit payload
    #[error("JSON error: {0}")]
    Json(String),

    /// Well-formed, but no element maps to a node
    #[error("Dump contains no elements")]
    NoRoot,
}

/// Convert a raw dump into a canonical tree, or `None` when it holds no usable tree
#[must_use]
pub fn adapt(platform: Platform, raw: &str) -> Option<UiTree> {
    match try_adapt(platform, raw) {
        Ok(tree) => Some(tree),
        Err(failure) => {
            log::debug!("{platform} dump produced no tree: {failure}");
            None
        }
    }
}

/// Detect the platform from the content, then adapt
#[must_use]
pub fn adapt_auto(raw: &str) -> Option<UiTree> {
    let Some(platform) = Platform::detect(raw) else {
        log::debug!("could not detect platform of {} byte dump", raw.len());
        return None;
    };
    adapt(platform, raw)
}

/// Like [`adapt`], keeping the failure reason
pub fn try_adapt(platform: Platform, raw: &str) -> Result<UiTree, ParseFailure> {
    match platform {
        Platform::Android => build_tree(raw, native::map_element),
        Platform::Ios => build_tree(raw, remote::map_element),
    }
}

/// What an adapter makes of one XML element
pub(crate) enum Mapped {
    /// A canonical node
    Node(Node),
    /// Not a node; its children attach to the nearest node ancestor
    Transparent,
    /// Explicitly invisible; the element and its whole subtree are dropped
    Hidden,
}

enum Frame {
    Node(NodeId),
    Transparent(Option<NodeId>),
    Hidden,
}

/// Decoded attributes of one element, in document order
pub(crate) struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub(crate) fn from_start(start: &BytesStart<'_>) -> Self {
        let mut out = Vec::new();
        for attr in start.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            out.push((key, value));
        }
        Self(out)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value with empty strings folded into `None`
    pub(crate) fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Boolean attribute; `None` when absent or unrecognised
    pub(crate) fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)?.trim() {
            v if v.eq_ignore_ascii_case("true") || v == "1" => Some(true),
            v if v.eq_ignore_ascii_case("false") || v == "0" => Some(false),
            _ => None,
        }
    }
}

/// Cut the XML document out of raw dump tool output
fn xml_envelope(raw: &str) -> Result<&str, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::Empty);
    }
    if trimmed.starts_with("ERROR") {
        let first_line = trimmed.lines().next().unwrap_or(trimmed);
        return Err(ParseFailure::ErrorSentinel(first_line.to_string()));
    }

    let start = trimmed
        .find('<')
        .ok_or_else(|| ParseFailure::Xml("no markup in dump".to_string()))?;
    let end = trimmed
        .rfind('>')
        .filter(|end| *end > start)
        .ok_or_else(|| ParseFailure::Xml("no markup in dump".to_string()))?;
    Ok(&trimmed[start..=end])
}

/// Stream the dump and build a canonical tree with `map` deciding per element
pub(crate) fn build_tree(
    raw: &str,
    mut map: impl FnMut(&BytesStart<'_>) -> Mapped,
) -> Result<UiTree, ParseFailure> {
    let xml = xml_envelope(raw)?;
    let mut reader = Reader::from_str(xml);

    let mut tree = UiTree::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut top_level: Vec<NodeId> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref start)) => {
                let frame = place(&mut tree, &stack, &mut top_level, start, &mut map);
                stack.push(frame);
            }
            Ok(Event::Empty(ref start)) => {
                place(&mut tree, &stack, &mut top_level, start, &mut map);
            }
            Ok(Event::End(_)) => {
                if stack.pop().is_none() {
                    return Err(ParseFailure::Xml(format!(
                        "unbalanced end tag at byte {}",
                        reader.buffer_position()
                    )));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseFailure::Xml(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            Ok(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(ParseFailure::Xml(format!(
            "{} unclosed element(s) at end of dump",
            stack.len()
        )));
    }

    let root = match top_level.as_slice() {
        [] => return Err(ParseFailure::NoRoot),
        [single] => *single,
        _ => {
            let mut synthetic = Node::new(SYNTHETIC_ROOT_CLASS);
            synthetic.children = top_level;
            tree.add(synthetic)
        }
    };
    tree.set_root(Some(root));
    Ok(tree)
}

fn place(
    tree: &mut UiTree,
    stack: &[Frame],
    top_level: &mut Vec<NodeId>,
    start: &BytesStart<'_>,
    map: &mut impl FnMut(&BytesStart<'_>) -> Mapped,
) -> Frame {
    let parent = match stack.last() {
        Some(Frame::Hidden) => return Frame::Hidden,
        Some(Frame::Node(id)) => Some(*id),
        Some(Frame::Transparent(parent)) => *parent,
        None => None,
    };

    match map(start) {
        Mapped::Hidden => Frame::Hidden,
        Mapped::Transparent => Frame::Transparent(parent),
        Mapped::Node(node) => {
            let id = match parent {
                Some(parent) => tree.add_child(parent, node),
                None => {
                    let id = tree.add(node);
                    top_level.push(id);
                    id
                }
            };
            Frame::Node(id)
        }
    }
}
