//! iOS: the remote UI-automation page source.
//!
//! This vocabulary has no clickable/editable/scrollable flags, so those come
//! from the element type via the capability table.

use super::bounds::bounds_from_frame;
use super::{Attrs, Mapped};
use crate::node::Node;
use crate::tables::{capability_for_type, is_toggle_type, XCUI_PREFIX};
use quick_xml::events::BytesStart;

const DOCUMENT_WRAPPER: &[u8] = b"AppiumAUT";

pub(crate) fn map_element(start: &BytesStart<'_>) -> Mapped {
    let name = start.name();
    if name.as_ref() == DOCUMENT_WRAPPER {
        return Mapped::Transparent;
    }

    let attrs = Attrs::from_start(start);
    let tag = String::from_utf8_lossy(name.as_ref()).into_owned();
    let type_name = match attrs.non_empty("type") {
        Some(type_name) => type_name,
        None if tag.starts_with(XCUI_PREFIX) => tag,
        None => return Mapped::Transparent,
    };

    if attrs.flag("visible") == Some(false) {
        return Mapped::Hidden;
    }

    let text = attrs.non_empty("label");
    let label = if text.is_none() {
        attrs.non_empty("name")
    } else {
        None
    };
    let checked = is_toggle_type(&type_name) && attrs.get("value").map(str::trim) == Some("1");
    let capability = capability_for_type(&type_name);

    Mapped::Node(Node {
        text,
        label,
        identifier: attrs.non_empty("name"),
        bounds: bounds_from_frame(
            attrs.get("x"),
            attrs.get("y"),
            attrs.get("width"),
            attrs.get("height"),
        ),
        clickable: capability.clickable,
        scrollable: capability.scrollable,
        editable: capability.editable,
        enabled: attrs.flag("enabled").unwrap_or(true),
        checked,
        selected: attrs.flag("selected").unwrap_or(false),
        focused: attrs.flag("focused").unwrap_or(false),
        visible: true,
        class: type_name,
        children: Vec::new(),
        ref_id: None,
    })
}
