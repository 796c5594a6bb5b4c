//! Android: the native accessibility dump.
//!
//! ```text
//! <hierarchy rotation="0">
//!   <node class="android.widget.Button" text="OK" resource-id="app:id/ok"
//!         content-desc="" clickable="true" enabled="true" bounds="[0,0][100,50]"/>
//! </hierarchy>
//! ```

use super::bounds::parse_bounds;
use super::{Attrs, Mapped};
use crate::node::Node;
use crate::tables::is_editable_class;
use quick_xml::events::BytesStart;

pub(crate) fn map_element(start: &BytesStart<'_>) -> Mapped {
    if start.name().as_ref() != b"node" {
        return Mapped::Transparent;
    }

    let attrs = Attrs::from_start(start);
    if attrs.flag("visible-to-user") == Some(false) {
        return Mapped::Hidden;
    }

    let class = attrs.get("class").unwrap_or_default().to_string();
    let editable = is_editable_class(&class);

    Mapped::Node(Node {
        text: attrs.non_empty("text"),
        label: attrs.non_empty("content-desc"),
        identifier: attrs.non_empty("resource-id"),
        bounds: attrs.get("bounds").and_then(parse_bounds),
        clickable: attrs.flag("clickable").unwrap_or(false),
        scrollable: attrs.flag("scrollable").unwrap_or(false),
        editable,
        enabled: attrs.flag("enabled").unwrap_or(true),
        checked: attrs.flag("checked").unwrap_or(false),
        selected: attrs.flag("selected").unwrap_or(false),
        focused: attrs.flag("focused").unwrap_or(false),
        visible: true,
        class,
        children: Vec::new(),
        ref_id: None,
    })
}
