//! Static lookup tables shared by the adapters and the serializer.
//!
//! Loaded once on first use and never mutated.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Element type prefix used by the remote automation vocabulary
pub(crate) const XCUI_PREFIX: &str = "XCUIElementType";

/// Class of the synthetic root that holds several top-level windows
pub(crate) const SYNTHETIC_ROOT_CLASS: &str = "hierarchy";

/// Class name marker that makes a native node editable
const EDITABLE_CLASS_MARKERS: &[&str] = &["EditText", "AutoCompleteTextView"];

static ROLE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (SYNTHETIC_ROOT_CLASS, "Screen"),
        // Android widgets
        ("android.widget.Button", "Button"),
        ("android.widget.ImageButton", "Button"),
        ("com.google.android.material.button.MaterialButton", "Button"),
        ("android.widget.TextView", "Text"),
        ("androidx.appcompat.widget.AppCompatTextView", "Text"),
        ("com.google.android.material.textview.MaterialTextView", "Text"),
        ("android.widget.EditText", "TextField"),
        ("android.widget.AutoCompleteTextView", "TextField"),
        ("androidx.appcompat.widget.AppCompatEditText", "TextField"),
        ("com.google.android.material.textfield.TextInputEditText", "TextField"),
        ("android.widget.ImageView", "Image"),
        ("android.widget.CheckBox", "CheckBox"),
        ("android.widget.CheckedTextView", "CheckBox"),
        ("android.widget.Switch", "Switch"),
        ("androidx.appcompat.widget.SwitchCompat", "Switch"),
        ("com.google.android.material.switchmaterial.SwitchMaterial", "Switch"),
        ("android.widget.ToggleButton", "Toggle"),
        ("android.widget.RadioButton", "Radio"),
        ("android.widget.SeekBar", "Slider"),
        ("android.widget.ProgressBar", "Progress"),
        ("android.widget.Spinner", "Dropdown"),
        ("android.widget.ScrollView", "ScrollView"),
        ("android.widget.HorizontalScrollView", "ScrollView"),
        ("androidx.core.widget.NestedScrollView", "ScrollView"),
        ("android.widget.ListView", "List"),
        ("android.widget.GridView", "List"),
        ("androidx.recyclerview.widget.RecyclerView", "List"),
        ("androidx.viewpager.widget.ViewPager", "Pager"),
        ("android.webkit.WebView", "WebView"),
        ("android.widget.FrameLayout", "Group"),
        ("android.widget.LinearLayout", "Group"),
        ("android.widget.RelativeLayout", "Group"),
        ("androidx.constraintlayout.widget.ConstraintLayout", "Group"),
        ("androidx.coordinatorlayout.widget.CoordinatorLayout", "Group"),
        ("android.view.ViewGroup", "Group"),
        ("android.view.View", "View"),
        // iOS element types
        ("XCUIElementTypeApplication", "App"),
        ("XCUIElementTypeWindow", "Window"),
        ("XCUIElementTypeOther", "Group"),
        ("XCUIElementTypeGroup", "Group"),
        ("XCUIElementTypeButton", "Button"),
        ("XCUIElementTypeStaticText", "Text"),
        ("XCUIElementTypeTextField", "TextField"),
        ("XCUIElementTypeSecureTextField", "SecureField"),
        ("XCUIElementTypeSearchField", "SearchField"),
        ("XCUIElementTypeTextView", "TextField"),
        ("XCUIElementTypeImage", "Image"),
        ("XCUIElementTypeIcon", "Icon"),
        ("XCUIElementTypeCell", "Cell"),
        ("XCUIElementTypeSwitch", "Switch"),
        ("XCUIElementTypeToggle", "Toggle"),
        ("XCUIElementTypeCheckBox", "CheckBox"),
        ("XCUIElementTypeLink", "Link"),
        ("XCUIElementTypeTab", "Tab"),
        ("XCUIElementTypeTabBar", "TabBar"),
        ("XCUIElementTypeNavigationBar", "NavBar"),
        ("XCUIElementTypeToolbar", "Toolbar"),
        ("XCUIElementTypeTable", "List"),
        ("XCUIElementTypeCollectionView", "List"),
        ("XCUIElementTypeScrollView", "ScrollView"),
        ("XCUIElementTypeWebView", "WebView"),
        ("XCUIElementTypeAlert", "Alert"),
        ("XCUIElementTypeSheet", "Sheet"),
        ("XCUIElementTypeSlider", "Slider"),
        ("XCUIElementTypePicker", "Picker"),
        ("XCUIElementTypePickerWheel", "PickerWheel"),
        ("XCUIElementTypeSegmentedControl", "Segmented"),
        ("XCUIElementTypeKeyboard", "Keyboard"),
        ("XCUIElementTypeKey", "Key"),
    ])
});

static WRAPPER_CLASSES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "",
        SYNTHETIC_ROOT_CLASS,
        "android.widget.FrameLayout",
        "android.widget.LinearLayout",
        "android.widget.RelativeLayout",
        "android.widget.TableLayout",
        "android.widget.TableRow",
        "androidx.constraintlayout.widget.ConstraintLayout",
        "androidx.coordinatorlayout.widget.CoordinatorLayout",
        "androidx.cardview.widget.CardView",
        "android.view.ViewGroup",
        "android.view.View",
        "XCUIElementTypeOther",
        "XCUIElementTypeGroup",
        "XCUIElementTypeWindow",
    ])
});

/// Capabilities implied by a remote element type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Capability {
    pub clickable: bool,
    pub editable: bool,
    pub scrollable: bool,
}

impl Capability {
    const CLICK: Self = Self {
        clickable: true,
        editable: false,
        scrollable: false,
    };
    const EDIT: Self = Self {
        clickable: false,
        editable: true,
        scrollable: false,
    };
    const SCROLL: Self = Self {
        clickable: false,
        editable: false,
        scrollable: true,
    };
}

/// Keyed by type name without the `XCUIElementType` prefix
static TYPE_CAPABILITIES: Lazy<HashMap<&'static str, Capability>> = Lazy::new(|| {
    HashMap::from([
        ("Button", Capability::CLICK),
        ("Cell", Capability::CLICK),
        ("Link", Capability::CLICK),
        ("Tab", Capability::CLICK),
        ("Image", Capability::CLICK),
        ("Icon", Capability::CLICK),
        ("Switch", Capability::CLICK),
        ("Toggle", Capability::CLICK),
        ("CheckBox", Capability::CLICK),
        // Audit captions spell it this way
        ("Checkbox", Capability::CLICK),
        ("RadioButton", Capability::CLICK),
        ("MenuItem", Capability::CLICK),
        ("PopUpButton", Capability::CLICK),
        ("MenuButton", Capability::CLICK),
        ("Key", Capability::CLICK),
        ("TextField", Capability::EDIT),
        ("SecureTextField", Capability::EDIT),
        ("SearchField", Capability::EDIT),
        ("TextView", Capability::EDIT),
        ("ScrollView", Capability::SCROLL),
        ("Table", Capability::SCROLL),
        ("CollectionView", Capability::SCROLL),
    ])
});

/// Remote types whose `value` carries an on/off state
const TOGGLE_TYPES: &[&str] = &["Switch", "Toggle", "CheckBox", "Checkbox"];

/// Strip the remote vocabulary prefix, if any
pub(crate) fn short_type(type_name: &str) -> &str {
    type_name.strip_prefix(XCUI_PREFIX).unwrap_or(type_name)
}

pub(crate) fn role_for_class(class: &str) -> Option<&'static str> {
    ROLE_LABELS.get(class).copied()
}

pub(crate) fn is_wrapper_class(class: &str) -> bool {
    WRAPPER_CLASSES.contains(class)
}

pub(crate) fn is_editable_class(class: &str) -> bool {
    EDITABLE_CLASS_MARKERS
        .iter()
        .any(|marker| class.contains(marker))
}

pub(crate) fn capability_for_type(type_name: &str) -> Capability {
    TYPE_CAPABILITIES
        .get(short_type(type_name))
        .copied()
        .unwrap_or_default()
}

pub(crate) fn is_toggle_type(type_name: &str) -> bool {
    TOGGLE_TYPES.contains(&short_type(type_name))
}
