use clap::ValueEnum;
use uisnap_tree::{GestureKind, Platform, ScrollDirection, SnapshotSession};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlatformFlag {
    Android,
    Ios,
    /// Accessibility-audit element list (JSON)
    IosAudit,
    /// Sniff the dump content
    Auto,
}

impl PlatformFlag {
    pub(crate) fn session(self) -> SnapshotSession {
        match self {
            PlatformFlag::Android => SnapshotSession::new(Platform::Android),
            PlatformFlag::Ios => SnapshotSession::new(Platform::Ios),
            PlatformFlag::IosAudit => SnapshotSession::audit(),
            PlatformFlag::Auto => SnapshotSession::auto_detect(),
        }
    }

    /// Reported platform name for a dump read with this flag
    pub(crate) fn resolved_name(self, raw: &str) -> Option<&'static str> {
        match self {
            PlatformFlag::Android => Some(Platform::Android.as_str()),
            PlatformFlag::Ios => Some(Platform::Ios.as_str()),
            PlatformFlag::IosAudit => Some("ios_audit"),
            PlatformFlag::Auto => Platform::detect(raw).map(Platform::as_str),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum GestureFlag {
    Tap,
    LongPress,
    Scroll,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DirectionFlag {
    Up,
    Down,
    Left,
    Right,
}

impl DirectionFlag {
    pub(crate) const fn as_domain(self) -> ScrollDirection {
        match self {
            DirectionFlag::Up => ScrollDirection::Up,
            DirectionFlag::Down => ScrollDirection::Down,
            DirectionFlag::Left => ScrollDirection::Left,
            DirectionFlag::Right => ScrollDirection::Right,
        }
    }
}

impl GestureFlag {
    pub(crate) const fn as_domain(self, direction: DirectionFlag) -> GestureKind {
        match self {
            GestureFlag::Tap => GestureKind::Tap,
            GestureFlag::LongPress => GestureKind::LongPress,
            GestureFlag::Scroll => GestureKind::Scroll(direction.as_domain()),
        }
    }
}
