use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source vocabulary of a raw dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Native accessibility dump (`<hierarchy>` / `<node>` elements)
    Android,
    /// Remote UI-automation page source (`XCUIElementType*` elements)
    Ios,
}

impl Platform {
    /// Guess the platform from the dump content
    #[must_use]
    pub fn detect(raw: &str) -> Option<Self> {
        if raw.contains("<hierarchy") || raw.contains("<node ") || raw.contains("<node>") {
            Some(Self::Android)
        } else if raw.contains("XCUIElementType") || raw.contains("<AppiumAUT") {
            Some(Self::Ios)
        } else {
            None
        }
    }

    /// Get platform name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" | "a" => Ok(Self::Android),
            "ios" | "b" => Ok(Self::Ios),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}
