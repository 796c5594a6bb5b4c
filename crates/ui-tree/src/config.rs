use crate::error::{Result, UiTreeError};
use serde::{Deserialize, Serialize};

/// Timing handed to the interaction layer alongside resolved geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Dwell time for a long press, in milliseconds
    pub long_press_ms: u64,

    /// Duration of a scroll swipe, in milliseconds
    pub swipe_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 800,
            swipe_ms: 300,
        }
    }
}

impl GestureConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.long_press_ms == 0 {
            return Err(UiTreeError::invalid_config("long_press_ms must be > 0"));
        }

        if self.swipe_ms == 0 {
            return Err(UiTreeError::invalid_config("swipe_ms must be > 0"));
        }

        Ok(())
    }
}
