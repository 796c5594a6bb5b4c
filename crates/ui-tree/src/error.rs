use thiserror::Error;

/// Result type for ref resolution and configuration
pub type Result<T> = std::result::Result<T, UiTreeError>;

/// Errors surfaced to the interaction layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiTreeError {
    /// The ref is not part of the current snapshot
    #[error("Ref not found: {0}")]
    RefNotFound(u32),

    /// The element behind the ref has no geometry
    #[error("Element for ref {0} has no bounds")]
    MissingBounds(u32),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl UiTreeError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Stable machine-readable code for error envelopes
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RefNotFound(_) => "ref_not_found",
            Self::MissingBounds(_) => "missing_bounds",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}
