//! # Viewport Error Types

use thiserror::Error;

/// Errors raised while configuring a viewport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewportError {
    /// Invalid configuration file or value.
    #[error("invalid viewport configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for viewport operations.
pub type ViewportResult<T> = Result<T, ViewportError>;
