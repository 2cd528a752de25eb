//! # Generation Error Types
//!
//! All errors that can occur while generating or querying a map.

use thiserror::Error;

/// Errors that can occur in the generation pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A caller passed an argument outside the accepted domain
    /// (non-positive random bound, negative range, unknown version string).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No placement strategy is registered for the requested structure tag.
    #[error("unknown structure type: {0}")]
    UnknownStructureType(String),

    /// The backend has not been initialized successfully.
    ///
    /// Reported by `MapSession::ensure_ready`; queries answer with
    /// sentinels instead.
    #[error("generation backend is not ready")]
    BackendNotReady,

    /// A climate channel produced an unusable sample.
    ///
    /// Recovered inside `BiomeField`; never returned from public queries.
    #[error("transient sample failure in {channel} at ({x}, {z})")]
    TransientSampleFailure {
        /// Name of the noise channel that failed.
        channel: &'static str,
        /// Block X coordinate.
        x: i32,
        /// Block Z coordinate.
        z: i32,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
