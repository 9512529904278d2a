//! Error types for `taskq-core`.
//!
//! Admission decisions never raise: they return a bool or `Option`. The
//! only fallible surface is construction, where a bad tunable would
//! otherwise silently produce wrong admission decisions later.

use thiserror::Error;

/// Errors raised while constructing a [`crate::DispatchCore`].
#[derive(Debug, Error)]
pub enum TaskQError {
    /// A tunable in [`crate::config::DispatchConfig`] is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible `taskq-core` construction.
pub type Result<T> = std::result::Result<T, TaskQError>;
