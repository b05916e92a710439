//! Configuration errors.

use thiserror::Error;

/// A single problem found while validating a tracing configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Span name must not be blank")]
    BlankSpanName,

    #[error("Static attribute keys must not be empty")]
    EmptyAttributeKey,

    #[error("Static attribute '{key}' collides with a key written by the middleware")]
    ReservedAttributeKey { key: String },
}

/// Errors that can occur when building a [`TracingConfig`](super::TracingConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Every violation found, not just the first.
    #[error("Invalid tracing configuration ({} violation(s))", .violations.len())]
    Invalid { violations: Vec<ConfigViolation> },

    #[error("Failed to parse tracing options: {0}")]
    Parse(#[from] serde_json::Error),
}
