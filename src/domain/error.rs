//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the hierarchy and relation model.
/// These are independent of I/O and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("malformed hierarchy at '{path}': {reason}")]
    MalformedHierarchy { path: String, reason: String },

    #[error("unknown relation mode: {0}")]
    UnknownRelationMode(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
