use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
