/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A log record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A log record failed its CRC check.
    #[error("CRC check failed for log record at offset {offset}: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        offset: u64,
        expected: u32,
        actual: u32,
    },

    /// A log record header is unreadable but intact records follow it.
    #[error("invalid log record length {length} at offset {offset} (next intact record at offset {next})")]
    InvalidRecordLength { offset: u64, length: u32, next: u64 },

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// Any other backend failure (connectivity, cursor fault, ...).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn poisoned<E: std::fmt::Display>(err: E) -> Self {
        Self::Poisoned(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
