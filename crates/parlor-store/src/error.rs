//! Error types for the persistence layer.

/// Errors that can occur while reading or writing room documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or timed out. Transient; callers
    /// should retry with backoff.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored document could not be decoded. Permanent; retrying will
    /// not help.
    #[error("corrupt room document: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether retrying the operation might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
