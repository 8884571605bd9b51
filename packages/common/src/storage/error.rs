use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored name is malformed (path separators, traversal, etc.).
    #[error("invalid stored name: {0}")]
    InvalidName(String),

    /// Uploaded content is empty.
    #[error("file content is empty")]
    EmptyContent,

    /// The blob exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },

    /// The file extension is not in the allowed set.
    #[error("unsupported file extension '{0}'")]
    UnsupportedExtension(String),
}
