use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Name-addressed blob storage for uploaded coursework files.
///
/// Stored names are generated by the store itself from the owner's name plus
/// a random token; callers never choose them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` under a freshly generated name and return that name.
    ///
    /// Rejects empty content, content larger than the configured maximum,
    /// and extensions outside [`super::ALLOWED_EXTENSIONS`]. The returned
    /// name is guaranteed not to collide with any existing stored name, and
    /// the bytes are durably written before this returns.
    async fn store(
        &self,
        owner: &str,
        data: &[u8],
        extension: &str,
    ) -> Result<String, StorageError>;

    /// Retrieve all bytes for a blob by its stored name.
    async fn retrieve(&self, stored_name: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(stored_name).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve a blob as a streaming async reader.
    async fn get_stream(&self, stored_name: &str) -> Result<BoxReader, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, stored_name: &str) -> Result<bool, StorageError>;

    /// Delete a blob by its stored name.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, stored_name: &str) -> Result<bool, StorageError>;

    /// Get the size of a blob in bytes.
    async fn size(&self, stored_name: &str) -> Result<u64, StorageError>;
}
