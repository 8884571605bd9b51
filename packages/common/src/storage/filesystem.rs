use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::ALLOWED_EXTENSIONS;
use super::error::StorageError;
use super::traits::{BlobStore, BoxReader};

/// Filesystem-backed blob store.
///
/// Every upload lands as a single file in the content directory, named
/// `{owner}-{random token}.{extension}`. Writes go through a temp file in
/// `.tmp` and are renamed into place once complete.
pub struct FilesystemBlobStore {
    content_dir: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store rooted at `content_dir`.
    pub async fn new(content_dir: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&content_dir).await?;
        fs::create_dir_all(content_dir.join(".tmp")).await?;
        Ok(Self {
            content_dir,
            max_size,
        })
    }

    /// Compute the filesystem path for a stored name, rejecting names that
    /// could escape the content directory.
    fn blob_path(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        validate_stored_name(stored_name)?;
        Ok(self.content_dir.join(stored_name))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.content_dir
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn store(
        &self,
        owner: &str,
        data: &[u8],
        extension: &str,
    ) -> Result<String, StorageError> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(StorageError::UnsupportedExtension(ext));
        }
        if data.is_empty() {
            return Err(StorageError::EmptyContent);
        }
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let owner = sanitize_owner(owner);

        // A fresh v4 token makes a collision vanishingly unlikely, but the
        // name must be unique among existing blobs, so check anyway.
        let stored_name = loop {
            let candidate = format!("{owner}-{}.{ext}", uuid::Uuid::new_v4());
            if !fs::try_exists(self.content_dir.join(&candidate)).await? {
                break candidate;
            }
        };

        let blob_path = self.content_dir.join(&stored_name);
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(stored_name)
    }

    async fn get_stream(&self, stored_name: &str) -> Result<BoxReader, StorageError> {
        let blob_path = self.blob_path(stored_name)?;
        match fs::File::open(&blob_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, stored_name: &str) -> Result<bool, StorageError> {
        let blob_path = self.blob_path(stored_name)?;
        Ok(fs::try_exists(&blob_path).await?)
    }

    async fn delete(&self, stored_name: &str) -> Result<bool, StorageError> {
        let blob_path = self.blob_path(stored_name)?;
        match fs::remove_file(&blob_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, stored_name: &str) -> Result<u64, StorageError> {
        let blob_path = self.blob_path(stored_name)?;
        match fs::metadata(&blob_path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduce an owner name to a filesystem-safe stem for generated names.
fn sanitize_owner(owner: &str) -> String {
    let cleaned: String = owner
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Reject stored names that contain path separators, traversal components,
/// control characters, or a leading dot.
fn validate_stored_name(stored_name: &str) -> Result<(), StorageError> {
    let invalid = || StorageError::InvalidName(stored_name.to_string());

    if stored_name.trim().is_empty() {
        return Err(invalid());
    }
    if stored_name.contains('/') || stored_name.contains('\\') {
        return Err(invalid());
    }
    if stored_name.contains('\0') || stored_name.chars().any(|c| c.is_ascii_control()) {
        return Err(invalid());
    }
    if stored_name == ".." || stored_name.starts_with('.') {
        return Err(invalid());
    }
    Ok(())
}
