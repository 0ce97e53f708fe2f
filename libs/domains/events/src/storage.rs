//! Image storage for event uploads

use crate::error::{EventError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::instrument;
use uuid::Uuid;

/// An image file extracted from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied filename, untrusted
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Persists uploaded images and returns the path reference stored on the event
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, upload: &UploadedImage) -> Result<String>;
}

/// Filesystem-backed image store.
///
/// Files land under the configured root with a UUID prefix, so two uploads
/// with the same client filename never collide.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| EventError::Storage {
                message: format!("failed to create upload directory {}: {}", root.display(), e),
            })?;
        Ok(Self { root })
    }

    /// Strip path components and unusual characters from a client filename.
    fn sanitize(filename: &str) -> String {
        let base = filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("upload");

        let cleaned: String = base
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();

        if cleaned.is_empty() {
            "upload".to_string()
        } else {
            cleaned
        }
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    async fn store(&self, upload: &UploadedImage) -> Result<String> {
        let name = format!("{}-{}", Uuid::new_v4(), Self::sanitize(&upload.filename));
        let path = self.root.join(&name);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| EventError::Storage {
                message: format!("failed to write {}: {}", path.display(), e),
            })?;

        Ok(path.to_string_lossy().into_owned())
    }
}
