//! Image uploads stored on local disk and served back under a URL prefix.

use async_trait::async_trait;
use recetario_core::{validate_image, ImageUploader, PendingImage, UploadError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes `<dir>/<uuid>.<ext>` and hands back `<url_prefix>/<uuid>.<ext>`.
#[derive(Debug, Clone)]
pub struct LocalDiskUploader {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalDiskUploader {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }
}

#[async_trait]
impl ImageUploader for LocalDiskUploader {
    async fn upload(&self, image: PendingImage) -> Result<String, UploadError> {
        let accepted = validate_image(&image.data)?;

        let file_name = format!("{}.{}", Uuid::new_v4(), accepted.extension());
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, &image.data).await.map_err(|e| {
            tracing::error!(path = %path.display(), "Failed to write upload: {}", e);
            UploadError::Storage(e.to_string())
        })?;

        tracing::debug!(
            original_name = image.file_name.as_deref().unwrap_or("-"),
            size = image.data.len(),
            content_type = accepted.content_type(),
            "stored upload as {}",
            file_name
        );

        Ok(format!("{}/{}", self.url_prefix, file_name))
    }

    async fn discard(&self, reference: &str) -> Result<(), UploadError> {
        let Some(file_name) = reference
            .strip_prefix(&self.url_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| {
                !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
            })
        else {
            return Ok(());
        };

        let path = self.dir.join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("discarded upload {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to discard upload: {}", e);
                Err(UploadError::Storage(e.to_string()))
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "local-disk"
    }
}
