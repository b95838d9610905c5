//! Local-disk implementation of the upload collaborator.
//!
//! Files land in `<root>/<folder>/<stem>-<uuid>.<ext>` and are served
//! read-only under [`PUBLIC_UPLOAD_PREFIX`](itam_core::upload::PUBLIC_UPLOAD_PREFIX).

use std::path::PathBuf;

use async_trait::async_trait;
use itam_core::error::CoreError;
use itam_core::upload::{
    parse_public_path, public_path, validate_image_upload, UploadStore, UploadedFile,
};
use uuid::Uuid;

/// Stores uploads beneath a root directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DiskUploadStore {
    root: PathBuf,
}

impl DiskUploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl UploadStore for DiskUploadStore {
    async fn store(
        &self,
        folder: &str,
        stem: &str,
        file: UploadedFile,
    ) -> Result<String, CoreError> {
        let ext = validate_image_upload(&file)?;

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to create upload dir: {e}")))?;

        let file_name = format!("{stem}-{}.{ext}", Uuid::now_v7().simple());
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write upload: {e}")))?;

        tracing::info!(
            path = %path.display(),
            size_bytes = file.bytes.len(),
            "Stored upload",
        );
        Ok(public_path(folder, &file_name))
    }

    async fn remove(&self, public_path: &str) -> Result<(), CoreError> {
        let (folder, file_name) = parse_public_path(public_path).ok_or_else(|| {
            CoreError::Validation(format!("'{public_path}' is not a stored upload"))
        })?;
        let path = self.root.join(folder).join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!("Failed to remove upload: {e}"))),
        }
    }
}
