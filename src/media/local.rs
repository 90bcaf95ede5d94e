//! Disk-based media backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{ImageUpload, MediaBackend};
use crate::errors::AppError;

/// Writes uploads into the public media directory under their original name.
///
/// A later upload with the same name replaces the earlier file.
#[derive(Clone)]
pub struct LocalMediaBackend {
    base_path: PathBuf,
}

impl LocalMediaBackend {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }
}

/// Reduce a client-supplied name to its final path component.
fn sanitize_file_name(name: &str) -> Result<String, AppError> {
    // Clients on Windows may send backslash-separated paths
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    match Path::new(last).file_name().and_then(|n| n.to_str()) {
        Some(clean) if !clean.is_empty() => Ok(clean.to_string()),
        _ => Err(AppError::Validation(format!(
            "Invalid image file name: {:?}",
            name
        ))),
    }
}

#[async_trait]
impl MediaBackend for LocalMediaBackend {
    async fn store(&self, upload: ImageUpload) -> Result<String, AppError> {
        let file_name = sanitize_file_name(&upload.file_name)?;

        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            AppError::Media(format!(
                "Failed to create media directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let path = self.base_path.join(&file_name);
        fs::write(&path, &upload.bytes).await.map_err(|e| {
            AppError::Media(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!("Stored {} bytes at {}", upload.bytes.len(), path.display());

        Ok(file_name)
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}
