//! Media ingest.
//!
//! Accepts one uploaded image and returns a reference string (file name or
//! URL) that entities store to point at it. Two interchangeable backends are
//! available; the configuration decides which one runs.

mod local;
mod remote;

pub use local::LocalMediaBackend;
pub use remote::RemoteMediaBackend;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::config::Config;
use crate::errors::AppError;

/// An image received from a multipart upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as sent by the client
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Lower-cased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Storage backend for uploaded images.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Persist the image and return its reference.
    async fn store(&self, upload: ImageUpload) -> Result<String, AppError>;

    /// Short backend name for logs.
    fn kind(&self) -> &'static str;
}

/// Build the backend selected by configuration: remote when media-host
/// credentials are present, local disk otherwise.
pub fn backend_from_config(config: &Config) -> Result<Arc<dyn MediaBackend>, AppError> {
    match &config.remote_media {
        Some(remote) => Ok(Arc::new(RemoteMediaBackend::new(remote.clone())?)),
        None => Ok(Arc::new(LocalMediaBackend::new(config.media_dir.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let upload = ImageUpload {
            file_name: "Wedding.PHOTO.JPG".to_string(),
            content_type: None,
            bytes: Bytes::new(),
        };
        assert_eq!(upload.extension().as_deref(), Some("jpg"));

        let bare = ImageUpload {
            file_name: "photo".to_string(),
            ..upload
        };
        assert_eq!(bare.extension(), None);
    }
}
