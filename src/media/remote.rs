//! Remote media backend for a Cloudinary-compatible image host.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageUpload, MediaBackend};
use crate::config::RemoteMediaConfig;
use crate::errors::AppError;

/// Image formats the host accepts.
pub const ALLOWED_FORMATS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Uploads images to the media host under a fixed folder.
#[derive(Clone)]
pub struct RemoteMediaBackend {
    client: reqwest::Client,
    config: RemoteMediaConfig,
}

/// Subset of the host's upload reply that we use.
#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: Option<String>,
    url: Option<String>,
}

impl RemoteMediaBackend {
    pub fn new(config: RemoteMediaConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wedding-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build media client: {}", e)))?;

        tracing::info!(
            "Remote media storage enabled (cloud: {}, folder: {})",
            config.cloud_name,
            config.folder
        );

        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.config.api_base, self.config.cloud_name)
    }
}

/// Resolve the image format from the file extension, falling back to the
/// content type. Returns `None` for anything outside [`ALLOWED_FORMATS`].
fn image_format(upload: &ImageUpload) -> Option<&'static str> {
    let from_extension = upload.extension().and_then(|ext| {
        ALLOWED_FORMATS
            .iter()
            .copied()
            .find(|allowed| *allowed == ext)
    });

    from_extension.or_else(|| match upload.content_type.as_deref()? {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    })
}

/// Sign upload parameters: `k=v` pairs sorted by key and joined with `&`,
/// followed by the API secret, hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaBackend for RemoteMediaBackend {
    async fn store(&self, upload: ImageUpload) -> Result<String, AppError> {
        let format = image_format(&upload).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported image format; allowed formats are {}",
                ALLOWED_FORMATS.join(", ")
            ))
        })?;

        let timestamp = Utc::now().timestamp().to_string();
        let allowed_formats = ALLOWED_FORMATS.join(",");
        let signature = sign_params(
            &[
                ("allowed_formats", allowed_formats.as_str()),
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let mime = upload
            .content_type
            .clone()
            .unwrap_or_else(|| format!("image/{}", if format == "jpg" { "jpeg" } else { format }));

        let file = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&mime)
            .map_err(|e| AppError::Validation(format!("Invalid image content type: {}", e)))?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("allowed_formats", allowed_formats)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Media(format!(
                "Media host rejected upload of {} ({}): {}",
                upload.file_name, status, body
            )));
        }

        let reply: UploadReply = response.json().await?;
        let reference = reply.secure_url.or(reply.url).ok_or_else(|| {
            AppError::Media("Media host reply did not contain a URL".to_string())
        })?;

        tracing::debug!("Uploaded {} to {}", upload.file_name, reference);

        Ok(reference)
    }

    fn kind(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn upload(name: &str, content_type: Option<&str>) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(b"img"),
        }
    }

    #[test]
    fn test_sign_params_sorts_and_hashes() {
        let signature = sign_params(
            &[
                ("timestamp", "1700000000"),
                ("folder", "wedding"),
                ("allowed_formats", "jpg,jpeg,png,webp"),
            ],
            "abcd",
        );
        assert_eq!(
            signature,
            "c3637189637afdd305cc990c1773c38d88029a556cc12fe9993f517d79a8ac42"
        );
    }

    #[test]
    fn test_image_format_detection() {
        assert_eq!(image_format(&upload("a.JPEG", None)), Some("jpeg"));
        assert_eq!(image_format(&upload("a.webp", None)), Some("webp"));
        assert_eq!(image_format(&upload("blob", Some("image/png"))), Some("png"));
        assert_eq!(image_format(&upload("a.gif", Some("image/gif"))), None);
        assert_eq!(image_format(&upload("notes.txt", Some("text/plain"))), None);
    }
}
