//! Multipart form parsing for image uploads.

use std::collections::HashMap;

use axum::extract::Multipart;

use super::non_blank;
use crate::errors::AppError;
use crate::media::ImageUpload;

/// Name of the multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// A parsed upload form: text fields plus at most one image.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl UploadForm {
    /// Read every field of the multipart body. More than one `image` field is
    /// rejected; unknown text fields are kept but ignored by the handlers.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                if form.image.is_some() {
                    return Err(AppError::Validation(
                        "Only one image may be uploaded per request".to_string(),
                    ));
                }

                let file_name = field.file_name().map(str::to_string).ok_or_else(|| {
                    AppError::Validation("The image field must be a file".to_string())
                })?;
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                // Browsers send an empty part when no file was chosen
                if bytes.is_empty() {
                    continue;
                }

                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed, non-blank text value of a field.
    pub fn text(&self, name: &str) -> Option<String> {
        non_blank(self.fields.get(name).cloned())
    }

    pub fn take_image(&mut self) -> Option<ImageUpload> {
        self.image.take()
    }
}
