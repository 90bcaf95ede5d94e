//! Gallery API endpoints.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};

use super::{delete_entry, DeleteResponse, UploadForm, UploadResponse};
use crate::errors::{AppError, AppResult};
use crate::models::{Collection, GalleryItem};
use crate::AppState;

/// GET /api/gallery - List all gallery items.
pub async fn list_gallery(State(state): State<AppState>) -> AppResult<Json<Vec<GalleryItem>>> {
    Ok(Json(state.store.load().await?))
}

/// POST /api/gallery/upload - Add a photo to the gallery.
pub async fn upload_gallery_item(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse<GalleryItem>>> {
    let mut form = UploadForm::from_multipart(multipart?).await?;

    let image = form
        .take_image()
        .ok_or_else(|| AppError::Validation("Image is required".to_string()))?;

    let url = state.media.store(image).await?;

    let item = state
        .store
        .append(GalleryItem {
            id: Some(uuid::Uuid::new_v4().to_string()),
            url,
            caption: form.text("caption").unwrap_or_default(),
        })
        .await?;

    tracing::info!("Added gallery item {}", item.url);

    Ok(Json(UploadResponse::new("Gallery image uploaded", item)))
}

/// DELETE /api/gallery/:id - Delete a gallery item. The image is kept.
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    delete_entry(&state, Collection::Gallery, &id).await
}
