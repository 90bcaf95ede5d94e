//! Compliment API endpoints.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};

use super::{delete_entry, DeleteResponse, UploadForm, UploadResponse};
use crate::errors::{AppError, AppResult};
use crate::models::{Collection, Compliment, ComplimentTag};
use crate::AppState;

/// GET /api/compliments - List all compliments.
pub async fn list_compliments(State(state): State<AppState>) -> AppResult<Json<Vec<Compliment>>> {
    Ok(Json(state.store.load().await?))
}

/// POST /api/upload - Add a compliment with its photo.
pub async fn upload_compliment(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse<Compliment>>> {
    let mut form = UploadForm::from_multipart(multipart?).await?;

    let (Some(name), Some(image)) = (form.text("name"), form.take_image()) else {
        return Err(AppError::Validation(
            "Name and image are required".to_string(),
        ));
    };

    let tag = form
        .text("tag")
        .map(|raw| {
            ComplimentTag::from_str(&raw).ok_or_else(|| {
                AppError::Validation(format!("Unknown tag {:?}; expected Family or Friend", raw))
            })
        })
        .transpose()?;

    let img = state.media.store(image).await?;

    let compliment = state
        .store
        .append(Compliment {
            id: Some(uuid::Uuid::new_v4().to_string()),
            name,
            img,
            tag,
        })
        .await?;

    tracing::info!(
        "Added compliment from {} ({})",
        compliment.name,
        compliment.img
    );

    Ok(Json(UploadResponse::new("Uploaded successfully", compliment)))
}

/// DELETE /api/compliments/:id - Delete a compliment. The image is kept.
pub async fn delete_compliment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    delete_entry(&state, Collection::Compliments, &id).await
}
