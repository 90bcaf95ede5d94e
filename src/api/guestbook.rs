//! Guestbook API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;

use super::{delete_entry, non_blank, DeleteResponse};
use crate::errors::{AppError, AppResult};
use crate::models::{Collection, CreateGuestbookRequest, GuestbookMessage};
use crate::AppState;

/// GET /api/guestbook - List messages, newest first.
pub async fn list_guestbook(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GuestbookMessage>>> {
    Ok(Json(state.store.load().await?))
}

/// POST /api/guestbook - Post a message.
pub async fn create_guestbook_message(
    State(state): State<AppState>,
    body: Result<Json<CreateGuestbookRequest>, JsonRejection>,
) -> AppResult<Json<GuestbookMessage>> {
    let Json(request) = body?;

    let (Some(name), Some(message)) = (non_blank(request.name), non_blank(request.message))
    else {
        return Err(AppError::Validation(
            "Name and message are required".to_string(),
        ));
    };

    let entry = state
        .store
        .append(GuestbookMessage::new(name, message, Utc::now()))
        .await?;

    tracing::info!("New guestbook message {} from {}", entry.id, entry.name);

    Ok(Json(entry))
}

/// DELETE /api/guestbook/:id - Delete a message.
pub async fn delete_guestbook_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    delete_entry(&state, Collection::Guestbook, &id).await
}
