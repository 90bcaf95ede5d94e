//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod compliments;
mod dua;
mod gallery;
mod guestbook;
mod journey;
mod upload;

pub use compliments::*;
pub use dua::*;
pub use gallery::*;
pub use guestbook::*;
pub use journey::*;
pub use upload::*;

use axum::Json;
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::Collection;
use crate::AppState;

/// Response envelope for successful uploads.
#[derive(Debug, Serialize)]
pub struct UploadResponse<T: Serialize> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> UploadResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

/// Response body for delete endpoints.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    /// Number of entries that matched; zero for an unknown id
    pub removed: u64,
}

/// Trim a text field and treat blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Shared delete flow: 404 if the collection was never written, otherwise
/// success with the number of removed entries (possibly zero).
pub(crate) async fn delete_entry(
    state: &AppState,
    collection: Collection,
    id: &str,
) -> AppResult<Json<DeleteResponse>> {
    let outcome = state.store.remove(collection, id).await?;

    if !outcome.collection_exists {
        return Err(AppError::NotFound(format!(
            "No {} entries have been stored yet",
            collection
        )));
    }

    tracing::info!(
        "Deleted {} {} entr{} with id {}",
        outcome.removed,
        collection,
        if outcome.removed == 1 { "y" } else { "ies" },
        id
    );

    Ok(Json(DeleteResponse {
        success: true,
        removed: outcome.removed,
    }))
}
