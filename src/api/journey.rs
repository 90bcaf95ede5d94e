//! Journey API endpoint.

use axum::{extract::State, Json};

use crate::errors::AppResult;
use crate::models::JourneyMilestone;
use crate::AppState;

/// GET /api/journey - List the story milestones.
pub async fn list_journey(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JourneyMilestone>>> {
    Ok(Json(state.store.load().await?))
}
