use crate::{ApiResult, AppState, Envelope};

use axum::{Json, extract::State};

/// GET /worlds
///
/// Sorted world names. Served without waiting on lifecycle operations.
pub async fn list_worlds(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<String>>>> {
    let worlds = state.coordinator.list_worlds().await?;
    Ok(Envelope::ok(worlds))
}
