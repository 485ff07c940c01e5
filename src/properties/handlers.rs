use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use tracing::instrument;

use crate::{error::ApiError, properties::repo, state::AppState};

pub fn property_routes() -> Router<AppState> {
    Router::new().route("/api/properties", get(list_properties))
}

/// Full, unpaginated listing. No authentication; the result set grows
/// with the table.
#[instrument(skip(state))]
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let rows = repo::list_with_owners(&state.db).await?;
    Ok(Json(rows))
}
