use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{HistoryQuery, StoredAnalysis};
use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/analyses/:user_id", get(list_analyses))
}

#[instrument(skip(state, query))]
pub async fn list_analyses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<StoredAnalysis>>, ApiError> {
    let Query(q) = query.map_err(|e| {
        warn!(%user_id, error = %e, "rejected history query");
        ApiError::BadRequest(e.body_text())
    })?;
    Ok(Json(state.results.history(&user_id, q.limit).await))
}
