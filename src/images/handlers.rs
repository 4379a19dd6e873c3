use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, instrument};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub deleted: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/temp-image/:file_name", get(serve_temp_image))
        .route("/cleanup-images", post(cleanup_images))
}

#[instrument(skip(state))]
pub async fn serve_temp_image(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    if file_name.is_empty() || file_name.contains("..") || file_name.contains('/') {
        return Err(ApiError::NotFound("Image not found".into()));
    }

    match state.images.fetch(&file_name).await {
        Ok(Some(obj)) => {
            let content_type = obj
                .content_type
                .unwrap_or_else(|| "application/octet-stream".into());
            Ok(([(header::CONTENT_TYPE, content_type)], obj.body).into_response())
        }
        Ok(None) => Err(ApiError::NotFound("Image not found".into())),
        Err(e) => {
            error!(error = %format!("{e:#}"), %file_name, "serve temp image failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn cleanup_images(State(state): State<AppState>) -> Json<CleanupResponse> {
    let deleted = state.images.sweep_expired().await;
    Json(CleanupResponse { deleted })
}
