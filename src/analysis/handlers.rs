use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::dto::AnalysisResult;
use super::services::{run_analysis, ImageUpload};
use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_image))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// POST /analyze (multipart)
/// Fields: `user_id` (text), `image` (file with an `image/*` content type).
/// Everything is validated before the first remote call.
#[instrument(skip(state, mp))]
pub async fn analyze_image(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut user_id: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read user_id: {e}")))?;
                user_id = Some(value.trim().to_string());
            }
            Some("image") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let file_name = field.file_name().map(|s| s.to_string());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {e}")))?;
                image = Some(ImageUpload {
                    body,
                    content_type,
                    file_name,
                });
            }
            _ => {}
        }
    }

    let user_id = user_id
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("user_id is required".into()))?;
    let image = image.ok_or_else(|| ApiError::BadRequest("image is required".into()))?;

    if !image.is_image() {
        warn!(%user_id, content_type = %image.content_type, "rejected non-image upload");
        return Err(ApiError::BadRequest("File must be an image".into()));
    }
    if image.body.is_empty() {
        warn!(%user_id, "rejected empty image");
        return Err(ApiError::BadRequest("Image is empty".into()));
    }
    info!(%user_id, content_type = %image.content_type, "accepted image");

    let result = run_analysis(&state, &user_id, image).await.map_err(|e| {
        error!(%user_id, error = ?e, "analysis failed");
        ApiError::Internal(format!("Analysis failed: {e:#}"))
    })?;
    Ok(Json(result))
}
