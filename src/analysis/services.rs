use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::dto::AnalysisResult;
use crate::images::services::{ext_from_mime, ImageGuard};
use crate::state::AppState;

/// Request lifecycle, logged as the pipeline advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    ImageStored,
    ProfileLoaded,
    MetricsAnalyzed,
    PlanGenerated,
    Persisted,
    ImageDeleted,
    Failed,
}

/// The `image` part of an analyze request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Filename suffix, else derived from the MIME type, else `jpg`.
    pub fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .or_else(|| ext_from_mime(&self.content_type).map(str::to_string))
            .unwrap_or_else(|| "jpg".to_string())
    }
}

/// Runs one analysis end to end. The stored image is deleted exactly once
/// whatever happens after it was written.
pub async fn run_analysis(
    st: &AppState,
    user_id: &str,
    upload: ImageUpload,
) -> anyhow::Result<AnalysisResult> {
    let analysis_id = Uuid::new_v4();
    debug!(%analysis_id, %user_id, stage = ?Stage::Received, bytes = upload.body.len());

    let extension = upload.extension();
    let image = match st
        .images
        .upload(upload.body, &extension, &upload.content_type)
        .await
        .context("store uploaded image")
    {
        Ok(image) => image,
        Err(e) => {
            error!(%analysis_id, stage = ?Stage::Failed, error = ?e, "analysis aborted");
            return Err(e);
        }
    };
    debug!(%analysis_id, stage = ?Stage::ImageStored, key = %image.key);

    let guard = ImageGuard::new(st.images.clone(), image);
    let result = analyze_stored(st, analysis_id, user_id, guard.url()).await;

    let deleted = guard.release().await;
    debug!(%analysis_id, stage = ?Stage::ImageDeleted, deleted);
    Ok(result)
}

async fn analyze_stored(
    st: &AppState,
    analysis_id: Uuid,
    user_id: &str,
    image_url: &str,
) -> AnalysisResult {
    let profile = st.profiles.load(user_id).await;
    debug!(%analysis_id, stage = ?Stage::ProfileLoaded);

    let metrics = st.metrics.analyze(image_url).await;
    debug!(%analysis_id, stage = ?Stage::MetricsAnalyzed, ?metrics);

    let plan = st.planner.generate(&metrics, &profile).await;
    debug!(%analysis_id, stage = ?Stage::PlanGenerated);

    let result = AnalysisResult::completed(analysis_id, user_id, metrics, plan);
    let saved = st.results.save(&result).await;
    info!(%analysis_id, %user_id, stage = ?Stage::Persisted, saved, "analysis complete");
    result
}
