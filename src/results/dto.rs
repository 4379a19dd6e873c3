use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub overall_score: f64,
    pub improvement_potential: f64,
}

/// One `user_analyses` row as written.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub user_id: String,
    pub analysis_data: Value,
    pub recommendations: Value,
    pub scores: Scores,
    #[serde(with = "time::serde::rfc3339")]
    pub analysis_date: OffsetDateTime,
    pub photo_url: Option<String>,
    pub photo_path: Option<String>,
    pub device_info: Value,
    pub app_version: String,
}

/// One `user_analyses` row as read back for the history endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub user_id: String,
    pub analysis_data: Value,
    pub recommendations: Value,
    pub scores: Value,
    #[serde(with = "time::serde::rfc3339::option")]
    pub analysis_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    10
}
