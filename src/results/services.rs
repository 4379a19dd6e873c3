use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use super::dto::{AnalysisRecord, StoredAnalysis};
use super::repo::AnalysisRepo;
use super::scores;
use crate::analysis::dto::AnalysisResult;

#[derive(Clone)]
pub struct ResultStore {
    repo: Arc<dyn AnalysisRepo>,
}

impl ResultStore {
    pub fn new(repo: Arc<dyn AnalysisRepo>) -> Self {
        Self { repo }
    }

    /// Persists one analysis. Failures are logged and reported as `false`.
    pub async fn save(&self, result: &AnalysisResult) -> bool {
        let record = match build_record(result) {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, analysis_id = %result.analysis_id, "encode analysis record");
                return false;
            }
        };

        match self.repo.insert_analysis(&record).await {
            Ok(()) => {
                info!(
                    user_id = %result.user_id,
                    overall = record.scores.overall_score,
                    potential = record.scores.improvement_potential,
                    "analysis saved"
                );
                true
            }
            Err(e) => {
                error!(user_id = %result.user_id, error = %format!("{e:#}"), "failed to save analysis");
                false
            }
        }
    }

    /// Previous analyses, newest first. Errors yield an empty list.
    pub async fn history(&self, user_id: &str, limit: i64) -> Vec<StoredAnalysis> {
        match self.repo.list_analyses(user_id, limit.clamp(1, 100)).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(%user_id, error = %format!("{e:#}"), "failed to list analyses");
                Vec::new()
            }
        }
    }
}

fn build_record(result: &AnalysisResult) -> serde_json::Result<AnalysisRecord> {
    Ok(AnalysisRecord {
        user_id: result.user_id.clone(),
        analysis_data: serde_json::to_value(&result.cheek_metrics)?,
        recommendations: serde_json::to_value(&result.improvement_plan)?,
        scores: scores::score(&result.cheek_metrics),
        analysis_date: result.timestamp,
        photo_url: None,
        photo_path: None,
        device_info: json!({ "platform": "mobile_app" }),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dto::{CheekMetrics, ImprovementPlan};
    use crate::testing::FakeAnalyses;
    use uuid::Uuid;

    fn result() -> AnalysisResult {
        AnalysisResult::completed(
            Uuid::new_v4(),
            "8d7e3b1c-0000-4000-8000-000000000001",
            CheekMetrics::fallback(),
            ImprovementPlan::fallback(),
        )
    }

    #[tokio::test]
    async fn writes_scored_record() {
        let repo = Arc::new(FakeAnalyses::default());
        let store = ResultStore::new(repo.clone());
        assert!(store.save(&result()).await);

        let records = repo.records();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.scores.overall_score, 6.3);
        assert_eq!(rec.scores.improvement_potential, 8.0);
        assert_eq!(rec.analysis_data["cheek_lift"], 6.0);
        assert_eq!(rec.device_info["platform"], "mobile_app");
        assert!(rec.photo_url.is_none());
    }

    #[tokio::test]
    async fn stores_metrics_verbatim_and_scores_only_numbers() {
        let metrics: CheekMetrics = serde_json::from_value(json!({
            "cheek_lift": "9",
            "cheek_fullness": "high",
            "confidence": 0.8
        }))
        .unwrap();
        let result = AnalysisResult::completed(
            Uuid::new_v4(),
            "user-42",
            metrics,
            ImprovementPlan::fallback(),
        );
        let repo = Arc::new(FakeAnalyses::default());
        assert!(ResultStore::new(repo.clone()).save(&result).await);

        let rec = &repo.records()[0];
        assert_eq!(rec.user_id, "user-42");
        assert_eq!(rec.analysis_data["cheek_lift"], "9");
        assert_eq!(rec.analysis_data["cheek_fullness"], "high");
        assert_eq!(rec.analysis_data["confidence"], 0.8);
        assert_eq!(rec.scores.overall_score, 6.0);
        assert_eq!(rec.scores.improvement_potential, 6.0);
    }

    #[tokio::test]
    async fn write_failure_is_reported_not_raised() {
        let repo = Arc::new(FakeAnalyses::failing());
        assert!(!ResultStore::new(repo).save(&result()).await);
    }

    #[tokio::test]
    async fn history_error_yields_empty_list() {
        let repo = Arc::new(FakeAnalyses::failing());
        assert!(ResultStore::new(repo).history("u", 10).await.is_empty());
    }
}
