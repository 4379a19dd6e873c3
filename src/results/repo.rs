use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use super::dto::{AnalysisRecord, StoredAnalysis};

#[async_trait]
pub trait AnalysisRepo: Send + Sync {
    async fn insert_analysis(&self, record: &AnalysisRecord) -> anyhow::Result<()>;
    async fn list_analyses(&self, user_id: &str, limit: i64) -> anyhow::Result<Vec<StoredAnalysis>>;
}

#[derive(Clone)]
pub struct PgAnalysisRepo {
    db: PgPool,
}

impl PgAnalysisRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnalysisRepo for PgAnalysisRepo {
    async fn insert_analysis(&self, record: &AnalysisRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_analyses
                (user_id, analysis_data, recommendations, scores, analysis_date,
                 photo_url, photo_path, device_info, app_version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&record.user_id)
        .bind(Json(&record.analysis_data))
        .bind(Json(&record.recommendations))
        .bind(Json(&record.scores))
        .bind(record.analysis_date)
        .bind(record.photo_url.as_deref())
        .bind(record.photo_path.as_deref())
        .bind(Json(&record.device_info))
        .bind(&record.app_version)
        .execute(&self.db)
        .await
        .context("insert user_analyses")?;
        Ok(())
    }

    async fn list_analyses(&self, user_id: &str, limit: i64) -> anyhow::Result<Vec<StoredAnalysis>> {
        let rows = sqlx::query_as::<_, StoredAnalysis>(
            r#"
            SELECT id, user_id, analysis_data, recommendations, scores, analysis_date, created_at
              FROM user_analyses
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("list user_analyses")?;
        Ok(rows)
    }
}
