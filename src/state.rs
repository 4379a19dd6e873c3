use std::sync::Arc;

use crate::analysis::{metrics::MetricsAnalyzer, plan::PlanGenerator};
use crate::config::AppConfig;
use crate::db;
use crate::images::services::ImageStore;
use crate::inference::{InferenceClient, OpenAiClient};
use crate::profiles::{
    repo::{PgProfileRepo, ProfileRepo},
    services::ProfileLoader,
};
use crate::results::{
    repo::{AnalysisRepo, PgAnalysisRepo},
    services::ResultStore,
};
use crate::storage::{Storage, StorageClient};

/// Per-process wiring. Every remote collaborator sits behind a trait object
/// so tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub images: ImageStore,
    pub profiles: ProfileLoader,
    pub metrics: MetricsAnalyzer,
    pub planner: PlanGenerator,
    pub results: ResultStore,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let pool = db::create_pool(&config.database_url).await?;
        db::run_migrations(&pool).await;

        let storage = Arc::new(Storage::new(&config.storage).await?) as Arc<dyn StorageClient>;

        let llm = OpenAiClient::new(&config.inference)?;
        tracing::info!(model = %llm.model(), "inference client initialized");

        Ok(Self::from_parts(
            config,
            storage,
            Arc::new(PgProfileRepo::new(pool.clone())),
            Arc::new(PgAnalysisRepo::new(pool)),
            Arc::new(llm),
        ))
    }

    pub fn from_parts(
        config: AppConfig,
        storage: Arc<dyn StorageClient>,
        profiles: Arc<dyn ProfileRepo>,
        analyses: Arc<dyn AnalysisRepo>,
        inference: Arc<dyn InferenceClient>,
    ) -> Self {
        Self {
            images: ImageStore::new(storage, &config.storage),
            profiles: ProfileLoader::new(profiles),
            metrics: MetricsAnalyzer::new(inference.clone()),
            planner: PlanGenerator::new(inference),
            results: ResultStore::new(analyses),
            config: Arc::new(config),
        }
    }
}
