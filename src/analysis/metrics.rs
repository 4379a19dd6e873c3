use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use super::dto::CheekMetrics;
use crate::inference::{
    json::{extract_object, JsonExtraction},
    preview, prompts, ChatRequest, InferenceClient,
};

/// Turns a stored selfie into `CheekMetrics`. Never fails: any upstream or
/// parse problem yields `CheekMetrics::fallback()`.
#[derive(Clone)]
pub struct MetricsAnalyzer {
    client: Arc<dyn InferenceClient>,
}

impl MetricsAnalyzer {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    pub async fn analyze(&self, image_url: &str) -> CheekMetrics {
        match self.request_metrics(image_url).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "cheek analysis failed; using fallback metrics");
                CheekMetrics::fallback()
            }
        }
    }

    async fn request_metrics(&self, image_url: &str) -> anyhow::Result<CheekMetrics> {
        let text = self
            .client
            .complete(ChatRequest {
                system: prompts::METRICS_SYSTEM_PROMPT.to_string(),
                user_text: prompts::METRICS_USER_PROMPT.to_string(),
                image_url: Some(image_url.to_string()),
            })
            .await
            .context("metrics inference call")?;
        debug!(response = %preview(&text), "metrics response received");

        let parsed = extract_object::<CheekMetrics>(&text);
        if let JsonExtraction::Extracted(_) = parsed {
            info!("metrics recovered from surrounding text");
        }
        parsed.into_result().context("parse metrics response")
    }
}
