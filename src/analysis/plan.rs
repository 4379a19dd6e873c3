use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use super::dto::{CheekMetrics, ImprovementPlan};
use crate::inference::{
    json::{extract_object, JsonExtraction},
    preview, prompts, ChatRequest, InferenceClient,
};
use crate::profiles::dto::UserProfile;

/// Asks the model for a personalized plan. Never fails: any upstream or
/// parse problem yields `ImprovementPlan::fallback()`.
#[derive(Clone)]
pub struct PlanGenerator {
    client: Arc<dyn InferenceClient>,
}

impl PlanGenerator {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    pub async fn generate(&self, metrics: &CheekMetrics, profile: &UserProfile) -> ImprovementPlan {
        match self.request_plan(metrics, profile).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "plan generation failed; using fallback plan");
                ImprovementPlan::fallback()
            }
        }
    }

    async fn request_plan(
        &self,
        metrics: &CheekMetrics,
        profile: &UserProfile,
    ) -> anyhow::Result<ImprovementPlan> {
        let metrics_json = serde_json::to_string(metrics).context("encode metrics")?;
        let profile_json = serde_json::to_string(profile).context("encode profile")?;

        let text = self
            .client
            .complete(ChatRequest {
                system: prompts::plan_system_prompt(&metrics_json, &profile_json),
                user_text: prompts::PLAN_USER_PROMPT.to_string(),
                image_url: None,
            })
            .await
            .context("plan inference call")?;
        debug!(response = %preview(&text), "plan response received");

        let parsed = extract_object::<ImprovementPlan>(&text);
        if let JsonExtraction::Extracted(_) = parsed {
            info!("plan recovered from surrounding text");
        }
        let plan = parsed.into_result().context("parse plan response")?;
        if plan.get("cheek_improvement_plan").is_none() {
            warn!("plan response has no cheek_improvement_plan key; returning it as sent");
        }
        Ok(plan)
    }
}
