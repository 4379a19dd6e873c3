//! Chat-style access to the multimodal model used for both the cheek
//! analysis and the improvement plan.

use async_trait::async_trait;
use thiserror::Error;

pub mod json;
mod openai;
pub mod prompts;

pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("inference API key is not configured")]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no content")]
    EmptyContent,

    #[error("model returned non-text content")]
    NonTextContent,
}

/// One system instruction plus one user turn, optionally carrying an image.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user_text: String,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Returns the raw text of the first completion choice.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

pub(crate) fn preview(text: &str) -> String {
    const LIMIT: usize = 200;
    if text.chars().count() <= LIMIT {
        return text.to_string();
    }
    let head: String = text.chars().take(LIMIT).collect();
    format!("{head}...")
}
