use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ChatRequest, InferenceClient, LlmError};
use crate::config::InferenceConfig;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-compatible chat completions client. No retries and no request
/// timeout: a stalled upstream stalls the request that issued it.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(cfg: &InferenceConfig) -> anyhow::Result<Self> {
        if cfg.api_key.is_none() {
            warn!("OPENAI_API_KEY not set; analysis will use fallback values");
        }
        Ok(Self {
            client: Client::builder().build()?,
            api_key: cfg.api_key.clone(),
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            model: cfg.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredentials)?;

        let user_content = match request.image_url.as_deref() {
            Some(url) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: &request.user_text,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url },
                },
            ]),
            None => MessageContent::Text(&request.user_text),
        };
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text(&request.system),
                },
                Message {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: 0.0,
            top_p: 1.0,
        };

        debug!(model = %self.model, with_image = request.image_url.is_some(), "calling inference API");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        match content {
            Value::String(text) => Ok(text),
            Value::Null => Err(LlmError::EmptyContent),
            _ => Err(LlmError::NonTextContent),
        }
    }
}
