use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub folder: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub url_ttl_secs: u64,
    pub max_age_hours: u64,
}

impl StorageConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours * 60 * 60)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Absent key means every inference call resolves to its fallback value.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub storage: StorageConfig,
    pub inference: InferenceConfig,
    pub cleanup_on_startup: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = require_env("DATABASE_URL")?;
        let storage = StorageConfig {
            endpoint: require_env("S3_ENDPOINT")?,
            bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "images".into()),
            folder: std::env::var("IMAGE_FOLDER").unwrap_or_else(|_| "temp_analysis".into()),
            access_key: require_env("S3_ACCESS_KEY")?,
            secret_key: require_env("S3_SECRET_KEY")?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            url_ttl_secs: parse_env("IMAGE_URL_TTL_SECS", 30 * 60),
            max_age_hours: parse_env("IMAGE_MAX_AGE_HOURS", 1),
        };
        let inference = InferenceConfig {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-5-mini".into()),
        };
        let cleanup_on_startup = std::env::var("CLEANUP_ON_STARTUP")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        Ok(Self {
            database_url,
            storage,
            inference,
            cleanup_on_startup,
        })
    }
}

fn require_env(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("required environment variable {key} is not set"))
}

fn parse_env(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
