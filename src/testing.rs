//! In-memory stand-ins for storage, the model, and both tables.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::{AppConfig, InferenceConfig, StorageConfig};
use crate::inference::{ChatRequest, InferenceClient, LlmError};
use crate::profiles::{dto::ProfileRow, repo::ProfileRepo};
use crate::results::{
    dto::{AnalysisRecord, StoredAnalysis},
    repo::AnalysisRepo,
};
use crate::state::AppState;
use crate::storage::{ObjectInfo, StorageClient, StoredObject};

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        storage: StorageConfig {
            endpoint: "https://storage.test".into(),
            bucket: "images".into(),
            folder: "temp_analysis".into(),
            access_key: "test".into(),
            secret_key: "test".into(),
            region: "us-east-1".into(),
            url_ttl_secs: 1800,
            max_age_hours: 1,
        },
        inference: InferenceConfig {
            api_key: None,
            base_url: "https://llm.test/v1".into(),
            model: "test-model".into(),
        },
        cleanup_on_startup: false,
    }
}

struct FakeObject {
    body: Bytes,
    content_type: String,
    last_modified: OffsetDateTime,
}

#[derive(Default)]
pub struct FakeStorage {
    objects: Mutex<HashMap<String, FakeObject>>,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    fail_put: bool,
    fail_presign: bool,
}

impl FakeStorage {
    pub fn failing_put() -> Self {
        Self {
            fail_put: true,
            ..Default::default()
        }
    }

    pub fn failing_presign() -> Self {
        Self {
            fail_presign: true,
            ..Default::default()
        }
    }

    /// Seeds an object whose last modification was `age` ago.
    pub fn insert_aged(&self, key: &str, age: Duration) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            FakeObject {
                body: Bytes::from_static(b"\x89PNG"),
                content_type: "image/png".into(),
                last_modified: OffsetDateTime::now_utc() - age,
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Waits for deletes spawned from a dropped guard to land.
    pub async fn wait_for_deletes(&self, n: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(2), async {
            while self.deletes() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "expected {n} deletes, saw {}", self.deletes());
    }
}

#[async_trait]
impl StorageClient for FakeStorage {
    async fn ensure_bucket(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        if self.fail_put {
            return Err(anyhow!("storage unavailable"));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().insert(
            key.to_string(),
            FakeObject {
                body,
                content_type: content_type.to_string(),
                last_modified: OffsetDateTime::now_utc(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> anyhow::Result<Option<StoredObject>> {
        Ok(self.objects.lock().unwrap().get(key).map(|o| StoredObject {
            body: o.body.clone(),
            content_type: Some(o.content_type.clone()),
        }))
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.objects.lock().unwrap().remove(key);
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> anyhow::Result<Vec<ObjectInfo>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, o)| ObjectInfo {
                key: k.clone(),
                last_modified: Some(o.last_modified),
            })
            .collect())
    }

    async fn presign_get(&self, key: &str, seconds: u64) -> anyhow::Result<String> {
        if self.fail_presign {
            return Err(anyhow!("signing key rejected"));
        }
        Ok(format!(
            "https://storage.test/images/{key}?X-Amz-Expires={seconds}"
        ))
    }
}

pub const CANNED_METRICS: &str = r#"{
  "cheek_lift": 6,
  "cheek_fullness": 7,
  "smile_symmetry": 8,
  "muscle_tone": 5,
  "elasticity_sagging": 9,
  "fat_vs_muscle_contribution": "60% muscle / 40% fat"
}"#;

pub const CANNED_PLAN: &str = r#"{
  "cheek_improvement_plan": {
    "title": "Cheek Improvement Plan",
    "description": "Daily routine for firmer cheeks.",
    "steps": [
      {
        "category": "Facial Exercises",
        "goal": "Tone cheek muscles",
        "exercises": [
          {
            "name": "Puffy Cheek Exercise",
            "description": "Fill cheeks with air and hold.",
            "reps": "10",
            "duration": "10 seconds",
            "frequency_per_week": 5
          }
        ]
      },
      {
        "category": "Hydration",
        "goal": "Support skin elasticity",
        "recommendations": ["Drink 2L of water daily"]
      }
    ]
  }
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceBehavior {
    /// Well-formed JSON for both prompts.
    Canned,
    /// Metrics JSON surrounded by prose.
    Wrapped,
    /// Text with no JSON object in it.
    Garbage,
    /// Returns this text for every prompt.
    Reply(&'static str),
    Error,
    Panic,
    Unconfigured,
}

pub struct FakeInference {
    behavior: InferenceBehavior,
    calls: AtomicUsize,
    last: Mutex<Option<ChatRequest>>,
}

impl FakeInference {
    pub fn new(behavior: InferenceBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for FakeInference {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let wants_metrics = request.image_url.is_some();
        *self.last.lock().unwrap() = Some(request);

        match self.behavior {
            InferenceBehavior::Canned if wants_metrics => Ok(CANNED_METRICS.to_string()),
            InferenceBehavior::Canned => Ok(CANNED_PLAN.to_string()),
            InferenceBehavior::Wrapped => Ok(format!(
                "Here is the analysis you asked for:\n{CANNED_METRICS}\nLet me know if you need more."
            )),
            InferenceBehavior::Garbage => Ok("I cannot assess this photo.".to_string()),
            InferenceBehavior::Reply(text) => Ok(text.to_string()),
            InferenceBehavior::Error => Err(LlmError::Api {
                status: 503,
                message: "upstream overloaded".into(),
            }),
            InferenceBehavior::Panic => panic!("model client crashed"),
            InferenceBehavior::Unconfigured => Err(LlmError::MissingCredentials),
        }
    }
}

#[derive(Default)]
pub struct FakeProfiles {
    row: Option<ProfileRow>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeProfiles {
    pub fn with_row(row: ProfileRow) -> Self {
        Self {
            row: Some(row),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileRepo for FakeProfiles {
    async fn find_profile(&self, _user_id: &str) -> anyhow::Result<Option<ProfileRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.row.clone())
    }
}

#[derive(Default)]
pub struct FakeAnalyses {
    rows: Mutex<Vec<AnalysisRecord>>,
    fail: bool,
}

impl FakeAnalyses {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisRepo for FakeAnalyses {
    async fn insert_analysis(&self, record: &AnalysisRecord) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow!("insert rejected"));
        }
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_analyses(&self, user_id: &str, limit: i64) -> anyhow::Result<Vec<StoredAnalysis>> {
        if self.fail {
            return Err(anyhow!("select rejected"));
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit.max(0) as usize)
            .map(|r| StoredAnalysis {
                id: Uuid::new_v4(),
                user_id: r.user_id.clone(),
                analysis_data: r.analysis_data.clone(),
                recommendations: r.recommendations.clone(),
                scores: serde_json::to_value(r.scores).unwrap_or_default(),
                analysis_date: Some(r.analysis_date),
                created_at: r.analysis_date,
            })
            .collect())
    }
}

/// Fully faked `AppState` plus handles to inspect each collaborator.
pub struct Harness {
    pub storage: Arc<FakeStorage>,
    pub inference: Arc<FakeInference>,
    pub profiles: Arc<FakeProfiles>,
    pub analyses: Arc<FakeAnalyses>,
    user_id: String,
}

impl Harness {
    pub fn new(behavior: InferenceBehavior) -> Self {
        Self::with_storage(FakeStorage::default(), behavior)
    }

    pub fn with_storage(storage: FakeStorage, behavior: InferenceBehavior) -> Self {
        Self {
            storage: Arc::new(storage),
            inference: Arc::new(FakeInference::new(behavior)),
            profiles: Arc::new(FakeProfiles::empty()),
            analyses: Arc::new(FakeAnalyses::default()),
            user_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    pub fn with_failing_analyses(mut self) -> Self {
        self.analyses = Arc::new(FakeAnalyses::failing());
        self
    }

    pub fn state(&self) -> AppState {
        AppState::from_parts(
            test_config(),
            self.storage.clone(),
            self.profiles.clone(),
            self.analyses.clone(),
            self.inference.clone(),
        )
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
