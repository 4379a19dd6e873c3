use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

pub const STATUS_COMPLETED: &str = "completed";

/// The five numeric metric fields, in the order they are averaged.
pub const SCORE_FIELDS: [&str; 5] = [
    "cheek_lift",
    "cheek_fullness",
    "smile_symmetry",
    "muscle_tone",
    "elasticity_sagging",
];

/// Metrics object exactly as the model returned it. Only the top-level
/// shape is checked; values and extra keys are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheekMetrics(Map<String, Value>);

impl CheekMetrics {
    pub fn fallback() -> Self {
        Self(into_map(json!({
            "cheek_lift": 6.0,
            "cheek_fullness": 6.5,
            "smile_symmetry": 7.0,
            "muscle_tone": 6.0,
            "elasticity_sagging": 6.2,
            "fat_vs_muscle_contribution": "55% muscle / 45% fat"
        })))
    }

    /// A metric field if it holds a JSON number. Numeric-looking strings
    /// do not count.
    pub fn score(&self, field: &str) -> Option<f64> {
        self.0.get(field).filter(|v| v.is_number()).and_then(Value::as_f64)
    }

    pub fn scores(&self) -> [Option<f64>; 5] {
        SCORE_FIELDS.map(|field| self.score(field))
    }
}

/// Plan object exactly as the model returned it, normally wrapped in
/// `cheek_improvement_plan`. Nothing below the top level is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImprovementPlan(Map<String, Value>);

impl ImprovementPlan {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fallback() -> Self {
        let plan = json!({
            "cheek_improvement_plan": {
                "title": "Cheek Improvement Plan",
                "description": "A personalized plan to enhance your cheek appearance through \
                                evidence-based exercises and lifestyle recommendations.",
                "steps": [
                    {
                        "category": "Facial Exercises",
                        "goal": "Improve cheek muscle tone and lift",
                        "exercises": [
                            {
                                "name": "Cheek Lift Exercise",
                                "description": "Strengthens and lifts the upper cheeks by smiling \
                                                while raising the cheeks toward the eyes.",
                                "reps": "12-15",
                                "duration": "8 seconds hold per rep",
                                "frequency_per_week": "5"
                            }
                        ]
                    },
                    {
                        "category": "Diet & Nutrition",
                        "goal": "Support skin health and muscle maintenance",
                        "recommendations": [
                            "Increase protein intake to support muscle maintenance",
                            "Include vitamin C rich foods for collagen synthesis",
                            "Stay well hydrated for skin plumpness"
                        ]
                    }
                ]
            }
        });
        Self(into_map(plan))
    }
}

fn into_map(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub cheek_metrics: CheekMetrics,
    pub improvement_plan: ImprovementPlan,
    pub status: String,
}

impl AnalysisResult {
    pub fn completed(
        analysis_id: Uuid,
        user_id: &str,
        cheek_metrics: CheekMetrics,
        improvement_plan: ImprovementPlan,
    ) -> Self {
        Self {
            analysis_id,
            user_id: user_id.to_string(),
            timestamp: OffsetDateTime::now_utc(),
            cheek_metrics,
            improvement_plan,
            status: STATUS_COMPLETED.into(),
        }
    }
}
