use serde::{Deserialize, Serialize};

use crate::lenient;

/// Raw `profiles` record. Every column may be missing or oddly typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRow {
    #[serde(default, deserialize_with = "lenient::number")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ethnicity: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub diet_quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sleep_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub exercise_frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stress_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub smoking_habits: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub alcohol_consumption: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sun_exposure: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub protein_intake: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub collagen_vitamin_c: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub facial_exercises: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub massage_skincare: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub weight_changes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_lifestyle_information: LifestyleInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleInfo {
    pub age: Option<i64>,
    pub sex: Option<String>,
    pub ethnicity: Option<String>,
    pub hydration: Option<String>,
    pub sleep_quality: Option<String>,
    pub physical_activity: Option<String>,
    pub posture: Option<String>,
    pub smoking_alcohol: Option<String>,
    pub sun_exposure: Option<String>,
    pub protein_intake: Option<String>,
    #[serde(rename = "collagen_vitamin_C")]
    pub collagen_vitamin_c: Option<String>,
    pub sugar_processed_food: Option<String>,
    pub facial_exercises: Option<String>,
    pub massage_skincare: Option<String>,
    pub weight_changes: Option<String>,
}

impl UserProfile {
    /// Stand-in for a missing or unreadable profile.
    pub fn fallback() -> Self {
        Self {
            user_lifestyle_information: LifestyleInfo {
                age: Some(25),
                sex: Some("Unknown".into()),
                ethnicity: Some("Unknown".into()),
                hydration: Some("2.5L".into()),
                sleep_quality: Some("7 hours".into()),
                physical_activity: Some("3 times a week".into()),
                posture: Some(posture_scale(5.0)),
                smoking_alcohol: Some("no smoking no alcohol".into()),
                sun_exposure: Some("10 mins a day".into()),
                protein_intake: Some("moderate".into()),
                collagen_vitamin_c: Some("moderate".into()),
                sugar_processed_food: Some(sugar_scale(5.0)),
                facial_exercises: Some("none".into()),
                massage_skincare: Some("no".into()),
                weight_changes: Some("65Kg".into()),
            },
        }
    }

    pub fn from_row(row: ProfileRow) -> Self {
        let smoking = row.smoking_habits.unwrap_or_else(|| "no smoking".into());
        let alcohol = row.alcohol_consumption.unwrap_or_else(|| "no alcohol".into());
        Self {
            user_lifestyle_information: LifestyleInfo {
                age: row.age.map(|a| a.round() as i64),
                sex: row.gender,
                ethnicity: row.ethnicity,
                // Diet quality 0-10 maps onto 1.5-4.5 L of water.
                hydration: row.diet_quality.map(|q| format!("{:.1}L", q * 0.3 + 1.5)),
                sleep_quality: row.sleep_hours.map(|h| format!("{} hours", fmt_number(h))),
                physical_activity: row.exercise_frequency,
                posture: row.stress_level.map(posture_scale),
                smoking_alcohol: Some(format!("{smoking} {alcohol}")),
                sun_exposure: row.sun_exposure,
                protein_intake: row.protein_intake,
                collagen_vitamin_c: row.collagen_vitamin_c,
                sugar_processed_food: row.diet_quality.map(|q| sugar_scale(10.0 - q)),
                facial_exercises: row.facial_exercises,
                massage_skincare: row
                    .massage_skincare
                    .map(|v| if v > 5.0 { "yes" } else { "no" }.to_string()),
                weight_changes: row.weight_changes,
            },
        }
    }
}

fn posture_scale(v: f64) -> String {
    format!("{} for 0=Very poor - 10=Excellent", fmt_number(v))
}

fn sugar_scale(v: f64) -> String {
    format!("{} for 0=Very high intake - 10=Very low intake", fmt_number(v))
}

/// Whole numbers print without a fractional part.
fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
