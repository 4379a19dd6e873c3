use serde::Serialize;

pub const METRICS_SYSTEM_PROMPT: &str = "\
You are a facial aesthetics analysis model. Analyze the provided selfie and report \
quantitative metrics for the cheeks only, following approaches from peer-reviewed research \
and validated facial rating scales: facial landmarks, relative distances, contour and \
convexity, volume estimation and tone proxies.

Respond with a single JSON object and nothing else:
{
  \"cheek_lift\": <0-10, 0 = very low, 10 = very lifted>,
  \"cheek_fullness\": <0-10, 0 = flat, 10 = very full>,
  \"smile_symmetry\": <0-10, 0 = asymmetric, 10 = perfectly symmetrical>,
  \"muscle_tone\": <0-10, 0 = soft, 10 = very toned>,
  \"elasticity_sagging\": <0-10, 0 = sagging, 10 = very firm>,
  \"fat_vs_muscle_contribution\": \"<N>% muscle / <M>% fat\"
}

Every value must be computed from the image. No placeholders, no commentary.";

pub const METRICS_USER_PROMPT: &str = "\
Analyze this image and return the cheek metrics JSON defined in the system prompt. \
Compute a real value for every field; do not return zeros, nulls or placeholders.";

pub const PLAN_USER_PROMPT: &str = "\
Create the personalized, science-backed cheek improvement plan as JSON using the metrics \
and user information provided. Fill every field. Output only valid JSON.";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogExercise {
    pub name: &'static str,
    pub description: &'static str,
    pub reps: &'static str,
    pub duration: &'static str,
    pub frequency_per_week: &'static str,
}

/// The only exercises the plan may recommend.
pub const EXERCISE_CATALOG: [CatalogExercise; 11] = [
    CatalogExercise {
        name: "Cheek Lift Exercise",
        description: "Strengthens and lifts the upper cheeks by smiling while raising the cheeks toward the eyes.",
        reps: "10-15",
        duration: "5-10 seconds hold per rep",
        frequency_per_week: "4-5",
    },
    CatalogExercise {
        name: "Smiley Face Exercise",
        description: "Improves cheek flexibility and tone through exaggerated smiling movements.",
        reps: "15-20",
        duration: "3-5 seconds hold per rep",
        frequency_per_week: "5-6",
    },
    CatalogExercise {
        name: "Fish Lips Facial Exercise",
        description: "Tones the lower face by sucking in the cheeks and forming a 'fish face'.",
        reps: "10-15",
        duration: "5 seconds hold per rep",
        frequency_per_week: "3-4",
    },
    CatalogExercise {
        name: "Puffy Cheek Exercise",
        description: "Strengthens cheek muscles by filling the cheeks with air and holding.",
        reps: "8-12",
        duration: "10-15 seconds hold per rep",
        frequency_per_week: "4-5",
    },
    CatalogExercise {
        name: "Make X and O Expressions",
        description: "Enhances lip and cheek coordination by alternating exaggerated 'X' and 'O' mouth shapes.",
        reps: "15-20",
        duration: "2-3 seconds per movement",
        frequency_per_week: "5-6",
    },
    CatalogExercise {
        name: "Hummingbird",
        description: "Stimulates circulation and wakes up facial muscles through humming vibrations.",
        reps: "5-10",
        duration: "15-20 seconds per set",
        frequency_per_week: "3-4",
    },
    CatalogExercise {
        name: "Puppet Face Exercise",
        description: "Works the smile muscles by exaggerating upward pulls at the mouth corners.",
        reps: "12-15",
        duration: "5 seconds hold per rep",
        frequency_per_week: "4-5",
    },
    CatalogExercise {
        name: "Plump Cheeks Exercise",
        description: "Adds fullness through controlled plumping and puffing of air.",
        reps: "10-12",
        duration: "8-10 seconds per rep",
        frequency_per_week: "4-5",
    },
    CatalogExercise {
        name: "Cheek Press",
        description: "Defines the cheekbones by pressing fingers lightly against the cheeks while smiling.",
        reps: "10-12",
        duration: "5-8 seconds hold per rep",
        frequency_per_week: "3-4",
    },
    CatalogExercise {
        name: "Chewing Lift",
        description: "Strengthens the jawline and lower cheeks with exaggerated chewing movements.",
        reps: "15-20",
        duration: "5-10 seconds per rep",
        frequency_per_week: "5",
    },
    CatalogExercise {
        name: "Facial Massage Cheek Lift",
        description: "Improves circulation and skin elasticity by massaging the cheeks upward.",
        reps: "5-8",
        duration: "30-60 seconds per massage",
        frequency_per_week: "3-4",
    },
];

const PLAN_SHAPE: &str = r#"{
  "cheek_improvement_plan": {
    "title": "Cheek Improvement Plan",
    "description": "<short evidence-based summary for this user>",
    "steps": [
      {
        "category": "Facial Exercises",
        "goal": "<goal based on muscle tone and fat/muscle ratio>",
        "exercises": [
          {
            "name": "<name from the exercise library>",
            "description": "<what it does>",
            "reps": "<personalized reps>",
            "duration": "<personalized duration>",
            "frequency_per_week": "<times per week>"
          }
        ]
      },
      { "category": "Diet & Nutrition", "goal": "<goal>", "recommendations": ["<...>"] },
      { "category": "Lifestyle & Sleep", "goal": "<goal>", "recommendations": ["<...>"] },
      { "category": "Posture & Jaw/Tongue Position", "goal": "<goal>", "recommendations": ["<...>"] },
      { "category": "Skin Protection & Skincare", "goal": "<goal>", "recommendations": ["<...>"] }
    ]
  }
}"#;

/// Builds the plan instruction with the metrics and profile inlined as JSON.
pub fn plan_system_prompt(metrics_json: &str, profile_json: &str) -> String {
    let catalog = serde_json::to_string_pretty(&EXERCISE_CATALOG).unwrap_or_default();
    format!(
        "You create personalized, science-backed cheek improvement plans.\n\n\
         Cheek metrics:\n{metrics_json}\n\n\
         User information:\n{profile_json}\n\n\
         Return JSON with exactly this structure:\n{PLAN_SHAPE}\n\n\
         Exercise library (choose exercises only from this list and personalize \
         reps, duration and frequency within sensible bounds of the listed ranges):\n{catalog}\n\n\
         Rules:\n\
         1. Tailor exercise choice, reps and duration to the metrics.\n\
         2. Base diet, lifestyle, posture and skincare advice on the user information.\n\
         3. Leave no field blank.\n\
         4. Recommend only methods supported by scientific research; no cosmetic procedures.\n\
         5. Output only valid JSON."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = EXERCISE_CATALOG.iter().map(|e| e.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn plan_prompt_inlines_inputs_and_catalog() {
        let prompt = plan_system_prompt(r#"{"cheek_lift":6.0}"#, r#"{"age":30}"#);
        assert!(prompt.contains(r#"{"cheek_lift":6.0}"#));
        assert!(prompt.contains(r#"{"age":30}"#));
        assert!(prompt.contains("Facial Massage Cheek Lift"));
        assert!(prompt.contains("\"frequency_per_week\": \"4-5\""));
    }
}
