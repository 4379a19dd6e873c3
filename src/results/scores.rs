use super::dto::Scores;
use crate::analysis::dto::CheekMetrics;

const DEFAULT_OVERALL: f64 = 6.0;
const DEFAULT_POTENTIAL: f64 = 6.0;

/// Mean of the numeric scores present, one decimal place, ties to even.
/// `None` when the model gave no numeric score at all.
fn mean_score(metrics: &CheekMetrics) -> Option<f64> {
    let present: Vec<f64> = metrics.scores().into_iter().flatten().collect();
    if present.is_empty() {
        return None;
    }
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    Some((mean * 10.0).round_ties_even() / 10.0)
}

/// Lower current scores leave more room to improve.
pub fn improvement_potential(overall: f64) -> f64 {
    if overall < 5.0 {
        9.0
    } else if overall < 7.0 {
        8.0
    } else if overall < 8.0 {
        7.0
    } else {
        6.0
    }
}

/// With nothing to average both scores take their defaults.
pub fn score(metrics: &CheekMetrics) -> Scores {
    match mean_score(metrics) {
        Some(overall_score) => Scores {
            overall_score,
            improvement_potential: improvement_potential(overall_score),
        },
        None => Scores {
            overall_score: DEFAULT_OVERALL,
            improvement_potential: DEFAULT_POTENTIAL,
        },
    }
}
