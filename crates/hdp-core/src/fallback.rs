//! Last-resort estimate from systolic blood pressure alone.
//!
//! Used only when the clinical evaluator itself fails. It touches no
//! external resource and has no failure path.

use hdp_contracts::model::{ModelInput, ModelOutput};

/// Systolic reading at or above which the fallback reports hypertension.
pub const FALLBACK_HYPERTENSION_SYSTOLIC: u32 = 140;

const HYPERTENSIVE_SCORE: f64 = 0.6;
const NORMAL_SCORE: f64 = 0.2;

/// Appended to every fallback prediction so callers can tell a degraded
/// result from a full assessment.
pub const SERVICE_UNAVAILABLE_FACTOR: &str = "Prediction service unavailable";

/// The minimal, infallible estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalFallback;

impl MinimalFallback {
    pub fn assess(input: &ModelInput) -> ModelOutput {
        let (score, finding) = if input.bp >= FALLBACK_HYPERTENSION_SYSTOLIC {
            (HYPERTENSIVE_SCORE, "High blood pressure detected")
        } else {
            (NORMAL_SCORE, "Normal assessment")
        };

        ModelOutput {
            score,
            factors: vec![finding.to_string(), SERVICE_UNAVAILABLE_FACTOR.to_string()],
        }
    }
}
