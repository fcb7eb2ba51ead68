//! Risk prediction output types and the classification thresholds.
//!
//! One threshold set applies to every evaluation path (remote, clinical,
//! fallback): the level is always derived from the score by
//! `RiskLevel::from_score`, never supplied independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PatientId, PredictionId, VitalsId};

/// Scores at or above this value classify as `RiskLevel::High`.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Scores at or above this value (and below `HIGH_RISK_THRESHOLD`) classify
/// as `RiskLevel::Moderate`.
pub const MODERATE_RISK_THRESHOLD: f64 = 0.4;

/// Upper bound of every risk score. The model never asserts certainty.
pub const MAX_RISK_SCORE: f64 = 0.95;

/// Clamp a raw score into `[0.0, MAX_RISK_SCORE]`. NaN maps to 0.0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, MAX_RISK_SCORE)
    }
}

/// Three-band HDP risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify a score.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MODERATE_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// The binary prediction: moderate and high both count as elevated concern.
    pub fn is_elevated(&self) -> bool {
        !matches!(self, RiskLevel::Low)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which step of the evaluation chain produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// The remote model-serving collaborator.
    Remote,
    /// The local rule-based clinical evaluator.
    Clinical,
    /// The systolic-only last-resort estimate.
    Fallback,
}

/// An immutable risk assessment for one vitals record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub id: PredictionId,
    pub patient_id: PatientId,
    /// The vitals record this prediction was computed from (1:1).
    pub vitals_id: VitalsId,
    pub risk_level: RiskLevel,
    /// Always within `[0.0, MAX_RISK_SCORE]`.
    pub risk_score: f64,
    /// Human-readable contributing signals, in evaluation order.
    pub factors: Vec<String>,
    pub source: PredictionSource,
    pub created_at: DateTime<Utc>,
}

impl RiskPrediction {
    /// Build a prediction, clamping the score and deriving the level from it.
    pub fn new(
        patient_id: PatientId,
        vitals_id: VitalsId,
        score: f64,
        factors: Vec<String>,
        source: PredictionSource,
    ) -> Self {
        let risk_score = clamp_score(score);
        Self {
            id: PredictionId::new(),
            patient_id,
            vitals_id,
            risk_level: RiskLevel::from_score(risk_score),
            risk_score,
            factors,
            source,
            created_at: Utc::now(),
        }
    }

    /// The binary prediction (1 = elevated concern).
    pub fn binary_prediction(&self) -> u8 {
        u8::from(self.risk_level.is_elevated())
    }

    /// True when the stored level matches the threshold mapping of the score
    /// and the score is in range. Holds for every prediction built by `new`.
    pub fn is_consistent(&self) -> bool {
        (0.0..=MAX_RISK_SCORE).contains(&self.risk_score)
            && self.risk_level == RiskLevel::from_score(self.risk_score)
    }
}
