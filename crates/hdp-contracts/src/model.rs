//! Model-facing types: the normalized scoring input, the remote wire
//! response, and the score/factor pair every `RiskModel` returns.

use serde::{Deserialize, Serialize};

use crate::vitals::{Symptom, VitalsSnapshot};

/// The normalized input every scoring model consumes.
///
/// This is also the remote request body. Symptom flags travel as `0`/`1`:
///
/// ```json
/// { "bp": 150, "swelling": 0, "headache": 1, "age": 30, "weight": 70.0, "heart_rate": 95 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    /// Systolic blood pressure, mmHg.
    pub bp: u32,
    #[serde(with = "flag")]
    pub swelling: bool,
    #[serde(with = "flag")]
    pub headache: bool,
    pub age: u32,
    /// Body weight, kg.
    pub weight: f64,
    pub heart_rate: u32,
}

impl ModelInput {
    /// Reduce a snapshot to model input. `patient_age` is used as given; the
    /// caller resolves the default for unknown ages.
    ///
    /// Only swelling and headache survive normalization. Other symptoms are
    /// accepted upstream but do not score.
    pub fn from_snapshot(vitals: &VitalsSnapshot, patient_age: u32) -> Self {
        Self {
            bp: vitals.systolic_bp,
            swelling: vitals.has_symptom(Symptom::Swelling),
            headache: vitals.has_symptom(Symptom::Headache),
            age: patient_age,
            weight: vitals.weight_kg,
            heart_rate: vitals.heart_rate,
        }
    }
}

/// The body returned by the remote scoring service on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Echo of the request. Optional: only the scoring fields are required.
    #[serde(default)]
    pub input: Option<ModelInput>,
    /// The service's own binary call (0 or 1).
    pub risk_prediction: u8,
    /// Probability of HDP in `[0, 1]`.
    pub risk_probability: f64,
    #[serde(default)]
    pub message: Option<String>,
    pub factors: Vec<String>,
}

/// What a scoring model produces before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    /// Unclamped score. The evaluator clamps and classifies it.
    pub score: f64,
    pub factors: Vec<String>,
}

/// `bool` as the integers `0`/`1` on the wire.
mod flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(de::Error::custom(format!("expected 0 or 1, got {other}"))),
        }
    }
}
