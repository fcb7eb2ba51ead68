//! Vitals snapshot and stored vitals record types.
//!
//! A `VitalsSnapshot` is what the evaluator scores. A `VitalsRecord` wraps a
//! snapshot with the identifiers and timestamp the application layer stores.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::HdpError,
    ids::{PatientId, VitalsId},
};

/// Age assumed when neither the snapshot nor the patient profile knows it.
pub const DEFAULT_PATIENT_AGE: u32 = 28;

/// A reported symptom from the fixed vocabulary.
///
/// Only `Swelling` and `Headache` influence the clinical score; the rest are
/// recorded for clinician review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Headache,
    BlurredVision,
    Swelling,
    Nausea,
    Dizziness,
    ChestPain,
    ShortnessOfBreath,
}

impl Symptom {
    /// Every symptom in the vocabulary, in declaration order.
    pub const ALL: [Symptom; 7] = [
        Symptom::Headache,
        Symptom::BlurredVision,
        Symptom::Swelling,
        Symptom::Nausea,
        Symptom::Dizziness,
        Symptom::ChestPain,
        Symptom::ShortnessOfBreath,
    ];

    /// The snake_case tag used on the wire and in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Symptom::Headache => "headache",
            Symptom::BlurredVision => "blurred_vision",
            Symptom::Swelling => "swelling",
            Symptom::Nausea => "nausea",
            Symptom::Dizziness => "dizziness",
            Symptom::ChestPain => "chest_pain",
            Symptom::ShortnessOfBreath => "shortness_of_breath",
        }
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symptom {
    type Err = HdpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Symptom::ALL
            .iter()
            .copied()
            .find(|symptom| symptom.as_str() == tag)
            .ok_or(HdpError::UnknownSymptom { tag: s.to_string() })
    }
}

/// One set of a patient's measured health indicators.
///
/// Built with `VitalsSnapshot::new` and the `with_*` methods. The evaluator
/// only ever borrows a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    /// Systolic blood pressure, mmHg.
    pub systolic_bp: u32,
    /// Diastolic blood pressure, mmHg.
    pub diastolic_bp: u32,
    /// Heart rate, bpm.
    pub heart_rate: u32,
    /// Body weight, kg.
    pub weight_kg: f64,
    /// Patient age in years. `None` means unknown; the evaluator substitutes
    /// its configured default.
    pub age: Option<u32>,
    /// Reported symptoms. Ordered so serialized snapshots are stable.
    #[serde(default)]
    pub symptoms: BTreeSet<Symptom>,
    /// Whether the patient took prescribed medication.
    #[serde(default)]
    pub medication_taken: bool,
}

impl VitalsSnapshot {
    pub fn new(systolic_bp: u32, diastolic_bp: u32, heart_rate: u32, weight_kg: f64) -> Self {
        Self {
            systolic_bp,
            diastolic_bp,
            heart_rate,
            weight_kg,
            age: None,
            symptoms: BTreeSet::new(),
            medication_taken: false,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_symptom(mut self, symptom: Symptom) -> Self {
        self.symptoms.insert(symptom);
        self
    }

    pub fn with_symptoms(mut self, symptoms: impl IntoIterator<Item = Symptom>) -> Self {
        self.symptoms.extend(symptoms);
        self
    }

    pub fn with_medication_taken(mut self, taken: bool) -> Self {
        self.medication_taken = taken;
        self
    }

    /// Parse free-form symptom tags and add them to the snapshot.
    ///
    /// Fails on the first tag outside the vocabulary.
    pub fn with_symptom_tags<S: AsRef<str>>(
        mut self,
        tags: impl IntoIterator<Item = S>,
    ) -> Result<Self, HdpError> {
        for tag in tags {
            self.symptoms.insert(tag.as_ref().parse()?);
        }
        Ok(self)
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }
}

/// A stored vitals snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsRecord {
    pub id: VitalsId,
    pub patient_id: PatientId,
    /// When the measurements were taken (UTC).
    pub recorded_at: DateTime<Utc>,
    /// Optional free-text remarks from the patient.
    pub notes: Option<String>,
    pub snapshot: VitalsSnapshot,
}
