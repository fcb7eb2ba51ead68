//! In-memory implementation of every repository trait.
//!
//! `InMemoryStore` keeps all records behind one `Arc<Mutex<_>>`. Clones share
//! the same state, so a test can hand one clone to a service and inspect the
//! other.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use hdp_contracts::{
    error::{HdpError, HdpResult},
    ids::{DoctorId, PatientId, VitalsId},
    prediction::RiskPrediction,
    profile::{DoctorNote, UserProfile},
    vitals::VitalsRecord,
};

use crate::repository::{
    NoteRepository, PredictionRepository, ProfileRepository, SubmissionRepository,
    VitalsRepository,
};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
struct StoreState {
    /// In insertion order.
    vitals: Vec<VitalsRecord>,
    predictions: Vec<RiskPrediction>,
    profiles: BTreeMap<String, UserProfile>,
    notes: Vec<DoctorNote>,
}

// ── Public store ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> HdpResult<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|e| HdpError::Storage {
            reason: format!("store lock poisoned: {}", e),
        })
    }
}

// ── Repository impls ──────────────────────────────────────────────────────────

impl VitalsRepository for InMemoryStore {
    fn insert_vitals(&self, record: VitalsRecord) -> HdpResult<()> {
        let mut state = self.lock()?;
        debug!(vitals_id = %record.id, patient_id = %record.patient_id, "storing vitals");
        state.vitals.push(record);
        Ok(())
    }

    fn get_vitals(&self, id: &VitalsId) -> HdpResult<VitalsRecord> {
        let state = self.lock()?;
        state
            .vitals
            .iter()
            .find(|record| &record.id == id)
            .cloned()
            .ok_or_else(|| HdpError::NotFound {
                entity: "vitals",
                id: id.to_string(),
            })
    }

    fn vitals_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<VitalsRecord>> {
        let state = self.lock()?;
        let mut records: Vec<VitalsRecord> = state
            .vitals
            .iter()
            .filter(|record| &record.patient_id == patient_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.recorded_at);
        Ok(records)
    }
}

impl PredictionRepository for InMemoryStore {
    fn insert_prediction(&self, prediction: RiskPrediction) -> HdpResult<()> {
        let mut state = self.lock()?;
        if state
            .predictions
            .iter()
            .any(|existing| existing.vitals_id == prediction.vitals_id)
        {
            return Err(HdpError::DuplicatePrediction {
                vitals_id: prediction.vitals_id.to_string(),
            });
        }
        debug!(
            prediction_id = %prediction.id,
            vitals_id = %prediction.vitals_id,
            "storing prediction"
        );
        state.predictions.push(prediction);
        Ok(())
    }

    fn prediction_for_vitals(&self, vitals_id: &VitalsId) -> HdpResult<Option<RiskPrediction>> {
        let state = self.lock()?;
        Ok(state
            .predictions
            .iter()
            .find(|prediction| &prediction.vitals_id == vitals_id)
            .cloned())
    }

    fn predictions_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<RiskPrediction>> {
        let state = self.lock()?;
        let mut predictions: Vec<RiskPrediction> = state
            .predictions
            .iter()
            .filter(|prediction| &prediction.patient_id == patient_id)
            .cloned()
            .collect();
        predictions.sort_by_key(|prediction| prediction.created_at);
        Ok(predictions)
    }
}

impl SubmissionRepository for InMemoryStore {
    fn insert_submission(&self, record: VitalsRecord, prediction: RiskPrediction) -> HdpResult<()> {
        if prediction.vitals_id != record.id {
            return Err(HdpError::Storage {
                reason: format!(
                    "prediction for vitals {} submitted with record {}",
                    prediction.vitals_id, record.id
                ),
            });
        }

        let mut state = self.lock()?;
        let taken = state.vitals.iter().any(|existing| existing.id == record.id)
            || state
                .predictions
                .iter()
                .any(|existing| existing.vitals_id == record.id);
        if taken {
            return Err(HdpError::DuplicatePrediction {
                vitals_id: record.id.to_string(),
            });
        }

        debug!(
            vitals_id = %record.id,
            prediction_id = %prediction.id,
            patient_id = %record.patient_id,
            "storing scored submission"
        );
        state.vitals.push(record);
        state.predictions.push(prediction);
        Ok(())
    }
}

impl ProfileRepository for InMemoryStore {
    fn upsert_profile(&self, profile: UserProfile) -> HdpResult<()> {
        let mut state = self.lock()?;
        state.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn get_profile(&self, id: &str) -> HdpResult<UserProfile> {
        let state = self.lock()?;
        state.profiles.get(id).cloned().ok_or_else(|| HdpError::NotFound {
            entity: "profile",
            id: id.to_string(),
        })
    }

    fn patients_of(&self, doctor_id: &DoctorId) -> HdpResult<Vec<UserProfile>> {
        let state = self.lock()?;
        Ok(state
            .profiles
            .values()
            .filter(|profile| {
                profile
                    .patient_fields()
                    .and_then(|fields| fields.assigned_doctor.as_ref())
                    == Some(doctor_id)
            })
            .cloned()
            .collect())
    }
}

impl NoteRepository for InMemoryStore {
    fn insert_note(&self, note: DoctorNote) -> HdpResult<()> {
        let mut state = self.lock()?;
        state.notes.push(note);
        Ok(())
    }

    fn notes_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<DoctorNote>> {
        let state = self.lock()?;
        // Reversed first so equal timestamps still come out newest first.
        let mut notes: Vec<DoctorNote> = state
            .notes
            .iter()
            .rev()
            .filter(|note| &note.patient_id == patient_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }
}
