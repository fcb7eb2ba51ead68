//! `MonitoringService`: the application operations around the evaluator.
//!
//! The service owns no data. Profiles, vitals, predictions, and notes live in
//! the injected `ClinicStore`; scoring is delegated to a shared
//! `RiskEvaluator`. Every submitted vitals record gets exactly one
//! prediction.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use hdp_config::HdpConfig;
use hdp_contracts::{
    cancel::CancelToken,
    error::{HdpError, HdpResult},
    ids::{DoctorId, NoteId, PatientId, VitalsId},
    prediction::RiskPrediction,
    profile::{DoctorNote, ProfileUpdate, UserProfile, UserRole},
    vitals::{VitalsRecord, VitalsSnapshot},
};
use hdp_core::{ClinicalModel, RiskEvaluator, RiskModel};
use hdp_remote::RemoteModel;
use hdp_store::ClinicStore;

// ── Evaluator wiring ──────────────────────────────────────────────────────────

/// Build the evaluation chain described by `config`.
///
/// The remote step is included only when `remote.enabled` is set. Building
/// the client never contacts the service.
pub fn build_evaluator(config: &HdpConfig) -> HdpResult<RiskEvaluator> {
    let remote: Option<Box<dyn RiskModel>> = if config.remote.enabled {
        let model = RemoteModel::from_config(&config.remote)?;
        if config.remote.is_default_endpoint() {
            warn!(
                url = model.url(),
                "remote scoring uses the default endpoint; set HDP_API_BASE_URL to point at a real service"
            );
        }
        Some(Box::new(model))
    } else {
        None
    };

    info!(
        remote_enabled = remote.is_some(),
        default_patient_age = config.evaluation.default_patient_age,
        "risk evaluator configured"
    );

    Ok(RiskEvaluator::new(
        remote,
        Box::new(ClinicalModel::new()),
        config.evaluation.default_patient_age,
    ))
}

// ── Read models ───────────────────────────────────────────────────────────────

/// One vitals record with the prediction computed from it.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub vitals: VitalsRecord,
    /// `None` only if storage lost the prediction.
    pub prediction: Option<RiskPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// Per-measurement series for charting, oldest point first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendData {
    pub systolic_bp: Vec<ChartPoint>,
    pub diastolic_bp: Vec<ChartPoint>,
    pub heart_rate: Vec<ChartPoint>,
    pub weight_kg: Vec<ChartPoint>,
}

impl TrendData {
    pub fn len(&self) -> usize {
        self.systolic_bp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systolic_bp.is_empty()
    }
}

/// A row of the clinician overview.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub profile: UserProfile,
    pub latest_prediction: Option<RiskPrediction>,
    pub reading_count: usize,
}

impl PatientSummary {
    fn latest_score(&self) -> Option<f64> {
        self.latest_prediction.as_ref().map(|p| p.risk_score)
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

pub struct MonitoringService {
    store: Arc<dyn ClinicStore>,
    evaluator: Arc<RiskEvaluator>,
}

impl MonitoringService {
    pub fn new(store: Arc<dyn ClinicStore>, evaluator: Arc<RiskEvaluator>) -> Self {
        Self { store, evaluator }
    }

    pub fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    /// Store a new profile.
    ///
    /// Fails with `InvalidProfile` if the profile is invalid or the id is
    /// taken. A patient's assigned doctor must already be registered.
    pub fn register_profile(&self, profile: UserProfile) -> HdpResult<()> {
        profile.validate()?;

        match self.store.get_profile(&profile.id) {
            Ok(_) => {
                return Err(HdpError::InvalidProfile {
                    reason: format!("profile '{}' is already registered", profile.id),
                });
            }
            Err(HdpError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.check_assignment(&profile)?;

        info!(profile_id = %profile.id, role = profile.role().as_str(), "profile registered");
        self.store.upsert_profile(profile)
    }

    /// Apply a role-tagged update and return the stored result.
    pub fn update_profile(&self, id: &str, update: ProfileUpdate) -> HdpResult<UserProfile> {
        let mut profile = self.store.get_profile(id)?;
        profile.apply_update(update)?;
        self.check_assignment(&profile)?;
        self.store.upsert_profile(profile.clone())?;

        info!(profile_id = %id, "profile updated");
        Ok(profile)
    }

    /// Record a snapshot for a patient, score it, and store the prediction.
    ///
    /// The record and its prediction are written in one store operation;
    /// if that fails neither is kept.
    ///
    /// A snapshot without an age takes the age from the patient's profile.
    pub fn submit_vitals(
        &self,
        patient_id: &PatientId,
        snapshot: VitalsSnapshot,
        notes: Option<String>,
    ) -> HdpResult<(VitalsRecord, RiskPrediction)> {
        self.submit_vitals_with_cancel(patient_id, snapshot, notes, &CancelToken::new())
    }

    /// `submit_vitals` with a cancel token for the remote step.
    pub fn submit_vitals_with_cancel(
        &self,
        patient_id: &PatientId,
        mut snapshot: VitalsSnapshot,
        notes: Option<String>,
        cancel: &CancelToken,
    ) -> HdpResult<(VitalsRecord, RiskPrediction)> {
        let profile = self.require_role(&patient_id.0, UserRole::Patient)?;

        if snapshot.age.is_none() {
            snapshot.age = profile.patient_fields().and_then(|fields| fields.age);
        }

        let record = VitalsRecord {
            id: VitalsId::new(),
            patient_id: patient_id.clone(),
            recorded_at: Utc::now(),
            notes,
            snapshot,
        };
        let prediction =
            self.evaluator
                .evaluate_with_cancel(patient_id, &record.id, &record.snapshot, cancel);
        self.store
            .insert_submission(record.clone(), prediction.clone())?;

        info!(
            patient_id = %patient_id,
            vitals_id = %record.id,
            risk_level = %prediction.risk_level,
            "vitals submitted"
        );

        Ok((record, prediction))
    }

    /// Every vitals record of a patient with its prediction, oldest first.
    pub fn patient_history(&self, patient_id: &PatientId) -> HdpResult<Vec<HistoryEntry>> {
        self.require_role(&patient_id.0, UserRole::Patient)?;

        self.store
            .vitals_for_patient(patient_id)?
            .into_iter()
            .map(|vitals| {
                let prediction = self.store.prediction_for_vitals(&vitals.id)?;
                Ok(HistoryEntry { vitals, prediction })
            })
            .collect()
    }

    pub fn vitals_trend(&self, patient_id: &PatientId) -> HdpResult<TrendData> {
        self.require_role(&patient_id.0, UserRole::Patient)?;

        let mut trend = TrendData::default();
        for record in self.store.vitals_for_patient(patient_id)? {
            let at = record.recorded_at;
            let point = |value: f64| ChartPoint { recorded_at: at, value };
            trend.systolic_bp.push(point(f64::from(record.snapshot.systolic_bp)));
            trend.diastolic_bp.push(point(f64::from(record.snapshot.diastolic_bp)));
            trend.heart_rate.push(point(f64::from(record.snapshot.heart_rate)));
            trend.weight_kg.push(point(record.snapshot.weight_kg));
        }
        Ok(trend)
    }

    /// A doctor's assigned patients, highest latest risk first.
    ///
    /// Patients with no readings come last. Ties keep id order.
    pub fn clinician_overview(&self, doctor_id: &DoctorId) -> HdpResult<Vec<PatientSummary>> {
        self.require_role(&doctor_id.0, UserRole::Doctor)?;

        let mut rows = self
            .store
            .patients_of(doctor_id)?
            .into_iter()
            .map(|profile| {
                let patient_id = PatientId::new(profile.id.clone());
                let predictions = self.store.predictions_for_patient(&patient_id)?;
                Ok(PatientSummary {
                    reading_count: predictions.len(),
                    latest_prediction: predictions.into_iter().last(),
                    profile,
                })
            })
            .collect::<HdpResult<Vec<_>>>()?;

        rows.sort_by(|a, b| match (a.latest_score(), b.latest_score()) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        Ok(rows)
    }

    /// Attach a note to a patient. The doctor must be the assigned one.
    pub fn add_note(
        &self,
        doctor_id: &DoctorId,
        patient_id: &PatientId,
        note: impl Into<String>,
    ) -> HdpResult<DoctorNote> {
        let note = note.into();
        if note.trim().is_empty() {
            return Err(HdpError::InvalidNote {
                reason: "note text must not be empty".to_string(),
            });
        }

        self.require_role(&doctor_id.0, UserRole::Doctor)?;
        let patient = self.require_role(&patient_id.0, UserRole::Patient)?;

        let assigned = patient
            .patient_fields()
            .and_then(|fields| fields.assigned_doctor.as_ref());
        if assigned != Some(doctor_id) {
            return Err(HdpError::NotAssigned {
                doctor_id: doctor_id.to_string(),
                patient_id: patient_id.to_string(),
            });
        }

        let note = DoctorNote {
            id: NoteId::new(),
            doctor_id: doctor_id.clone(),
            patient_id: patient_id.clone(),
            note,
            created_at: Utc::now(),
        };
        self.store.insert_note(note.clone())?;

        info!(note_id = %note.id, doctor_id = %doctor_id, patient_id = %patient_id, "note added");
        Ok(note)
    }

    /// Notes about a patient, newest first.
    pub fn notes_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<DoctorNote>> {
        self.require_role(&patient_id.0, UserRole::Patient)?;
        self.store.notes_for_patient(patient_id)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_role(&self, id: &str, role: UserRole) -> HdpResult<UserProfile> {
        let profile = self.store.get_profile(id)?;
        if profile.role() != role {
            return Err(HdpError::RoleMismatch {
                id: id.to_string(),
                expected: role.as_str().to_string(),
                actual: profile.role().as_str().to_string(),
            });
        }
        Ok(profile)
    }

    /// A patient's assigned doctor, if any, must be a registered doctor.
    fn check_assignment(&self, profile: &UserProfile) -> HdpResult<()> {
        match profile.patient_fields().and_then(|f| f.assigned_doctor.as_ref()) {
            Some(doctor_id) => self.require_role(&doctor_id.0, UserRole::Doctor).map(|_| ()),
            None => Ok(()),
        }
    }
}
