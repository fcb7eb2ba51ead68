//! Repository traits the monitoring service is written against.
//!
//! Each trait covers one kind of record, except `SubmissionRepository`,
//! which writes a vitals record and its prediction together. `ClinicStore`
//! bundles them all so a service can hold a single `Arc<dyn ClinicStore>`.

use hdp_contracts::{
    error::HdpResult,
    ids::{DoctorId, PatientId, VitalsId},
    prediction::RiskPrediction,
    profile::{DoctorNote, UserProfile},
    vitals::VitalsRecord,
};

/// Storage for submitted vitals.
pub trait VitalsRepository: Send + Sync {
    fn insert_vitals(&self, record: VitalsRecord) -> HdpResult<()>;

    /// Returns `HdpError::NotFound` when no record has this id.
    fn get_vitals(&self, id: &VitalsId) -> HdpResult<VitalsRecord>;

    /// All of a patient's records, oldest first.
    fn vitals_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<VitalsRecord>>;
}

/// Storage for risk predictions. At most one prediction per vitals record.
pub trait PredictionRepository: Send + Sync {
    /// Returns `HdpError::DuplicatePrediction` if the vitals record already
    /// has a prediction.
    fn insert_prediction(&self, prediction: RiskPrediction) -> HdpResult<()>;

    fn prediction_for_vitals(&self, vitals_id: &VitalsId) -> HdpResult<Option<RiskPrediction>>;

    /// All of a patient's predictions, oldest first.
    fn predictions_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<RiskPrediction>>;
}

/// Atomic storage of a scored submission.
pub trait SubmissionRepository: Send + Sync {
    /// Store `record` and `prediction` together, or neither.
    ///
    /// Returns `HdpError::DuplicatePrediction` if the record id is already
    /// stored or already has a prediction, and `HdpError::Storage` if the
    /// prediction belongs to a different record.
    fn insert_submission(&self, record: VitalsRecord, prediction: RiskPrediction) -> HdpResult<()>;
}

/// Storage for user profiles, keyed by `UserProfile::id`.
pub trait ProfileRepository: Send + Sync {
    /// Insert or replace.
    fn upsert_profile(&self, profile: UserProfile) -> HdpResult<()>;

    fn get_profile(&self, id: &str) -> HdpResult<UserProfile>;

    /// Patient profiles whose `assigned_doctor` is `doctor_id`, ordered by id.
    fn patients_of(&self, doctor_id: &DoctorId) -> HdpResult<Vec<UserProfile>>;
}

/// Storage for clinician notes.
pub trait NoteRepository: Send + Sync {
    fn insert_note(&self, note: DoctorNote) -> HdpResult<()>;

    /// Notes about a patient, newest first.
    fn notes_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<DoctorNote>>;
}

/// Everything the monitoring service needs from storage.
pub trait ClinicStore:
    VitalsRepository
    + PredictionRepository
    + SubmissionRepository
    + ProfileRepository
    + NoteRepository
{
}

impl<T> ClinicStore for T where
    T: VitalsRepository
        + PredictionRepository
        + SubmissionRepository
        + ProfileRepository
        + NoteRepository
{
}
