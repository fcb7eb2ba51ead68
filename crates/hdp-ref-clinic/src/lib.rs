//! # hdp-ref-clinic
//!
//! Reference monitoring application built on the HDP risk evaluator.
//!
//! [`service::MonitoringService`] is the application layer: patients submit
//! vitals, each submission is scored and stored, and clinicians review
//! their assigned patients. Storage is injected as an
//! `Arc<dyn hdp_store::ClinicStore>`; scoring is a shared
//! `hdp_core::RiskEvaluator` built by [`service::build_evaluator`].
//!
//! Four demo scenarios run against fictional data:
//!
//! 1. **Routine check-in**: a normal reading scores low.
//! 2. **Pre-eclampsia watch**: escalating readings move from low to high.
//! 3. **Remote outage**: the scoring service is down and the clinical model
//!    answers instead.
//! 4. **Clinician review**: risk-sorted overview, notes, profile updates.

pub mod mock_data;
pub mod scenarios;
pub mod service;

pub use service::{build_evaluator, HistoryEntry, MonitoringService, PatientSummary, TrendData};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hdp_config::HdpConfig;
    use hdp_contracts::{
        error::{HdpError, HdpResult},
        ids::{DoctorId, PatientId, VitalsId},
        prediction::{PredictionSource, RiskLevel, RiskPrediction},
        profile::{DoctorNote, UserProfile},
        vitals::{Symptom, VitalsRecord, VitalsSnapshot},
    };
    use hdp_core::RiskEvaluator;
    use hdp_store::{
        InMemoryStore, NoteRepository, PredictionRepository, ProfileRepository,
        SubmissionRepository, VitalsRepository,
    };

    use crate::{build_evaluator, mock_data, MonitoringService};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn clinic() -> (MonitoringService, InMemoryStore) {
        let store = InMemoryStore::new();
        let service = MonitoringService::new(
            Arc::new(store.clone()),
            Arc::new(RiskEvaluator::local_only()),
        );
        service.register_profile(mock_data::doctor()).unwrap();
        service.register_profile(mock_data::routine_patient()).unwrap();
        (service, store)
    }

    /// Delegates to an `InMemoryStore` but refuses every submission.
    #[derive(Clone, Default)]
    struct RefusingStore {
        inner: InMemoryStore,
    }

    impl VitalsRepository for RefusingStore {
        fn insert_vitals(&self, record: VitalsRecord) -> HdpResult<()> {
            self.inner.insert_vitals(record)
        }
        fn get_vitals(&self, id: &VitalsId) -> HdpResult<VitalsRecord> {
            self.inner.get_vitals(id)
        }
        fn vitals_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<VitalsRecord>> {
            self.inner.vitals_for_patient(patient_id)
        }
    }

    impl PredictionRepository for RefusingStore {
        fn insert_prediction(&self, prediction: RiskPrediction) -> HdpResult<()> {
            self.inner.insert_prediction(prediction)
        }
        fn prediction_for_vitals(&self, vitals_id: &VitalsId) -> HdpResult<Option<RiskPrediction>> {
            self.inner.prediction_for_vitals(vitals_id)
        }
        fn predictions_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<RiskPrediction>> {
            self.inner.predictions_for_patient(patient_id)
        }
    }

    impl SubmissionRepository for RefusingStore {
        fn insert_submission(&self, _: VitalsRecord, _: RiskPrediction) -> HdpResult<()> {
            Err(HdpError::Storage {
                reason: "disk full".to_string(),
            })
        }
    }

    impl ProfileRepository for RefusingStore {
        fn upsert_profile(&self, profile: UserProfile) -> HdpResult<()> {
            self.inner.upsert_profile(profile)
        }
        fn get_profile(&self, id: &str) -> HdpResult<UserProfile> {
            self.inner.get_profile(id)
        }
        fn patients_of(&self, doctor_id: &DoctorId) -> HdpResult<Vec<UserProfile>> {
            self.inner.patients_of(doctor_id)
        }
    }

    impl NoteRepository for RefusingStore {
        fn insert_note(&self, note: DoctorNote) -> HdpResult<()> {
            self.inner.insert_note(note)
        }
        fn notes_for_patient(&self, patient_id: &PatientId) -> HdpResult<Vec<DoctorNote>> {
            self.inner.notes_for_patient(patient_id)
        }
    }

    fn routine_id() -> PatientId {
        PatientId::new(mock_data::ROUTINE_PATIENT_ID)
    }

    // ── build_evaluator ───────────────────────────────────────────────────────

    #[test]
    fn test_disabled_remote_builds_local_evaluator() {
        let mut config = HdpConfig::default();
        config.remote.enabled = false;
        config.evaluation.default_patient_age = 33;

        let evaluator = build_evaluator(&config).unwrap();

        assert!(!evaluator.has_remote());
        assert_eq!(evaluator.default_patient_age(), 33);
    }

    #[test]
    fn test_enabled_remote_is_wired_in() {
        let evaluator = build_evaluator(&HdpConfig::default()).unwrap();
        assert!(evaluator.has_remote());
    }

    // ── submit_vitals ─────────────────────────────────────────────────────────

    /// The record and its prediction are both stored, linked by vitals id.
    #[test]
    fn test_submission_stores_record_and_prediction() {
        let (service, store) = clinic();

        let (record, prediction) = service
            .submit_vitals(&routine_id(), mock_data::routine_reading(), None)
            .unwrap();

        assert_eq!(prediction.vitals_id, record.id);
        assert_eq!(prediction.patient_id, routine_id());
        assert_eq!(store.get_vitals(&record.id).unwrap(), record);
        assert_eq!(
            store.prediction_for_vitals(&record.id).unwrap(),
            Some(prediction)
        );
    }

    #[test]
    fn test_failed_write_leaves_no_record_without_prediction() {
        let store = RefusingStore::default();
        let service = MonitoringService::new(
            Arc::new(store.clone()),
            Arc::new(RiskEvaluator::local_only()),
        );
        service.register_profile(mock_data::doctor()).unwrap();
        service.register_profile(mock_data::routine_patient()).unwrap();

        let result = service.submit_vitals(&routine_id(), mock_data::routine_reading(), None);

        assert!(matches!(result, Err(HdpError::Storage { .. })));
        assert!(store.inner.vitals_for_patient(&routine_id()).unwrap().is_empty());
        assert!(service.patient_history(&routine_id()).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_age_overrides_profile_age() {
        let (service, _) = clinic();
        let snapshot = VitalsSnapshot::new(110, 70, 70, 60.0).with_age(41);

        let (record, prediction) = service.submit_vitals(&routine_id(), snapshot, None).unwrap();

        assert_eq!(record.snapshot.age, Some(41));
        assert_eq!(prediction.factors, vec!["Advanced maternal age (≥40 years)"]);
    }

    #[test]
    fn test_profile_age_fills_missing_snapshot_age() {
        let (service, _) = clinic();

        let (record, _) = service
            .submit_vitals(&routine_id(), VitalsSnapshot::new(110, 70, 70, 60.0), None)
            .unwrap();

        assert_eq!(record.snapshot.age, Some(28));
    }

    #[test]
    fn test_unknown_patient_is_not_found() {
        let (service, _) = clinic();

        let result = service.submit_vitals(
            &PatientId::new("pt-unknown"),
            mock_data::routine_reading(),
            None,
        );
        assert!(matches!(result, Err(HdpError::NotFound { .. })));
    }

    // ── history ───────────────────────────────────────────────────────────────

    #[test]
    fn test_history_pairs_each_record_with_its_prediction() {
        let (service, _) = clinic();
        service
            .submit_vitals(&routine_id(), mock_data::routine_reading(), None)
            .unwrap();
        service
            .submit_vitals(
                &routine_id(),
                VitalsSnapshot::new(165, 105, 88, 62.0).with_symptom(Symptom::Headache),
                Some("headache since noon".to_string()),
            )
            .unwrap();

        let history = service.patient_history(&routine_id()).unwrap();

        assert_eq!(history.len(), 2);
        for entry in &history {
            let prediction = entry.prediction.as_ref().unwrap();
            assert_eq!(prediction.vitals_id, entry.vitals.id);
            assert_eq!(prediction.source, PredictionSource::Clinical);
        }
        assert_eq!(history[0].prediction.as_ref().unwrap().risk_level, RiskLevel::Low);
        assert_eq!(history[1].prediction.as_ref().unwrap().risk_level, RiskLevel::High);
        assert_eq!(history[1].vitals.notes.as_deref(), Some("headache since noon"));
    }

    #[test]
    fn test_empty_history_and_trend() {
        let (service, _) = clinic();

        assert!(service.patient_history(&routine_id()).unwrap().is_empty());
        assert!(service.vitals_trend(&routine_id()).unwrap().is_empty());
        assert!(service.notes_for_patient(&routine_id()).unwrap().is_empty());
    }

    // ── concurrency ───────────────────────────────────────────────────────────

    #[test]
    fn test_concurrent_submissions_each_get_one_prediction() {
        let (service, store) = clinic();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    service
                        .submit_vitals(&routine_id(), VitalsSnapshot::new(115 + i * 5, 78, 72, 61.0), None)
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.vitals_for_patient(&routine_id()).unwrap().len(), 8);
        assert_eq!(store.predictions_for_patient(&routine_id()).unwrap().len(), 8);
    }
}
