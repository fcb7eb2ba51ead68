//! Scenario 4: Clinician review
//!
//! Dr. Okafor has three assigned patients. The overview lists them highest
//! risk first, with the patient who has not submitted anything at the end.
//! The doctor leaves a note on the riskiest patient. A second doctor who is
//! not assigned is refused. Finally the patient's profile is reassigned and
//! an update with the wrong role is rejected.

use hdp_contracts::{
    error::{HdpError, HdpResult},
    ids::{DoctorId, PatientId},
    profile::{DoctorFieldsUpdate, PatientFieldsUpdate, ProfileUpdate, RoleUpdate},
};

use crate::{
    mock_data,
    scenarios::{local_clinic, preeclampsia_watch},
    service::{MonitoringService, PatientSummary},
};

/// Populate the clinic used by the review. Registers both doctors and
/// all three patients.
pub fn seed(service: &MonitoringService) -> HdpResult<()> {
    preeclampsia_watch::watch(service)?;
    service.register_profile(mock_data::routine_patient())?;
    service.submit_vitals(
        &PatientId::new(mock_data::ROUTINE_PATIENT_ID),
        mock_data::routine_reading(),
        None,
    )?;
    service.register_profile(mock_data::first_time_patient())?;
    service.register_profile(mock_data::second_doctor())?;
    Ok(())
}

fn print_overview(rows: &[PatientSummary]) {
    for row in rows {
        match &row.latest_prediction {
            Some(prediction) => println!(
                "    {:<16} {:<9} {:.2}  ({} readings)",
                row.profile.full_name,
                prediction.risk_level.as_str().to_uppercase(),
                prediction.risk_score,
                row.reading_count
            ),
            None => println!("    {:<16} no readings yet", row.profile.full_name),
        }
    }
}

pub fn run_scenario() -> HdpResult<()> {
    println!("=== Scenario 4: Clinician Review ===");
    println!();

    let service = local_clinic();
    seed(&service)?;

    let doctor_id = DoctorId::new(mock_data::DOCTOR_ID);
    let watch_id = PatientId::new(mock_data::WATCH_PATIENT_ID);

    println!("  Overview for Dr. Nneka Okafor:");
    print_overview(&service.clinician_overview(&doctor_id)?);
    println!();

    service.add_note(
        &doctor_id,
        &watch_id,
        "Admit for monitoring; repeat BP in 4 hours and check urine protein.",
    )?;
    for note in service.notes_for_patient(&watch_id)? {
        println!("  Note by {}: {}", note.doctor_id, note.note);
    }

    let outsider = DoctorId::new(mock_data::SECOND_DOCTOR_ID);
    match service.add_note(&outsider, &watch_id, "Second opinion requested.") {
        Err(e @ HdpError::NotAssigned { .. }) => println!("  Unassigned doctor refused: {}", e),
        Err(e) => return Err(e),
        Ok(_) => println!("  Unassigned doctor was allowed to write a note (unexpected)"),
    }
    println!();

    let reassign = ProfileUpdate {
        role: Some(RoleUpdate::Patient(PatientFieldsUpdate {
            assigned_doctor: Some(outsider.clone()),
            ..PatientFieldsUpdate::default()
        })),
        ..ProfileUpdate::default()
    };
    let updated = service.update_profile(mock_data::FIRST_TIME_PATIENT_ID, reassign)?;
    println!("  {} reassigned to {}", updated.full_name, outsider);

    let wrong_role = ProfileUpdate {
        role: Some(RoleUpdate::Doctor(DoctorFieldsUpdate {
            license_number: Some("OB-00000".to_string()),
            ..DoctorFieldsUpdate::default()
        })),
        ..ProfileUpdate::default()
    };
    match service.update_profile(mock_data::ROUTINE_PATIENT_ID, wrong_role) {
        Err(e @ HdpError::RoleMismatch { .. }) => println!("  Doctor-only update refused: {}", e),
        Err(e) => return Err(e),
        Ok(_) => println!("  Doctor-only update applied to a patient (unexpected)"),
    }
    println!();

    println!("  Overview after reassignment:");
    print_overview(&service.clinician_overview(&doctor_id)?);
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use hdp_contracts::profile::{PatientFields, UserProfile};

    use super::*;

    fn seeded() -> MonitoringService {
        let service = local_clinic();
        seed(&service).unwrap();
        service
    }

    #[test]
    fn test_overview_is_sorted_by_latest_risk() {
        let service = seeded();

        let rows = service
            .clinician_overview(&DoctorId::new(mock_data::DOCTOR_ID))
            .unwrap();

        let ids: Vec<&str> = rows.iter().map(|row| row.profile.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                mock_data::WATCH_PATIENT_ID,
                mock_data::ROUTINE_PATIENT_ID,
                mock_data::FIRST_TIME_PATIENT_ID
            ]
        );
        assert_eq!(rows[0].reading_count, 4);
        assert_eq!(rows[0].latest_prediction.as_ref().map(|p| p.risk_score), Some(0.95));
        assert!(rows[2].latest_prediction.is_none());
    }

    #[test]
    fn test_overview_requires_a_doctor() {
        let service = seeded();

        let result = service.clinician_overview(&DoctorId::new(mock_data::WATCH_PATIENT_ID));
        assert!(matches!(result, Err(HdpError::RoleMismatch { .. })));
    }

    #[test]
    fn test_only_assigned_doctor_may_add_notes() {
        let service = seeded();
        let patient = PatientId::new(mock_data::WATCH_PATIENT_ID);

        service
            .add_note(&DoctorId::new(mock_data::DOCTOR_ID), &patient, "Recheck tomorrow.")
            .unwrap();
        let refused =
            service.add_note(&DoctorId::new(mock_data::SECOND_DOCTOR_ID), &patient, "Hello.");

        match refused {
            Err(HdpError::NotAssigned { doctor_id, patient_id }) => {
                assert_eq!(doctor_id, mock_data::SECOND_DOCTOR_ID);
                assert_eq!(patient_id, mock_data::WATCH_PATIENT_ID);
            }
            other => panic!("expected NotAssigned, got {:?}", other),
        }

        let notes = service.notes_for_patient(&patient).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note, "Recheck tomorrow.");
    }

    #[test]
    fn test_empty_note_is_rejected() {
        let service = seeded();

        let result = service.add_note(
            &DoctorId::new(mock_data::DOCTOR_ID),
            &PatientId::new(mock_data::WATCH_PATIENT_ID),
            "   ",
        );
        assert!(matches!(result, Err(HdpError::InvalidNote { .. })));
    }

    #[test]
    fn test_reassignment_moves_patient_between_overviews() {
        let service = seeded();
        let update = ProfileUpdate {
            role: Some(RoleUpdate::Patient(PatientFieldsUpdate {
                assigned_doctor: Some(DoctorId::new(mock_data::SECOND_DOCTOR_ID)),
                ..PatientFieldsUpdate::default()
            })),
            ..ProfileUpdate::default()
        };

        service
            .update_profile(mock_data::FIRST_TIME_PATIENT_ID, update)
            .unwrap();

        let first = service
            .clinician_overview(&DoctorId::new(mock_data::DOCTOR_ID))
            .unwrap();
        let second = service
            .clinician_overview(&DoctorId::new(mock_data::SECOND_DOCTOR_ID))
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].profile.id, mock_data::FIRST_TIME_PATIENT_ID);
    }

    #[test]
    fn test_assignment_to_unknown_doctor_is_rejected() {
        let service = seeded();
        let update = ProfileUpdate {
            role: Some(RoleUpdate::Patient(PatientFieldsUpdate {
                assigned_doctor: Some(DoctorId::new("dr-nobody")),
                ..PatientFieldsUpdate::default()
            })),
            ..ProfileUpdate::default()
        };

        let result = service.update_profile(mock_data::FIRST_TIME_PATIENT_ID, update);
        assert!(matches!(result, Err(HdpError::NotFound { .. })));

        let stored = service
            .clinician_overview(&DoctorId::new(mock_data::DOCTOR_ID))
            .unwrap();
        assert_eq!(stored.len(), 3, "failed update must not be stored");
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let service = seeded();
        let duplicate = UserProfile::new_patient(
            mock_data::ROUTINE_PATIENT_ID,
            "other@mail.example",
            "Someone Else",
            PatientFields::default(),
        );

        assert!(matches!(
            service.register_profile(duplicate),
            Err(HdpError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_vitals_for_a_doctor_are_rejected() {
        let service = seeded();

        let result = service.submit_vitals(
            &PatientId::new(mock_data::DOCTOR_ID),
            mock_data::routine_reading(),
            None,
        );
        assert!(matches!(result, Err(HdpError::RoleMismatch { .. })));
    }

    #[test]
    fn test_run_scenario_succeeds() {
        assert!(run_scenario().is_ok());
    }
}
