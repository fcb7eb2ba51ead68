//! Fictional clinic data for the demo scenarios.
//!
//! Every name, id, and reading here is made up.

use chrono::NaiveDate;

use hdp_contracts::{
    ids::DoctorId,
    profile::{DoctorFields, PatientFields, UserProfile},
    vitals::{Symptom, VitalsSnapshot},
};

pub const DOCTOR_ID: &str = "dr-okafor";
pub const SECOND_DOCTOR_ID: &str = "dr-lindqvist";

pub const ROUTINE_PATIENT_ID: &str = "pt-amara";
pub const WATCH_PATIENT_ID: &str = "pt-beatriz";
pub const FIRST_TIME_PATIENT_ID: &str = "pt-chen";

// ── Profiles ──────────────────────────────────────────────────────────────────

pub fn doctor() -> UserProfile {
    UserProfile::new_doctor(
        DOCTOR_ID,
        "n.okafor@clinic.example",
        "Dr. Nneka Okafor",
        DoctorFields {
            license_number: "OB-20417".to_string(),
            specialization: Some("Maternal-fetal medicine".to_string()),
        },
    )
}

pub fn second_doctor() -> UserProfile {
    UserProfile::new_doctor(
        SECOND_DOCTOR_ID,
        "e.lindqvist@clinic.example",
        "Dr. Elin Lindqvist",
        DoctorFields {
            license_number: "OB-31822".to_string(),
            specialization: None,
        },
    )
}

fn patient(id: &str, name: &str, age: u32, lmp: (i32, u32, u32), due: (i32, u32, u32)) -> UserProfile {
    UserProfile::new_patient(
        id,
        format!("{id}@mail.example"),
        name,
        PatientFields {
            age: Some(age),
            last_period_date: NaiveDate::from_ymd_opt(lmp.0, lmp.1, lmp.2),
            due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2),
            assigned_doctor: Some(DoctorId::new(DOCTOR_ID)),
        },
    )
}

/// 28 years old, uncomplicated pregnancy.
pub fn routine_patient() -> UserProfile {
    patient(ROUTINE_PATIENT_ID, "Amara Nwosu", 28, (2026, 2, 10), (2026, 11, 17))
}

/// 37 years old, blood pressure climbing through the third trimester.
pub fn watch_patient() -> UserProfile {
    patient(WATCH_PATIENT_ID, "Beatriz Souza", 37, (2026, 1, 5), (2026, 10, 12))
}

/// No readings submitted yet.
pub fn first_time_patient() -> UserProfile {
    patient(FIRST_TIME_PATIENT_ID, "Mei Chen", 24, (2026, 4, 1), (2027, 1, 6))
}

// ── Readings ──────────────────────────────────────────────────────────────────

/// A normal check-in: 120/80, 70 bpm, 60 kg.
pub fn routine_reading() -> VitalsSnapshot {
    VitalsSnapshot::new(120, 80, 70, 60.0).with_medication_taken(true)
}

/// Weekly readings for the watch patient, worsening each week.
pub fn escalating_readings() -> Vec<(VitalsSnapshot, &'static str)> {
    vec![
        (
            VitalsSnapshot::new(128, 82, 84, 72.0).with_medication_taken(true),
            "week 30: feeling fine",
        ),
        (
            VitalsSnapshot::new(134, 86, 88, 73.0).with_medication_taken(true),
            "week 31: a little tired",
        ),
        (
            VitalsSnapshot::new(144, 94, 92, 75.0).with_symptom(Symptom::Swelling),
            "week 32: ankles swollen",
        ),
        (
            VitalsSnapshot::new(168, 110, 106, 76.0).with_symptoms([
                Symptom::Headache,
                Symptom::Swelling,
                Symptom::BlurredVision,
            ]),
            "week 33: vision blurry since this morning",
        ),
    ]
}

/// Stage-2 hypertension with headache; used to compare remote and local paths.
pub fn outage_reading() -> VitalsSnapshot {
    VitalsSnapshot::new(150, 95, 95, 70.0)
        .with_age(30)
        .with_symptom(Symptom::Headache)
}
