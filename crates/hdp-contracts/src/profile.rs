//! User profile, profile update, and clinician note types.
//!
//! Role-specific data is carried in a tagged enum rather than a bag of
//! optional fields, so a patient update can never land on a doctor profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{HdpError, HdpResult},
    ids::{DoctorId, NoteId, PatientId},
};

/// The two account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Patient,
    Doctor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Doctor => "doctor",
        }
    }
}

/// Fields only a patient profile carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientFields {
    /// Age in years, fed to the risk evaluator. Unknown ages use the
    /// evaluator's default.
    pub age: Option<u32>,
    pub last_period_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub assigned_doctor: Option<DoctorId>,
}

/// Fields only a doctor profile carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorFields {
    pub license_number: String,
    pub specialization: Option<String>,
}

/// Role plus its role-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    Patient(PatientFields),
    Doctor(DoctorFields),
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: RoleProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new_patient(
        id: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        fields: PatientFields,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            full_name: full_name.into(),
            role: RoleProfile::Patient(fields),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_doctor(
        id: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        fields: DoctorFields,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            full_name: full_name.into(),
            role: RoleProfile::Doctor(fields),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role(&self) -> UserRole {
        match self.role {
            RoleProfile::Patient(_) => UserRole::Patient,
            RoleProfile::Doctor(_) => UserRole::Doctor,
        }
    }

    pub fn patient_fields(&self) -> Option<&PatientFields> {
        match &self.role {
            RoleProfile::Patient(fields) => Some(fields),
            RoleProfile::Doctor(_) => None,
        }
    }

    pub fn doctor_fields(&self) -> Option<&DoctorFields> {
        match &self.role {
            RoleProfile::Doctor(fields) => Some(fields),
            RoleProfile::Patient(_) => None,
        }
    }

    /// Check the invariants every stored profile must satisfy.
    pub fn validate(&self) -> HdpResult<()> {
        if self.full_name.trim().is_empty() {
            return Err(HdpError::InvalidProfile {
                reason: "full name must not be empty".to_string(),
            });
        }
        match &self.role {
            RoleProfile::Patient(fields) => {
                if let (Some(lmp), Some(due)) = (fields.last_period_date, fields.due_date) {
                    if due <= lmp {
                        return Err(HdpError::InvalidProfile {
                            reason: format!(
                                "due date {due} must be after last period date {lmp}"
                            ),
                        });
                    }
                }
            }
            RoleProfile::Doctor(fields) => {
                if fields.license_number.trim().is_empty() {
                    return Err(HdpError::InvalidProfile {
                        reason: "license number must not be empty".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply `update` atomically: either every change lands and the result
    /// validates, or the profile is left untouched.
    pub fn apply_update(&mut self, update: ProfileUpdate) -> HdpResult<()> {
        let mut next = self.clone();

        if let Some(name) = update.full_name {
            next.full_name = name;
        }

        match (update.role, &mut next.role) {
            (None, _) => {}
            (Some(RoleUpdate::Patient(changes)), RoleProfile::Patient(fields)) => {
                if let Some(age) = changes.age {
                    fields.age = Some(age);
                }
                if let Some(date) = changes.last_period_date {
                    fields.last_period_date = Some(date);
                }
                if let Some(date) = changes.due_date {
                    fields.due_date = Some(date);
                }
                if let Some(doctor) = changes.assigned_doctor {
                    fields.assigned_doctor = Some(doctor);
                }
            }
            (Some(RoleUpdate::Doctor(changes)), RoleProfile::Doctor(fields)) => {
                if let Some(license) = changes.license_number {
                    fields.license_number = license;
                }
                if let Some(specialization) = changes.specialization {
                    fields.specialization = Some(specialization);
                }
            }
            (Some(update_role), _) => {
                return Err(HdpError::RoleMismatch {
                    id: self.id.clone(),
                    expected: update_role.role().as_str().to_string(),
                    actual: self.role().as_str().to_string(),
                });
            }
        }

        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

/// Changes to patient-only fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientFieldsUpdate {
    pub age: Option<u32>,
    pub last_period_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub assigned_doctor: Option<DoctorId>,
}

/// Changes to doctor-only fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorFieldsUpdate {
    pub license_number: Option<String>,
    pub specialization: Option<String>,
}

/// Role-tagged field changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleUpdate {
    Patient(PatientFieldsUpdate),
    Doctor(DoctorFieldsUpdate),
}

impl RoleUpdate {
    pub fn role(&self) -> UserRole {
        match self {
            RoleUpdate::Patient(_) => UserRole::Patient,
            RoleUpdate::Doctor(_) => UserRole::Doctor,
        }
    }
}

/// A profile update request, validated when applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub role: Option<RoleUpdate>,
}

/// A clinician's note on a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorNote {
    pub id: NoteId,
    pub doctor_id: DoctorId,
    pub patient_id: PatientId,
    pub note: String,
    pub created_at: DateTime<Utc>,
}
