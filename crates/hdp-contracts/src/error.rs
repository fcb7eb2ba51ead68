//! Error types for the HDP risk monitor.
//!
//! All fallible operations return `HdpResult<T>`. The risk evaluator itself
//! never surfaces these to its caller: remote failures and clinical-model
//! failures are absorbed by the fallback chain. The application layer
//! (repositories, profile updates) does return them.

use thiserror::Error;

/// The unified error type for the HDP crates.
#[derive(Debug, Error)]
pub enum HdpError {
    /// The remote scoring service could not be reached or the connection failed.
    #[error("remote transport error: {reason}")]
    Transport { reason: String },

    /// The remote scoring service did not answer within the configured bound.
    #[error("remote call timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// The remote scoring service answered with a non-success HTTP status.
    #[error("remote service returned status {status}")]
    RemoteStatus { status: u16 },

    /// The remote response body did not match the expected prediction shape.
    #[error("malformed remote response: {reason}")]
    MalformedResponse { reason: String },

    /// The caller abandoned the evaluation before the remote call completed.
    #[error("remote call cancelled")]
    Cancelled,

    /// A vitals snapshot holds values no scoring rule can interpret.
    #[error("invalid vitals: {reason}")]
    InvalidVitals { reason: String },

    /// A symptom tag outside the fixed vocabulary.
    #[error("unknown symptom tag '{tag}'")]
    UnknownSymptom { tag: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A repository lookup found nothing under the given id.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A role-specific operation was applied to a profile of the other role.
    #[error("profile '{id}' has role '{actual}', expected '{expected}'")]
    RoleMismatch {
        id: String,
        expected: String,
        actual: String,
    },

    /// A profile update failed boundary validation.
    #[error("invalid profile update: {reason}")]
    InvalidProfile { reason: String },

    /// A clinician note was empty or otherwise unusable.
    #[error("invalid note: {reason}")]
    InvalidNote { reason: String },

    /// A prediction already exists for this vitals record.
    #[error("vitals record '{vitals_id}' already has a prediction")]
    DuplicatePrediction { vitals_id: String },

    /// A doctor acted on a patient outside their care list.
    #[error("doctor '{doctor_id}' is not assigned to patient '{patient_id}'")]
    NotAssigned {
        doctor_id: String,
        patient_id: String,
    },

    /// The backing store could not complete the operation.
    #[error("storage error: {reason}")]
    Storage { reason: String },
}

impl HdpError {
    /// True for the failures the evaluator absorbs by moving on from the
    /// remote step: transport, timeout, status, malformed body, cancellation.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            HdpError::Transport { .. }
                | HdpError::Timeout { .. }
                | HdpError::RemoteStatus { .. }
                | HdpError::MalformedResponse { .. }
                | HdpError::Cancelled
        )
    }
}

/// Convenience alias used throughout the HDP crates.
pub type HdpResult<T> = Result<T, HdpError>;
