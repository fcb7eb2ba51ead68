//! # hdp-store
//!
//! Repository traits for the HDP monitoring application and an in-memory
//! implementation.
//!
//! The risk evaluator is storage-free. Everything that persists (vitals
//! records, predictions, profiles, notes) goes through these traits, which
//! the monitoring service receives as an injected `Arc<dyn ClinicStore>`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hdp_store::{ClinicStore, InMemoryStore};
//!
//! let store: Arc<dyn ClinicStore> = Arc::new(InMemoryStore::new());
//! store.upsert_profile(profile)?;
//! let records = store.vitals_for_patient(&patient_id)?;
//! ```

pub mod memory;
pub mod repository;

pub use memory::InMemoryStore;
pub use repository::{
    ClinicStore, NoteRepository, PredictionRepository, ProfileRepository, SubmissionRepository,
    VitalsRepository,
};

// ── Tests ─────────────────────────────────────────────────────────────────────
