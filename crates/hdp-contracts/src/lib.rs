//! # hdp-contracts
//!
//! Shared types, wire formats, and errors for the HDP risk monitor.
//!
//! All crates in the workspace import from here. The only logic in this
//! crate is boundary validation (symptom tags, profile updates) and the
//! score → level classification that every evaluation path shares.

pub mod cancel;
pub mod error;
pub mod ids;
pub mod model;
pub mod prediction;
pub mod profile;
pub mod vitals;
