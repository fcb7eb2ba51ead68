//! # hdp-core
//!
//! The HDP risk evaluation chain.
//!
//! This crate provides:
//! - The `RiskModel` trait, the seam every scoring strategy plugs into
//! - `ClinicalModel`, the local additive rule table
//! - `MinimalFallback`, the systolic-only last resort
//! - `RiskEvaluator`, which runs remote → clinical → fallback and never fails
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hdp_core::RiskEvaluator;
//!
//! let evaluator = RiskEvaluator::local_only();
//! let prediction = evaluator.evaluate(&patient_id, &vitals_id, &snapshot);
//! ```

pub mod clinical;
pub mod evaluator;
pub mod fallback;
pub mod traits;

pub use clinical::ClinicalModel;
pub use evaluator::{RiskEvaluator, DEFAULT_PATIENT_AGE};
pub use fallback::{MinimalFallback, SERVICE_UNAVAILABLE_FACTOR};
pub use traits::RiskModel;
