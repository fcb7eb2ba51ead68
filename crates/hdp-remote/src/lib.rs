//! # hdp-remote
//!
//! The remote scoring service as a [`hdp_core::RiskModel`].
//!
//! [`client::RemoteModel`] POSTs the normalized input to the configured
//! endpoint and returns the service's probability and factors. Responses
//! are checked by [`verify::ResponseVerifier`] against a JSON Schema before
//! they are decoded. Every failure (transport, timeout, non-2xx status, bad
//! body, cancellation) comes back as an `HdpError`; the evaluator logs it
//! and moves on to the clinical model.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use hdp_config::HdpConfig;
//! use hdp_core::{ClinicalModel, RiskEvaluator};
//! use hdp_remote::RemoteModel;
//!
//! let config = HdpConfig::from_env()?;
//! let remote = RemoteModel::from_config(&config.remote)?;
//! let evaluator = RiskEvaluator::new(
//!     Some(Box::new(remote)),
//!     Box::new(ClinicalModel::new()),
//!     config.evaluation.default_patient_age,
//! );
//! ```

pub mod client;
pub mod verify;

pub use client::RemoteModel;
pub use verify::ResponseVerifier;

// ── Tests ─────────────────────────────────────────────────────────────────────
