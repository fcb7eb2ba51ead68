//! The risk evaluator: the remote → clinical → minimal fallback chain.
//!
//! The evaluator enforces the evaluation order:
//!
//!   Normalize → Remote (optional) → Clinical → Minimal fallback → Classify
//!
//! The first step that succeeds wins. Every step's output goes through the
//! same `RiskPrediction::new`, so clamping and the score → level thresholds
//! are identical no matter which step produced the score. `evaluate` has no
//! error path: the minimal fallback cannot fail.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info, warn};

use hdp_contracts::{
    cancel::CancelToken,
    ids::{PatientId, VitalsId},
    model::{ModelInput, ModelOutput},
    prediction::{PredictionSource, RiskPrediction},
    vitals::VitalsSnapshot,
};

pub use hdp_contracts::vitals::DEFAULT_PATIENT_AGE;

use crate::{clinical::ClinicalModel, fallback::MinimalFallback, traits::RiskModel};

/// Stateless evaluator shared across threads and patients.
///
/// Holds no per-evaluation state; concurrent calls are independent.
pub struct RiskEvaluator {
    remote: Option<Box<dyn RiskModel>>,
    clinical: Box<dyn RiskModel>,
    default_patient_age: u32,
}

impl RiskEvaluator {
    /// Create an evaluator from its strategies.
    ///
    /// `remote` is `None` when no scoring service is configured.
    pub fn new(
        remote: Option<Box<dyn RiskModel>>,
        clinical: Box<dyn RiskModel>,
        default_patient_age: u32,
    ) -> Self {
        Self {
            remote,
            clinical,
            default_patient_age,
        }
    }

    /// An evaluator with no remote step and the built-in clinical model.
    pub fn local_only() -> Self {
        Self::new(None, Box::new(ClinicalModel::new()), DEFAULT_PATIENT_AGE)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn default_patient_age(&self) -> u32 {
        self.default_patient_age
    }

    /// Normalize a snapshot into model input, resolving an unknown age to
    /// the configured default.
    pub fn normalize(&self, vitals: &VitalsSnapshot) -> ModelInput {
        let age = vitals.age.unwrap_or(self.default_patient_age);
        ModelInput::from_snapshot(vitals, age)
    }

    /// Evaluate `vitals` for the given patient and vitals record.
    ///
    /// The identifiers only stamp the output; they do not affect scoring.
    pub fn evaluate(
        &self,
        patient_id: &PatientId,
        vitals_id: &VitalsId,
        vitals: &VitalsSnapshot,
    ) -> RiskPrediction {
        self.evaluate_with_cancel(patient_id, vitals_id, vitals, &CancelToken::new())
    }

    /// Evaluate with a cancellation token.
    ///
    /// Cancelling aborts the pending remote request; the local steps still
    /// run, so a prediction is returned either way.
    ///
    /// # Chain
    ///
    /// 1. Remote, if configured and not already cancelled. Any error is
    ///    logged and the chain continues.
    /// 2. Clinical. An error or a panic is logged and the chain continues.
    /// 3. Minimal fallback. Always succeeds.
    pub fn evaluate_with_cancel(
        &self,
        patient_id: &PatientId,
        vitals_id: &VitalsId,
        vitals: &VitalsSnapshot,
        cancel: &CancelToken,
    ) -> RiskPrediction {
        let input = self.normalize(vitals);

        debug!(
            patient_id = %patient_id,
            vitals_id = %vitals_id,
            bp = input.bp,
            heart_rate = input.heart_rate,
            age = input.age,
            "risk evaluation starting"
        );

        // ── Step 1: Remote scoring service ───────────────────────────────────
        if let Some(remote) = &self.remote {
            if cancel.is_cancelled() {
                debug!(vitals_id = %vitals_id, "evaluation cancelled, skipping remote model");
            } else {
                match remote.predict(&input, cancel) {
                    Ok(output) => {
                        return self.finish(patient_id, vitals_id, output, PredictionSource::Remote);
                    }
                    Err(e) => {
                        warn!(
                            vitals_id = %vitals_id,
                            model = remote.name(),
                            error = %e,
                            "remote model failed, using clinical model"
                        );
                    }
                }
            }
        }

        // ── Step 2: Local clinical evaluator ─────────────────────────────────
        //
        // A panic here is a programming error; it is contained so the caller
        // still receives a prediction.
        let clinical = panic::catch_unwind(AssertUnwindSafe(|| {
            self.clinical.predict(&input, cancel)
        }));

        match clinical {
            Ok(Ok(output)) => {
                return self.finish(patient_id, vitals_id, output, PredictionSource::Clinical);
            }
            Ok(Err(e)) => {
                warn!(
                    vitals_id = %vitals_id,
                    model = self.clinical.name(),
                    error = %e,
                    "clinical model failed, using minimal fallback"
                );
            }
            Err(_) => {
                error!(
                    vitals_id = %vitals_id,
                    model = self.clinical.name(),
                    "clinical model panicked, using minimal fallback"
                );
            }
        }

        // ── Step 3: Minimal fallback ─────────────────────────────────────────
        let output = MinimalFallback::assess(&input);
        self.finish(patient_id, vitals_id, output, PredictionSource::Fallback)
    }

    fn finish(
        &self,
        patient_id: &PatientId,
        vitals_id: &VitalsId,
        output: ModelOutput,
        source: PredictionSource,
    ) -> RiskPrediction {
        let prediction = RiskPrediction::new(
            patient_id.clone(),
            vitals_id.clone(),
            output.score,
            output.factors,
            source,
        );

        info!(
            patient_id = %patient_id,
            vitals_id = %vitals_id,
            source = ?source,
            risk_level = %prediction.risk_level,
            risk_score = prediction.risk_score,
            "risk evaluation complete"
        );

        prediction
    }
}

impl Default for RiskEvaluator {
    fn default() -> Self {
        Self::local_only()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
