//! The scoring-model seam.
//!
//! Both the remote adapter and the local clinical evaluator implement
//! `RiskModel`; the evaluator tries them in order. The minimal fallback is
//! not a `RiskModel`: it is infallible and always runs last.

use hdp_contracts::{
    cancel::CancelToken,
    error::HdpResult,
    model::{ModelInput, ModelOutput},
};

/// A scoring strategy that maps normalized vitals to a score and factors.
pub trait RiskModel: Send + Sync {
    /// Short name used in log fields (e.g. "remote", "clinical").
    fn name(&self) -> &str;

    /// Score `input`.
    ///
    /// Implementations that block on I/O must return `HdpError::Cancelled`
    /// promptly once `cancel` is set. The returned score is unclamped; the
    /// evaluator clamps and classifies it.
    fn predict(&self, input: &ModelInput, cancel: &CancelToken) -> HdpResult<ModelOutput>;
}
