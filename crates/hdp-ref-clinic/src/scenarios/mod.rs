//! Demo scenarios.
//!
//! Each scenario wires a `MonitoringService` over an `InMemoryStore`, drives
//! it with the fictional data in `mock_data`, and prints what happens.
//! Scenarios other than `remote_outage` score locally so their output is
//! deterministic.

use std::sync::Arc;

use hdp_contracts::prediction::RiskPrediction;
use hdp_core::RiskEvaluator;
use hdp_store::InMemoryStore;

use crate::service::MonitoringService;

pub mod clinician_review;
pub mod preeclampsia_watch;
pub mod remote_outage;
pub mod routine_checkin;

/// A service with an empty store and the local-only evaluator.
pub(crate) fn local_clinic() -> MonitoringService {
    MonitoringService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(RiskEvaluator::local_only()),
    )
}

/// Print a prediction as an indented block.
pub fn print_prediction(prediction: &RiskPrediction) {
    println!(
        "  Risk:    {} ({:.2}, prediction={}, source={:?})",
        prediction.risk_level.as_str().to_uppercase(),
        prediction.risk_score,
        prediction.binary_prediction(),
        prediction.source
    );
    if prediction.factors.is_empty() {
        println!("  Factors: none");
    } else {
        for factor in &prediction.factors {
            println!("    - {}", factor);
        }
    }
}
