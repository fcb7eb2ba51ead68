//! Scenario 3: Remote outage
//!
//! The evaluator is configured with a remote scoring service that is down
//! (nothing listens on its port). Submitting vitals still succeeds: the
//! remote failure is logged and the clinical model's result is stored,
//! identical to a local-only evaluation of the same snapshot.
//!
//! A second reading carries a corrupt weight that the clinical model
//! refuses, which exercises the last step of the chain: the systolic-only
//! fallback, marked with "Prediction service unavailable".

use std::net::TcpListener;
use std::sync::Arc;

use hdp_config::{HdpConfig, RemoteConfig};
use hdp_contracts::{
    error::{HdpError, HdpResult},
    ids::{PatientId, VitalsId},
    prediction::RiskPrediction,
    vitals::VitalsSnapshot,
};
use hdp_core::RiskEvaluator;
use hdp_store::InMemoryStore;

use crate::{
    mock_data,
    scenarios::print_prediction,
    service::{build_evaluator, MonitoringService},
};

/// Outcome of the outage run.
pub struct OutageOutcome {
    pub with_outage: RiskPrediction,
    pub local_only: RiskPrediction,
    pub corrupt_reading: RiskPrediction,
}

/// A base URL on this host that refuses connections.
fn unreachable_base_url() -> HdpResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|e| HdpError::Transport {
        reason: format!("failed to reserve a local port: {e}"),
    })?;
    let addr = listener.local_addr().map_err(|e| HdpError::Transport {
        reason: format!("failed to read local port: {e}"),
    })?;
    Ok(format!("http://{addr}"))
}

pub fn simulate_outage() -> HdpResult<OutageOutcome> {
    let config = HdpConfig {
        remote: RemoteConfig {
            enabled: true,
            base_url: unreachable_base_url()?,
            timeout_ms: 1_000,
            ..RemoteConfig::default()
        },
        ..HdpConfig::default()
    };
    config.validate()?;

    let service = MonitoringService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(build_evaluator(&config)?),
    );
    service.register_profile(mock_data::doctor())?;
    service.register_profile(mock_data::routine_patient())?;

    let patient_id = PatientId::new(mock_data::ROUTINE_PATIENT_ID);
    let snapshot = mock_data::outage_reading();

    let (_, with_outage) = service.submit_vitals(&patient_id, snapshot.clone(), None)?;
    let local_only = RiskEvaluator::local_only().evaluate(&patient_id, &VitalsId::new(), &snapshot);

    let corrupt = VitalsSnapshot::new(152, 96, 90, f64::NAN);
    let (_, corrupt_reading) = service.submit_vitals(&patient_id, corrupt, None)?;

    Ok(OutageOutcome {
        with_outage,
        local_only,
        corrupt_reading,
    })
}

pub fn run_scenario() -> HdpResult<()> {
    println!("=== Scenario 3: Remote Scoring Outage ===");
    println!();
    println!("  Remote service: configured, not reachable (connection refused)");
    println!("  Vitals:         BP 150/95 mmHg, HR 95 bpm, 70 kg, age 30, headache");
    println!();

    let outcome = simulate_outage()?;

    println!("  With remote down:");
    print_prediction(&outcome.with_outage);
    println!();
    println!("  Local-only evaluation of the same vitals:");
    print_prediction(&outcome.local_only);
    println!();

    let identical = outcome.with_outage.risk_score == outcome.local_only.risk_score
        && outcome.with_outage.factors == outcome.local_only.factors;
    println!(
        "  Results identical: {}",
        if identical { "YES" } else { "NO" }
    );
    println!();

    println!("  Corrupt reading (weight not a number):");
    print_prediction(&outcome.corrupt_reading);
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use hdp_contracts::prediction::{PredictionSource, RiskLevel};
    use hdp_core::SERVICE_UNAVAILABLE_FACTOR;

    use super::*;

    #[test]
    fn test_outage_matches_local_evaluation() {
        let outcome = simulate_outage().unwrap();

        assert_eq!(outcome.with_outage.source, PredictionSource::Clinical);
        assert_eq!(outcome.with_outage.risk_score, outcome.local_only.risk_score);
        assert_eq!(outcome.with_outage.factors, outcome.local_only.factors);
        assert_eq!(outcome.with_outage.risk_level, RiskLevel::High);
        assert_eq!(outcome.with_outage.risk_score, 0.85);
    }

    #[test]
    fn test_corrupt_reading_uses_fallback() {
        let outcome = simulate_outage().unwrap();
        let prediction = outcome.corrupt_reading;

        assert_eq!(prediction.source, PredictionSource::Fallback);
        assert_eq!(prediction.risk_score, 0.6);
        assert_eq!(
            prediction.factors,
            vec!["High blood pressure detected", SERVICE_UNAVAILABLE_FACTOR]
        );
    }
}
