//! Scenario 1: Routine check-in
//!
//! A healthy 28-year-old submits normal vitals. The only signal is a
//! systolic reading in the "elevated" band, so the clinical model scores it
//! 0.10 and the patient sees a low-risk result.

use hdp_contracts::{error::HdpResult, ids::PatientId, prediction::RiskPrediction};

use crate::{
    mock_data,
    scenarios::{local_clinic, print_prediction},
    service::MonitoringService,
};

/// Register the clinic and submit one normal reading.
pub fn check_in(service: &MonitoringService) -> HdpResult<RiskPrediction> {
    service.register_profile(mock_data::doctor())?;
    service.register_profile(mock_data::routine_patient())?;

    let (_, prediction) = service.submit_vitals(
        &PatientId::new(mock_data::ROUTINE_PATIENT_ID),
        mock_data::routine_reading(),
        Some("morning reading before breakfast".to_string()),
    )?;
    Ok(prediction)
}

pub fn run_scenario() -> HdpResult<()> {
    println!("=== Scenario 1: Routine Check-in ===");
    println!();
    println!("  Patient: Amara Nwosu, 28, week 26");
    println!("  Vitals:  BP 120/80 mmHg, HR 70 bpm, 60 kg, no symptoms");
    println!();

    let service = local_clinic();
    let prediction = check_in(&service)?;
    print_prediction(&prediction);

    let history = service.patient_history(&PatientId::new(mock_data::ROUTINE_PATIENT_ID))?;
    println!();
    println!("  Stored history entries: {}", history.len());
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use hdp_contracts::prediction::{PredictionSource, RiskLevel};

    use super::*;

    #[test]
    fn test_normal_reading_is_low_risk() {
        let prediction = check_in(&local_clinic()).unwrap();

        assert_eq!(prediction.risk_score, 0.10);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
        assert_eq!(prediction.binary_prediction(), 0);
        assert_eq!(prediction.source, PredictionSource::Clinical);
        assert_eq!(prediction.factors, vec!["Elevated blood pressure (120-129 mmHg)"]);
    }

    #[test]
    fn test_run_scenario_succeeds() {
        assert!(run_scenario().is_ok());
    }
}
