//! Scenario 2: Pre-eclampsia watch
//!
//! A 37-year-old patient submits four weekly readings as blood pressure
//! climbs. Maternal age adds points to every reading, so the first one is
//! already 0.25. Once systolic pressure crosses 140 the interaction bonuses
//! push every later reading to the 0.95 cap. The trend series show what a
//! chart would plot.

use hdp_contracts::{error::HdpResult, ids::PatientId, prediction::RiskPrediction};

use crate::{
    mock_data,
    scenarios::{local_clinic, print_prediction},
    service::{ChartPoint, MonitoringService, TrendData},
};

/// Submit every escalating reading and return the predictions in order.
pub fn watch(service: &MonitoringService) -> HdpResult<Vec<RiskPrediction>> {
    service.register_profile(mock_data::doctor())?;
    service.register_profile(mock_data::watch_patient())?;

    let patient_id = PatientId::new(mock_data::WATCH_PATIENT_ID);
    mock_data::escalating_readings()
        .into_iter()
        .map(|(snapshot, note)| {
            service
                .submit_vitals(&patient_id, snapshot, Some(note.to_string()))
                .map(|(_, prediction)| prediction)
        })
        .collect()
}

fn print_series(label: &str, trend: &TrendData, pick: fn(&TrendData) -> &[ChartPoint]) {
    let values: Vec<String> = pick(trend).iter().map(|p| format!("{:.0}", p.value)).collect();
    println!("    {:<10} {}", label, values.join(" → "));
}

pub fn run_scenario() -> HdpResult<()> {
    println!("=== Scenario 2: Pre-eclampsia Watch ===");
    println!();
    println!("  Patient: Beatriz Souza, 37, weeks 30-33");
    println!();

    let service = local_clinic();
    let predictions = watch(&service)?;
    let patient_id = PatientId::new(mock_data::WATCH_PATIENT_ID);

    for (entry, prediction) in service.patient_history(&patient_id)?.iter().zip(&predictions) {
        let snapshot = &entry.vitals.snapshot;
        println!(
            "  [{}] BP {}/{}, HR {}",
            entry.vitals.notes.as_deref().unwrap_or("-"),
            snapshot.systolic_bp,
            snapshot.diastolic_bp,
            snapshot.heart_rate
        );
        print_prediction(prediction);
        println!();
    }

    let trend = service.vitals_trend(&patient_id)?;
    println!("  Trend ({} readings):", trend.len());
    print_series("systolic", &trend, |t| t.systolic_bp.as_slice());
    print_series("diastolic", &trend, |t| t.diastolic_bp.as_slice());
    print_series("heart rate", &trend, |t| t.heart_rate.as_slice());
    print_series("weight", &trend, |t| t.weight_kg.as_slice());
    println!();
    Ok(())
}
