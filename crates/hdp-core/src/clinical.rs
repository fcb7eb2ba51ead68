//! The local clinical evaluator: an additive, explainable rule table.
//!
//! Scoring runs in two passes over a normalized `ModelInput`:
//!
//! 1. **Per-signal bands.** Each signal has a ladder of bands, highest
//!    severity first. Only the first matching band contributes, so a
//!    systolic reading of 165 mmHg scores the ≥160 band alone and never also
//!    the ≥140 band.
//! 2. **Interaction bonuses.** Each conjunction that holds adds its bonus
//!    independently; several may fire together.
//!
//! Contributions are tallied in integer hundredths ("points") so sums such
//! as 0.25 + 0.15 land exactly on a threshold, then clamped to
//! `MAX_RISK_SCORE`. Every contribution is non-negative, so the total never
//! drops below zero.

use tracing::debug;

use hdp_contracts::{
    cancel::CancelToken,
    error::{HdpError, HdpResult},
    model::{ModelInput, ModelOutput},
    prediction::MAX_RISK_SCORE,
};

use crate::traits::RiskModel;

/// Points are hundredths of a score unit.
const POINTS_PER_UNIT: f64 = 100.0;

/// `MAX_RISK_SCORE` in points.
const MAX_POINTS: u32 = 95;

/// One rung of an integer-valued band ladder (mmHg, bpm, years).
struct Band {
    min: u32,
    points: u32,
    factor: &'static str,
}

/// One rung of the body-weight ladder.
struct WeightBand {
    min_kg: f64,
    points: u32,
    factor: &'static str,
}

const SYSTOLIC_BANDS: [Band; 4] = [
    Band { min: 160, points: 60, factor: "Severe hypertension (≥160 mmHg)" },
    Band { min: 140, points: 40, factor: "Stage 2 hypertension (140-159 mmHg)" },
    Band { min: 130, points: 25, factor: "Stage 1 hypertension (130-139 mmHg)" },
    Band { min: 120, points: 10, factor: "Elevated blood pressure (120-129 mmHg)" },
];

const HEART_RATE_BANDS: [Band; 3] = [
    Band { min: 120, points: 30, factor: "Significant tachycardia (≥120 bpm)" },
    Band { min: 100, points: 20, factor: "Tachycardia (100-119 bpm)" },
    Band { min: 90, points: 10, factor: "Elevated heart rate (90-99 bpm)" },
];

const SWELLING_POINTS: u32 = 25;
const SWELLING_FACTOR: &str = "Edema/swelling present";

const HEADACHE_POINTS: u32 = 20;
const HEADACHE_FACTOR: &str = "Headache symptoms";

const AGE_BANDS: [Band; 2] = [
    Band { min: 40, points: 20, factor: "Advanced maternal age (≥40 years)" },
    Band { min: 35, points: 15, factor: "Maternal age 35-39 years" },
];

/// Ages strictly below this score the young-maternal-age band.
const YOUNG_AGE_LIMIT: u32 = 20;
const YOUNG_AGE_POINTS: u32 = 10;
const YOUNG_AGE_FACTOR: &str = "Young maternal age (<20 years)";

const WEIGHT_BANDS: [WeightBand; 3] = [
    WeightBand { min_kg: 100.0, points: 20, factor: "Severe obesity (≥100 kg)" },
    WeightBand { min_kg: 85.0, points: 15, factor: "Obesity (85-99 kg)" },
    WeightBand { min_kg: 75.0, points: 10, factor: "Overweight (75-84 kg)" },
];

/// A conjunction of signals that adds a bonus on top of the bands.
struct Interaction {
    applies: fn(&ModelInput) -> bool,
    points: u32,
    factor: &'static str,
}

const INTERACTIONS: [Interaction; 5] = [
    Interaction {
        applies: |i| i.bp >= 140 && i.headache,
        points: 15,
        factor: "Hypertension with headache",
    },
    Interaction {
        applies: |i| i.bp >= 140 && i.swelling,
        points: 15,
        factor: "Hypertension with edema",
    },
    Interaction {
        applies: |i| i.bp >= 160 && i.heart_rate >= 100,
        points: 20,
        factor: "Severe hypertension with tachycardia",
    },
    Interaction {
        applies: |i| i.headache && i.swelling,
        points: 10,
        factor: "Multiple preeclampsia symptoms present",
    },
    Interaction {
        applies: |i| i.age >= 35 && i.bp >= 140,
        points: 10,
        factor: "Advanced maternal age with hypertension",
    },
];

/// Running total of points and the factors that earned them.
#[derive(Default)]
struct Tally {
    points: u32,
    factors: Vec<String>,
}

impl Tally {
    fn add(&mut self, points: u32, factor: &str) {
        self.points += points;
        self.factors.push(factor.to_string());
    }

    fn into_output(self) -> ModelOutput {
        let points = self.points.min(MAX_POINTS);
        ModelOutput {
            score: f64::from(points) / POINTS_PER_UNIT,
            factors: self.factors,
        }
    }
}

fn first_band(bands: &[Band], value: u32) -> Option<&Band> {
    bands.iter().find(|band| value >= band.min)
}

/// The deterministic, rule-based HDP risk scorer.
///
/// A pure function of its input: the same `ModelInput` always yields the
/// same score and the same factor order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClinicalModel;

impl ClinicalModel {
    pub fn new() -> Self {
        Self
    }

    /// Score `input` against the rule table.
    ///
    /// Returns `HdpError::InvalidVitals` when a reading cannot be a real
    /// measurement (zero blood pressure or heart rate, non-finite or
    /// non-positive weight).
    pub fn assess(&self, input: &ModelInput) -> HdpResult<ModelOutput> {
        validate(input)?;

        let mut tally = Tally::default();

        if let Some(band) = first_band(&SYSTOLIC_BANDS, input.bp) {
            tally.add(band.points, band.factor);
        }

        if let Some(band) = first_band(&HEART_RATE_BANDS, input.heart_rate) {
            tally.add(band.points, band.factor);
        }

        if input.swelling {
            tally.add(SWELLING_POINTS, SWELLING_FACTOR);
        }

        if input.headache {
            tally.add(HEADACHE_POINTS, HEADACHE_FACTOR);
        }

        if let Some(band) = first_band(&AGE_BANDS, input.age) {
            tally.add(band.points, band.factor);
        } else if input.age < YOUNG_AGE_LIMIT {
            tally.add(YOUNG_AGE_POINTS, YOUNG_AGE_FACTOR);
        }

        if let Some(band) = WEIGHT_BANDS.iter().find(|band| input.weight >= band.min_kg) {
            tally.add(band.points, band.factor);
        }

        for interaction in &INTERACTIONS {
            if (interaction.applies)(input) {
                tally.add(interaction.points, interaction.factor);
            }
        }

        let raw_points = tally.points;
        let output = tally.into_output();

        debug!(
            raw_points,
            score = output.score,
            factor_count = output.factors.len(),
            capped = output.score >= MAX_RISK_SCORE,
            "clinical assessment complete"
        );

        Ok(output)
    }
}

impl RiskModel for ClinicalModel {
    fn name(&self) -> &str {
        "clinical"
    }

    fn predict(&self, input: &ModelInput, _cancel: &CancelToken) -> HdpResult<ModelOutput> {
        self.assess(input)
    }
}

fn validate(input: &ModelInput) -> HdpResult<()> {
    if input.bp == 0 {
        return Err(HdpError::InvalidVitals {
            reason: "systolic blood pressure must be positive".to_string(),
        });
    }
    if input.heart_rate == 0 {
        return Err(HdpError::InvalidVitals {
            reason: "heart rate must be positive".to_string(),
        });
    }
    if !input.weight.is_finite() || input.weight <= 0.0 {
        return Err(HdpError::InvalidVitals {
            reason: format!("weight must be a positive number, got {}", input.weight),
        });
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use hdp_contracts::{
        error::HdpError,
        model::ModelInput,
        prediction::{RiskLevel, MAX_RISK_SCORE},
    };

    use super::ClinicalModel;

    const EPSILON: f64 = 1e-9;

    fn input(bp: u32, heart_rate: u32, weight: f64, age: u32) -> ModelInput {
        ModelInput {
            bp,
            swelling: false,
            headache: false,
            age,
            weight,
            heart_rate,
        }
    }

    fn score(input: &ModelInput) -> f64 {
        ClinicalModel::new().assess(input).unwrap().score
    }

    // ── Reference scenarios ──────────────────────────────────────────────────

    /// BP 120, HR 70, 60 kg, age 28, no symptoms: elevated-BP band only.
    #[test]
    fn test_routine_reading_scores_elevated_band_only() {
        let output = ClinicalModel::new().assess(&input(120, 70, 60.0, 28)).unwrap();

        assert!((output.score - 0.10).abs() < EPSILON, "score was {}", output.score);
        assert_eq!(output.factors, vec!["Elevated blood pressure (120-129 mmHg)"]);
        assert_eq!(RiskLevel::from_score(output.score), RiskLevel::Low);
    }

    /// BP 150, HR 95, 70 kg, age 30, headache:
    /// stage 2 (0.40) + elevated HR (0.10) + headache (0.20) + BP&headache (0.15).
    #[test]
    fn test_stage_two_with_headache_is_high() {
        let mut i = input(150, 95, 70.0, 30);
        i.headache = true;
        let output = ClinicalModel::new().assess(&i).unwrap();

        assert!((output.score - 0.85).abs() < EPSILON, "score was {}", output.score);
        assert_eq!(
            output.factors,
            vec![
                "Stage 2 hypertension (140-159 mmHg)",
                "Elevated heart rate (90-99 bpm)",
                "Headache symptoms",
                "Hypertension with headache",
            ]
        );
        assert_eq!(RiskLevel::from_score(output.score), RiskLevel::High);
    }

    /// Every top band plus every interaction overshoots and clamps to 0.95.
    #[test]
    fn test_severe_presentation_clamps_at_max() {
        let mut i = input(180, 130, 110.0, 42);
        i.headache = true;
        i.swelling = true;
        let output = ClinicalModel::new().assess(&i).unwrap();

        assert_eq!(output.score, MAX_RISK_SCORE);
        assert_eq!(RiskLevel::from_score(output.score), RiskLevel::High);
        // Six band factors plus all five interactions.
        assert_eq!(output.factors.len(), 11);
        assert!(output.factors.contains(&"Severe hypertension with tachycardia".to_string()));
        assert!(output.factors.contains(&"Advanced maternal age with hypertension".to_string()));
    }

    /// Unmapped symptoms never reach the model input, so a nausea-only
    /// snapshot scores exactly like one with no symptoms.
    #[test]
    fn test_unmapped_symptoms_contribute_nothing() {
        use hdp_contracts::vitals::{Symptom, VitalsSnapshot};

        let plain = VitalsSnapshot::new(118, 76, 72, 62.0);
        let nauseous = plain.clone().with_symptom(Symptom::Nausea);

        let plain_output = ClinicalModel::new()
            .assess(&ModelInput::from_snapshot(&plain, 28))
            .unwrap();
        let nauseous_output = ClinicalModel::new()
            .assess(&ModelInput::from_snapshot(&nauseous, 28))
            .unwrap();

        assert_eq!(plain_output, nauseous_output);
        assert_eq!(nauseous_output.score, 0.0);
        assert!(nauseous_output.factors.is_empty());
    }

    // ── Band exclusivity ─────────────────────────────────────────────────────

    #[test]
    fn test_bands_do_not_double_count() {
        // 165 mmHg is in the ≥160 band only: 0.60, not 0.60 + 0.40 + ...
        assert!((score(&input(165, 70, 60.0, 28)) - 0.60).abs() < EPSILON);
        // 125 bpm is in the ≥120 band only.
        assert!((score(&input(100, 125, 60.0, 28)) - 0.30).abs() < EPSILON);
        // 105 kg is in the ≥100 band only.
        assert!((score(&input(100, 70, 105.0, 28)) - 0.20).abs() < EPSILON);
    }

    #[test]
    fn test_age_bands() {
        assert!((score(&input(100, 70, 60.0, 41)) - 0.20).abs() < EPSILON);
        assert!((score(&input(100, 70, 60.0, 35)) - 0.15).abs() < EPSILON);
        assert!((score(&input(100, 70, 60.0, 19)) - 0.10).abs() < EPSILON);
        assert_eq!(score(&input(100, 70, 60.0, 20)), 0.0);
        assert_eq!(score(&input(100, 70, 60.0, 34)), 0.0);
    }

    /// 0.25 (stage 1) + 0.15 (age 35-39) must land exactly on the moderate
    /// threshold.
    #[test]
    fn test_band_sums_hit_thresholds_exactly() {
        let s = score(&input(135, 70, 60.0, 36));
        assert_eq!(RiskLevel::from_score(s), RiskLevel::Moderate, "score was {s}");
    }

    #[test]
    fn test_interactions_fire_independently() {
        // BP ≥140 with swelling and age ≥35: stage 2 (40) + swelling (25)
        // + age 35-39 (15) + BP&swelling (15) + age&BP (10) = 105 → 95.
        let mut i = input(145, 70, 60.0, 36);
        i.swelling = true;
        let output = ClinicalModel::new().assess(&i).unwrap();
        assert_eq!(output.score, MAX_RISK_SCORE);
        assert_eq!(
            &output.factors[3..],
            &["Hypertension with edema", "Advanced maternal age with hypertension"]
        );

        // Headache and swelling with normal BP: only the symptom pair bonus.
        let mut i = input(110, 70, 60.0, 28);
        i.headache = true;
        i.swelling = true;
        assert!((score(&i) - 0.55).abs() < EPSILON);
    }

    // ── Determinism ──────────────────────────────────────────────────────────

    #[test]
    fn test_assessment_is_deterministic() {
        let mut i = input(162, 104, 88.0, 37);
        i.headache = true;
        let model = ClinicalModel::new();
        let first = model.assess(&i).unwrap();
        for _ in 0..10 {
            assert_eq!(model.assess(&i).unwrap(), first);
        }
    }

    // ── Invalid input ────────────────────────────────────────────────────────

    #[test]
    fn test_invalid_readings_are_rejected() {
        let model = ClinicalModel::new();
        for bad in [
            input(0, 70, 60.0, 28),
            input(120, 0, 60.0, 28),
            input(120, 70, 0.0, 28),
            input(120, 70, -3.0, 28),
            input(120, 70, f64::NAN, 28),
            input(120, 70, f64::INFINITY, 28),
        ] {
            assert!(
                matches!(model.assess(&bad), Err(HdpError::InvalidVitals { .. })),
                "expected InvalidVitals for {:?}",
                bad
            );
        }
    }

    // ── Properties ───────────────────────────────────────────────────────────

    fn arb_input() -> impl Strategy<Value = ModelInput> {
        (
            1u32..260,
            any::<bool>(),
            any::<bool>(),
            14u32..55,
            35.0f64..180.0,
            30u32..200,
        )
            .prop_map(|(bp, swelling, headache, age, weight, heart_rate)| ModelInput {
                bp,
                swelling,
                headache,
                age,
                weight,
                heart_rate,
            })
    }

    proptest! {
        #[test]
        fn test_score_stays_within_bounds(i in arb_input()) {
            let s = score(&i);
            prop_assert!(s >= 0.0);
            prop_assert!(s <= MAX_RISK_SCORE);
        }

        #[test]
        fn test_score_is_monotonic_in_systolic_bp(i in arb_input(), raise in 0u32..120) {
            let mut higher = i.clone();
            higher.bp = i.bp + raise;
            prop_assert!(score(&higher) >= score(&i));
        }
    }
}
