//! HDP Risk Monitor: Demo CLI
//!
//! Runs the reference clinic scenarios, or scores a single set of vitals
//! given on the command line.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- routine-checkin
//!   cargo run -p demo -- preeclampsia-watch
//!   cargo run -p demo -- remote-outage
//!   cargo run -p demo -- clinician-review
//!   cargo run -p demo -- evaluate --systolic 150 --diastolic 95 --heart-rate 95 \
//!       --weight 70 --age 30 --symptom headache --json

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hdp_config::HdpConfig;
use hdp_contracts::{
    error::{HdpError, HdpResult},
    ids::{PatientId, VitalsId},
    vitals::VitalsSnapshot,
};
use hdp_ref_clinic::{
    build_evaluator,
    scenarios::{
        clinician_review, preeclampsia_watch, print_prediction, remote_outage, routine_checkin,
    },
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// HDP risk monitor demo.
///
/// Scores hypertensive-disorder-of-pregnancy risk with a remote model,
/// falling back to local clinical rules when the model is unavailable.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "HDP risk monitor demo",
    long_about = "Runs the HDP reference clinic scenarios, or evaluates one set of vitals\n\
                  through the remote → clinical → fallback chain."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four clinic scenarios in sequence.
    RunAll,
    /// Scenario 1: a normal reading from a healthy patient.
    RoutineCheckin,
    /// Scenario 2: escalating readings over four weeks.
    PreeclampsiaWatch,
    /// Scenario 3: the remote scoring service is down.
    RemoteOutage,
    /// Scenario 4: risk-sorted overview, notes, and profile updates.
    ClinicianReview,
    /// Evaluate one set of vitals.
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
struct EvaluateArgs {
    /// Systolic blood pressure, mmHg.
    #[arg(long)]
    systolic: u32,
    /// Diastolic blood pressure, mmHg.
    #[arg(long)]
    diastolic: u32,
    /// Heart rate, bpm.
    #[arg(long)]
    heart_rate: u32,
    /// Body weight, kg.
    #[arg(long)]
    weight: f64,
    /// Patient age in years. Defaults to the configured age.
    #[arg(long)]
    age: Option<u32>,
    /// A reported symptom (repeatable), e.g. headache, swelling, nausea.
    #[arg(long = "symptom")]
    symptoms: Vec<String>,
    /// The patient took prescribed medication.
    #[arg(long)]
    medication_taken: bool,
    /// TOML configuration file. Environment variables still apply.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the prediction as JSON.
    #[arg(long)]
    json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see each evaluation step.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => with_banner(run_all),
        Command::RoutineCheckin => with_banner(routine_checkin::run_scenario),
        Command::PreeclampsiaWatch => with_banner(preeclampsia_watch::run_scenario),
        Command::RemoteOutage => with_banner(remote_outage::run_scenario),
        Command::ClinicianReview => with_banner(clinician_review::run_scenario),
        Command::Evaluate(args) => evaluate(args),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn with_banner(run: fn() -> HdpResult<()>) -> HdpResult<()> {
    print_banner();
    run()?;
    println!("All selected scenarios completed successfully.");
    Ok(())
}

fn run_all() -> HdpResult<()> {
    routine_checkin::run_scenario()?;
    preeclampsia_watch::run_scenario()?;
    remote_outage::run_scenario()?;
    clinician_review::run_scenario()?;
    Ok(())
}

// ── Single evaluation ─────────────────────────────────────────────────────────

fn evaluate(args: EvaluateArgs) -> HdpResult<()> {
    let config = HdpConfig::load(args.config.as_deref())?;
    debug!(
        endpoint = %config.remote.endpoint(),
        remote_enabled = config.remote.enabled,
        "configuration loaded"
    );

    let mut snapshot =
        VitalsSnapshot::new(args.systolic, args.diastolic, args.heart_rate, args.weight)
            .with_medication_taken(args.medication_taken)
            .with_symptom_tags(&args.symptoms)?;
    snapshot.age = args.age;

    let evaluator = build_evaluator(&config)?;
    let prediction = evaluator.evaluate(&PatientId::new("cli"), &VitalsId::new(), &snapshot);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&prediction).map_err(|e| HdpError::MalformedResponse {
                reason: format!("failed to render prediction as JSON: {e}"),
            })?;
        println!("{}", rendered);
    } else {
        println!(
            "Vitals: BP {}/{} mmHg, HR {} bpm, {} kg",
            snapshot.systolic_bp, snapshot.diastolic_bp, snapshot.heart_rate, snapshot.weight_kg
        );
        print_prediction(&prediction);
    }
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("HDP Risk Monitor");
    println!("Reference Clinic Demo");
    println!("=====================");
    println!();
    println!("Evaluation chain per submitted reading:");
    println!("  [1] Remote scoring service (when configured; any failure moves on)");
    println!("  [2] Clinical rule table: additive bands + interaction bonuses, capped at 0.95");
    println!("  [3] Minimal fallback: systolic ≥ 140 → 0.60, otherwise 0.20");
    println!("  [4] Classify: ≥ 0.70 high, ≥ 0.40 moderate, otherwise low");
    println!();
}
