use clap::{Parser, Subcommand};
use heart_core::config::{exam_lead_days_from_env_value, record_dir_from_env_value};
use heart_core::{
    CoreConfig, IdentifierGenerator, IntakeForm, Outcome, RandomIdentifierGenerator, ScanForm,
    SessionController, SessionEvent, SessionState, Transition,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "heart")]
#[command(about = "Heart health imaging clinic records CLI")]
struct Cli {
    /// Print each transition as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a fresh patient identifier without saving anything
    GenerateId,
    /// Register a new patient
    Intake {
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        health_history: String,
        insurance_id: String,
    },
    /// Record CT calcium-scoring results for a patient identifier
    RecordScan {
        patient_id: String,
        /// Total Agatston CAC score
        total: String,
        lm: String,
        lad: String,
        lcx: String,
        rca: String,
        pda: String,
    },
    /// Log in as a patient and show their results
    Login { patient_id: String },
}

/// Runs the events of one workflow, printing every transition.
///
/// Returns false if the final transition was refused.
fn run(
    session: &mut SessionController,
    events: Vec<SessionEvent>,
    json: bool,
) -> anyhow::Result<bool> {
    let mut last = None;
    for event in events {
        let transition = session.handle(event);
        if json {
            println!("{}", serde_json::to_string(&transition)?);
        } else {
            print_transition(&transition);
        }
        last = Some(transition);
    }
    Ok(!last.is_some_and(|t| t.is_rejected()))
}

fn print_transition(transition: &Transition) {
    match &transition.outcome {
        Some(Outcome::IntakeSaved(confirmation)) => {
            println!("Saved successfully!\n{}", confirmation.message());
        }
        Some(Outcome::ScanSaved(confirmation)) => {
            println!(
                "{} (Patient ID: {})",
                confirmation.message(),
                confirmation.identifier
            );
        }
        Some(Outcome::Rejected(condition)) => {
            eprintln!("{}: {}", condition.title(), condition);
        }
        None => {}
    }

    if let SessionState::PatientDashboard(dashboard) = &transition.state {
        println!("{}", dashboard.title());
        for line in dashboard.score_lines() {
            println!("  {line}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heart=info".parse()?)
                .add_directive("heart_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let record_dir = record_dir_from_env_value(std::env::var("HEART_RECORD_DIR").ok());
    let exam_lead_days =
        exam_lead_days_from_env_value(std::env::var("HEART_EXAM_LEAD_DAYS").ok())?;
    let cfg = Arc::new(CoreConfig::new(record_dir, exam_lead_days)?);
    tracing::debug!(
        record_dir = %cfg.record_dir().display(),
        exam_lead_days,
        "configuration resolved"
    );

    let mut session = SessionController::new(cfg);

    let events = match cli.command {
        Some(Commands::GenerateId) => {
            println!("{}", RandomIdentifierGenerator::new().generate());
            return Ok(());
        }
        Some(Commands::Intake {
            first_name,
            last_name,
            email,
            phone,
            health_history,
            insurance_id,
        }) => vec![
            SessionEvent::OpenIntake,
            SessionEvent::SaveIntake(IntakeForm {
                first_name,
                last_name,
                email,
                phone,
                health_history,
                insurance_id,
            }),
        ],
        Some(Commands::RecordScan {
            patient_id,
            total,
            lm,
            lad,
            lcx,
            rca,
            pda,
        }) => vec![
            SessionEvent::OpenTechCapture,
            SessionEvent::SaveScan(ScanForm {
                identifier: patient_id,
                total,
                lm,
                lad,
                lcx,
                rca,
                pda,
            }),
        ],
        Some(Commands::Login { patient_id }) => {
            let events = vec![
                SessionEvent::OpenLogin,
                SessionEvent::Login {
                    identifier: patient_id,
                },
            ];
            let ok = run(&mut session, events, cli.json)?;
            if ok {
                session.handle(SessionEvent::Logout);
                return Ok(());
            }
            std::process::exit(1);
        }
        None => {
            println!("Use 'heart --help' for commands");
            return Ok(());
        }
    };

    if !run(&mut session, events, cli.json)? {
        std::process::exit(1);
    }

    Ok(())
}
