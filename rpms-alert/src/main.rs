mod cli;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use rpms_alert::alert::LoggingSession;
use rpms_alert::config::AppConfig;
use rpms_alert::database;
use rpms_alert::logging::{self, LOG_RETENTION_DAYS};
use rpms_alert::notification::{DispatchOutcome, build_channel};
use rpms_alert::services::AlertService;
use vital_signs::VitalReading;

use crate::cli::{Args, Commands};

/// Exit code when a dispatch ran but at least one recipient was not reached.
const EXIT_PARTIAL_DELIVERY: i32 = 2;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {:#}", e);
            let error_json = serde_json::json!({
                "status": "error",
                "message": format!("{:#}", e),
            });
            println!("{}", error_json);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<i32> {
    let mut config = AppConfig::resolve(args.config.as_deref())?;
    if let Some(channel) = args.channel {
        config.channel = channel;
    }

    if let Commands::Ranges = args.command {
        config.ranges.validate()?;
        print_json(&config.ranges)?;
        return Ok(0);
    }

    config.validate()?;

    let log_handle = logging::init_logging(&config.logging)?;
    if let Some(dir) = log_handle.log_dir()
        && let Err(e) = logging::cleanup_old_logs(dir, LOG_RETENTION_DAYS).await
    {
        warn!(error = %e, "Failed to cleanup old logs");
    }

    let pool = database::init_pool(&config.database_url)
        .await
        .with_context(|| format!("opening database {}", config.database_url))?;
    database::run_migrations(&pool).await?;

    let channel = build_channel(config.channel, &config.email, &config.sms)?;
    info!(channel = %config.channel, "rpms-alert initialized");

    let service = AlertService::from_pool(
        pool,
        Arc::new(config.ranges.clone()),
        channel,
        Arc::new(LoggingSession),
    );

    let code = match args.command {
        Commands::Check { patient } => {
            let outcome = service.check_latest_vitals(&patient).await?;
            print_json(&outcome)?;
            exit_code(outcome.dispatch_outcome())
        }
        Commands::Evaluate {
            patient,
            hr,
            bp,
            temp,
            o2,
            date,
        } => {
            let observed_at = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let reading = VitalReading::new(patient.as_str(), hr, bp, temp, o2, observed_at);
            let outcome = service.evaluate_reading(&patient, reading).await?;
            print_json(&outcome)?;
            exit_code(outcome.dispatch_outcome())
        }
        Commands::History { patient } => {
            let history = service.reading_history(&patient).await?;
            print_json(&history)?;
            0
        }
        Commands::Panic { patient, note } => {
            let outcome = service.panic(&patient, note.as_deref()).await?;
            print_json(&outcome)?;
            exit_code(Some(&outcome.outcome))
        }
        Commands::RemindAppointment { id } => {
            let report = service.remind_appointment(id).await?;
            print_json(&report)?;
            exit_code(Some(&report.outcome))
        }
        Commands::RemindPrescription { id } => {
            let report = service.remind_prescription(id).await?;
            print_json(&report)?;
            exit_code(Some(&report.outcome))
        }
        Commands::Ranges => 0,
    };

    Ok(code)
}

fn exit_code(outcome: Option<&DispatchOutcome>) -> i32 {
    match outcome {
        Some(outcome) if !outcome.is_success() => EXIT_PARTIAL_DELIVERY,
        _ => 0,
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
