use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rpms_alert::notification::ChannelKind;

#[derive(Parser, Debug)]
#[command(name = "rpms-alert")]
#[command(about = "Vital-sign alerting and patient notifications for remote patient monitoring")]
#[command(version)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Channel to deliver through, overriding the configuration
    #[arg(long, global = true, value_enum)]
    pub channel: Option<ChannelKind>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a patient's latest stored reading and alert their doctor
    Check {
        /// Patient ID
        patient: String,
    },

    /// Evaluate a manually entered reading and alert the doctor
    Evaluate {
        /// Patient ID
        patient: String,

        /// Heart rate (bpm)
        #[arg(long)]
        hr: f64,

        /// Systolic blood pressure (mmHg)
        #[arg(long)]
        bp: f64,

        /// Body temperature (°C)
        #[arg(long)]
        temp: f64,

        /// Oxygen saturation (%)
        #[arg(long)]
        o2: f64,

        /// Checkup date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List a patient's stored readings with their classification
    History {
        /// Patient ID
        patient: String,
    },

    /// Raise a panic alert to the patient's treating doctor
    Panic {
        /// Patient ID
        patient: String,

        /// Message from the patient
        #[arg(long)]
        note: Option<String>,
    },

    /// Send an appointment reminder to the patient
    RemindAppointment {
        /// Appointment ID
        id: i64,
    },

    /// Send a prescription reminder to the patient
    RemindPrescription {
        /// Prescription ID
        id: i64,
    },

    /// Print the active normal-range table
    Ranges,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let args = Args::try_parse_from([
            "rpms-alert",
            "--channel",
            "sms",
            "evaluate",
            "P001",
            "--hr",
            "110",
            "--bp",
            "120",
            "--temp",
            "36.8",
            "--o2",
            "98",
            "--date",
            "2026-03-01",
        ])
        .unwrap();

        assert_eq!(args.channel, Some(ChannelKind::Sms));
        match args.command {
            Commands::Evaluate { patient, hr, date, .. } => {
                assert_eq!(patient, "P001");
                assert_eq!(hr, 110.0);
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 1));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_remind_appointment() {
        let args = Args::try_parse_from(["rpms-alert", "remind-appointment", "7"]).unwrap();
        assert!(matches!(args.command, Commands::RemindAppointment { id: 7 }));
    }
}
