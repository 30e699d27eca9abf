//! Alerting core.
//!
//! Two ways an emergency reaches a clinician: an abnormal vital reading
//! ([`EmergencyAlert`]) or the patient pressing the panic button
//! ([`PanicButton`]).

pub mod emergency;
pub mod panic;
pub mod state;

pub use emergency::{AlertOutcome, EmergencyAlert};
pub use panic::{ClinicianSession, LoggingSession, PanicButton, PanicOutcome};
pub use state::AlertState;
