//! Notification subsystem.
//!
//! Formats alert and reminder messages and delivers them to recipients
//! through a single bound channel (email or SMS).

pub mod channels;
pub mod dispatcher;
pub mod events;
pub mod message;
pub mod reminder;
pub mod transport;

pub use channels::{
    ChannelKind, EmailChannel, EmailConfig, NotificationChannel, SmsChannel, SmsConfig,
    build_channel,
};
pub use dispatcher::{AlertDispatcher, DispatchOutcome, FailedDelivery};
pub use events::ReminderEvent;
pub use message::{AlertMessage, Severity};
pub use reminder::ReminderScheduler;
pub use transport::{MailTransport, OutgoingMail, SmsGateway, SmtpMailTransport, TwilioGateway};
