//! Domain layer for rpms-alert.
//!
//! Entities shared by the alerting core and the persistence collaborator.

pub mod user;

pub use user::{AddressKind, Role, User};
