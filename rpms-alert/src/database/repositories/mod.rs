//! Repository layer for database access.
//!
//! Read-only repositories over the patient records. Each trait has a SQLx
//! implementation; services depend on the traits.

pub mod care;
pub mod user;
pub mod vitals;

pub use care::*;
pub use user::*;
pub use vitals::*;
