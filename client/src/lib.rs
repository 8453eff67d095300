//! # Roster Client
//!
//! [`RecordClient`] speaks the record service's JSON API; [`GridSession`]
//! drives a [`roster_engine::GridController`] with it, so every grid action
//! goes local change, round trip, then commit or rollback.

pub mod client;
pub mod error;
pub mod session;

pub use client::RecordClient;
pub use error::{ClientError, Result};
pub use session::GridSession;
