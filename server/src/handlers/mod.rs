//! Request handlers for the record service.

mod users;

pub use users::*;
