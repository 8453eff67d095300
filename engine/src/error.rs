//! Error types for the roster engine.

use crate::{OpKey, RowId, UserField};
use thiserror::Error;

/// All possible errors from the roster engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Lookup errors
    #[error("row not found: {0}")]
    RowNotFound(RowId),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("row {0} is not yet confirmed by the server")]
    Unconfirmed(RowId),

    // Input errors
    #[error("invalid value for field '{field}': {value:?}")]
    InvalidValue { field: UserField, value: String },

    #[error("invalid operation key: {0}")]
    InvalidOpKey(String),

    // Completion errors
    #[error("operation not pending: {0}")]
    NotPending(OpKey),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
