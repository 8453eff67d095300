//! Client error types.

/// Errors from talking to the record service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Status { status: u16, message: String },

    #[error("Grid error: {0}")]
    Grid(#[from] roster_engine::Error),
}

/// Result type alias for client calls.
pub type Result<T> = std::result::Result<T, ClientError>;
