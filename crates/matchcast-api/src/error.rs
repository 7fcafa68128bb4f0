//! API error types.

use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bind address could not be parsed.
    #[error("Invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    /// Listener or serve failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
