//! Relay error types.

use thiserror::Error;

/// Relay error types.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Message bus connection or protocol error.
    #[error("Bus error: {0}")]
    Bus(#[from] redis::RedisError),

    /// Payload could not be serialized for publishing.
    #[error("Payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_error_from() {
        let bad = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = RelayError::from(bad);
        assert!(err.to_string().contains("serialization failed"));
    }
}
