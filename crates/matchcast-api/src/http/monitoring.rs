//! Monitoring and health check handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy.
    Healthy,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Version information.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Currently open client connections.
    pub connections: usize,
}

/// `GET /health`
///
/// The relay has no durable state to probe; reachable means healthy.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        connections: state.registry.connection_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_connection_count() {
        let state = Arc::new(AppState::default());
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        state.registry.register(tx);

        let Json(response) = health_check(State(state)).await;
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.connections, 1);
        assert!(!response.version.is_empty());
    }

    #[test]
    fn test_health_status_serializes_lowercase() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, r#""healthy""#);
    }
}
