//! Application state.

use std::sync::Arc;
use std::time::Instant;

use matchcast_relay::ConnectionRegistry;

/// State shared across handlers.
///
/// The registry is created once at process start and passed by
/// reference to both the WebSocket accept path (here) and the
/// subscriber dispatch path (in `main`), never held as an ambient
/// global.
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    start_time: Instant,
}

impl AppState {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            start_time: Instant::now(),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(ConnectionRegistry::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_starts_with_no_connections() {
        let state = AppState::default();
        assert_eq!(state.registry.connection_count(), 0);
    }

    #[test]
    fn test_uptime() {
        let state = AppState::default();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(state.uptime().as_millis() >= 10);
    }
}
