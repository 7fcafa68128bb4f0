//! Router assembly.
//!
//! ```text
//! GET /ws      - WebSocket upgrade
//! GET /health  - Health check
//! ```

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::http::monitoring;
use crate::state::AppState;
use crate::websocket::ws_handler;

/// Create the relay router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(monitoring::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
