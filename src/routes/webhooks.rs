use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{api, voice};
use crate::state::AppState;

/// Create the router for the carrier-facing webhook endpoints
///
/// These routes are called by Twilio and always answer with TwiML;
/// request authenticity is the carrier's concern, so no auth middleware
/// is layered here. The root path doubles as the health check for
/// uptime probes.
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(api::health_check).post(voice::handle_initial_call),
        )
        .route("/fallback", post(voice::handle_fallback))
        .layer(TraceLayer::new_for_http())
}
