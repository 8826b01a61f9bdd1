use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use calendar_cell::router::calendar_routes;
use scheduling_cell::router::scheduling_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "HealthTrack API is running!" }))
        .nest("/api/appointments", scheduling_routes(state.clone()))
        .nest("/api/calendar", calendar_routes(state.clone()))
}
