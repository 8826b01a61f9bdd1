// libs/calendar-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn calendar_routes(state: Arc<AppConfig>) -> Router {
    // All calendar operations require authentication
    let protected_routes = Router::new()
        .route("/events", get(handlers::get_events_for_range))
        .route("/events/category/{category}", get(handlers::get_events_by_category))
        .route("/events/{event_id}", delete(handlers::delete_event))
        .route("/medications/{log_id}/status", patch(handlers::update_medication_status))
        .route("/moods/summary/daily", get(handlers::get_daily_mood_summary))
        .route("/moods/summary/monthly", get(handlers::get_monthly_mood_summary))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
