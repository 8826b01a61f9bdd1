// libs/calendar-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{NaiveDate, NaiveTime};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CalendarCategory, CalendarError, UpdateMedicationStatusRequest};
use crate::services::aggregator::CalendarAggregator;
use crate::services::summary::MoodSummaryService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct EventRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEventQuery {
    pub category: CalendarCategory,
}

#[derive(Debug, Deserialize)]
pub struct DailySummaryQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct MonthlySummaryQuery {
    /// Any date inside the month to summarize.
    pub month: NaiveDate,
}

fn map_calendar_error(e: CalendarError) -> AppError {
    match e {
        CalendarError::NotFound => AppError::NotFound("Calendar event not found".to_string()),
        CalendarError::NotImplemented(category) => {
            AppError::NotImplemented(format!("Operations on {} events are not implemented", category))
        }
        CalendarError::Storage(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// UNIFIED CALENDAR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_events_for_range(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<EventRangeQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    if query.start_date > query.end_date {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }

    let token = auth.token();
    let aggregator = CalendarAggregator::new(&state);

    // Inclusive civil-date range: [start 00:00, day-after-end 00:00).
    let from = query.start_date.and_time(NaiveTime::MIN).and_utc();
    let to = query
        .end_date
        .succ_opt()
        .unwrap_or(query.end_date)
        .and_time(NaiveTime::MIN)
        .and_utc();

    let events = aggregator
        .get_events_for_range(&user.id, from, to, token)
        .await
        .map_err(map_calendar_error)?;

    Ok(Json(json!({ "events": events })))
}

#[axum::debug_handler]
pub async fn get_events_by_category(
    State(state): State<Arc<AppConfig>>,
    Path(category): Path<CalendarCategory>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let aggregator = CalendarAggregator::new(&state);

    let events = aggregator
        .get_events_by_category(&user.id, category, token)
        .await
        .map_err(map_calendar_error)?;

    Ok(Json(json!({ "events": events })))
}

#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<Arc<AppConfig>>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<DeleteEventQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let aggregator = CalendarAggregator::new(&state);

    aggregator
        .delete_event(event_id, query.category, token)
        .await
        .map_err(map_calendar_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Event deleted"
    })))
}

#[axum::debug_handler]
pub async fn update_medication_status(
    State(state): State<Arc<AppConfig>>,
    Path(log_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
    Json(request): Json<UpdateMedicationStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let aggregator = CalendarAggregator::new(&state);

    let log = aggregator
        .update_medication_status(log_id, request.status, token)
        .await
        .map_err(map_calendar_error)?;

    Ok(Json(json!({
        "success": true,
        "medication_log": log
    })))
}

// ==============================================================================
// MOOD SUMMARY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_daily_mood_summary(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DailySummaryQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let summary_service = MoodSummaryService::new(&state);

    let summaries = summary_service
        .get_daily_summary(&user.id, query.date, token)
        .await
        .map_err(map_calendar_error)?;

    Ok(Json(json!({ "summaries": summaries })))
}

#[axum::debug_handler]
pub async fn get_monthly_mood_summary(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<MonthlySummaryQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let summary_service = MoodSummaryService::new(&state);

    let summaries = summary_service
        .get_monthly_summary(&user.id, query.month, token)
        .await
        .map_err(map_calendar_error)?;

    Ok(Json(json!({ "summaries": summaries })))
}
