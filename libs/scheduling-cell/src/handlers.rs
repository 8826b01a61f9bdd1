// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{Appointment, BookAppointmentRequest, BookingError, RecordPaymentRequest};
use crate::services::booking::BookingService;

fn ensure_owner_or_admin(
    appointment: &Appointment,
    user: &User,
    action: &str,
) -> Result<(), AppError> {
    let is_owner = appointment.user_id == user.id;
    let is_admin = user.role.as_deref() == Some("admin");
    if !is_owner && !is_admin {
        return Err(AppError::Auth(format!(
            "Not authorized to {} this appointment",
            action
        )));
    }
    Ok(())
}

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::SlotUnavailable => {
            // Distinguish "pick another slot" from a generic failure so the
            // client can prompt re-selection.
            AppError::Conflict("This slot is no longer available".to_string())
        }
        BookingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        BookingError::Storage(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .book_appointment(&user.id, request, token)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id, token)
        .await
        .map_err(map_booking_error)?;

    ensure_owner_or_admin(&appointment, &user, "view")?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id, token)
        .await
        .map_err(map_booking_error)?;

    ensure_owner_or_admin(&appointment, &user, "cancel")?;

    let cancelled = booking_service
        .cancel_appointment(appointment_id, token)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": cancelled,
        "message": "Appointment cancelled"
    })))
}

#[axum::debug_handler]
pub async fn record_payment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id, token)
        .await
        .map_err(map_booking_error)?;

    ensure_owner_or_admin(&appointment, &user, "update")?;

    let updated = booking_service
        .record_payment(appointment_id, request, token)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": updated
    })))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(clinic_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let slots = booking_service
        .get_available_slots(clinic_id, token)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "slots": slots })))
}
