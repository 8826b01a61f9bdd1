// libs/scheduling-cell/src/store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{
    Appointment, AppointmentStatus, BookingError, NewAppointment, RecordPaymentRequest, Slot,
    SlotError,
};

/// Storage contract for bookable slots. `reserve` must be an atomic
/// conditional transition (`is_booked: false -> true`): when two callers race
/// on the same slot, exactly one gets the slot and the other sees
/// `AlreadyBooked`. Implementations must push that condition into the storage
/// layer rather than read-then-write.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn reserve(&self, slot_id: Uuid, auth_token: &str) -> Result<Slot, SlotError>;

    async fn release(&self, slot_id: Uuid, auth_token: &str) -> Result<(), SlotError>;

    async fn get_slot(&self, slot_id: Uuid, auth_token: &str) -> Result<Slot, SlotError>;

    /// Unbooked slots for a clinic, ordered by start time ascending.
    async fn get_available_by_clinic(
        &self,
        clinic_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Slot>, SlotError>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create(
        &self,
        appointment: NewAppointment,
        auth_token: &str,
    ) -> Result<Appointment, BookingError>;

    async fn get(&self, appointment_id: Uuid, auth_token: &str)
        -> Result<Appointment, BookingError>;

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        auth_token: &str,
    ) -> Result<Appointment, BookingError>;

    async fn record_payment(
        &self,
        appointment_id: Uuid,
        payment: RecordPaymentRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError>;

    async fn get_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError>;

    /// Appointments for a user with `appointment_time` in `[from, to)`,
    /// ordered ascending.
    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError>;
}

// ==============================================================================
// POSTGREST IMPLEMENTATIONS
// ==============================================================================

pub struct SupabaseSlotStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseSlotStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl SlotStore for SupabaseSlotStore {
    async fn reserve(&self, slot_id: Uuid, auth_token: &str) -> Result<Slot, SlotError> {
        debug!("Reserving slot {}", slot_id);

        // Filtered PATCH: the row only matches while it is still unbooked, so
        // the flip happens as one conditional write inside the store. An empty
        // result set means the condition matched nothing.
        let path = format!("/rest/v1/slots?id=eq.{}&is_booked=eq.false", slot_id);
        let result: Vec<Slot> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(json!({ "is_booked": true })),
                Some(return_representation()),
            )
            .await
            .map_err(|e| SlotError::Storage(e.to_string()))?;

        if let Some(slot) = result.into_iter().next() {
            return Ok(slot);
        }

        // Nothing matched: either the slot lost the race or it never existed.
        match self.get_slot(slot_id, auth_token).await {
            Ok(_) => Err(SlotError::AlreadyBooked),
            Err(SlotError::NotFound) => Err(SlotError::NotFound),
            Err(e) => Err(e),
        }
    }

    async fn release(&self, slot_id: Uuid, auth_token: &str) -> Result<(), SlotError> {
        debug!("Releasing slot {}", slot_id);

        let path = format!("/rest/v1/slots?id=eq.{}", slot_id);
        let result: Vec<Slot> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(json!({ "is_booked": false })),
                Some(return_representation()),
            )
            .await
            .map_err(|e| SlotError::Storage(e.to_string()))?;

        if result.is_empty() {
            return Err(SlotError::NotFound);
        }

        Ok(())
    }

    async fn get_slot(&self, slot_id: Uuid, auth_token: &str) -> Result<Slot, SlotError> {
        let path = format!("/rest/v1/slots?id=eq.{}", slot_id);
        let result: Vec<Slot> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| SlotError::Storage(e.to_string()))?;

        result.into_iter().next().ok_or(SlotError::NotFound)
    }

    async fn get_available_by_clinic(
        &self,
        clinic_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Slot>, SlotError> {
        let path = format!(
            "/rest/v1/slots?clinic_id=eq.{}&is_booked=eq.false&order=start_time.asc",
            clinic_id
        );
        let result: Vec<Slot> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| SlotError::Storage(e.to_string()))?;

        Ok(result)
    }
}

pub struct SupabaseAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn patch_appointment(
        &self,
        appointment_id: Uuid,
        update: Value,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(update),
                Some(return_representation()),
            )
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        result.into_iter().next().ok_or(BookingError::NotFound)
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn create(
        &self,
        appointment: NewAppointment,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let now = Utc::now();
        let appointment_data = json!({
            "user_id": appointment.user_id,
            "slot_id": appointment.slot_id,
            "title": appointment.title,
            "appointment_time": appointment.appointment_time.to_rfc3339(),
            "appointment_type": appointment.appointment_type,
            "clinic_id": appointment.clinic_id,
            "status": appointment.status,
            "notes": appointment.notes,
            "has_reminder": appointment.has_reminder,
            "payment_status": appointment.payment_status,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339()
        });

        let result: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(appointment_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::Storage("Failed to create appointment".to_string()))
    }

    async fn get(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        result.into_iter().next().ok_or(BookingError::NotFound)
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let update = json!({
            "status": status,
            "updated_at": Utc::now().to_rfc3339()
        });
        self.patch_appointment(appointment_id, update, auth_token).await
    }

    async fn record_payment(
        &self,
        appointment_id: Uuid,
        payment: RecordPaymentRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let update = json!({
            "payment_method": payment.payment_method,
            "payment_status": payment.payment_status,
            "payment_amount": payment.payment_amount,
            "transaction_id": payment.transaction_id,
            "updated_at": Utc::now().to_rfc3339()
        });
        self.patch_appointment(appointment_id, update, auth_token).await
    }

    async fn get_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&order=appointment_time.asc",
            user_id
        );
        let result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        Ok(result)
    }

    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        // URL-encoded RFC3339 bounds, half-open on the upper end.
        let from_enc = urlencoding::encode(&from.to_rfc3339()).into_owned();
        let to_enc = urlencoding::encode(&to.to_rfc3339()).into_owned();
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&appointment_time=gte.{}&appointment_time=lt.{}&order=appointment_time.asc",
            user_id, from_enc, to_enc
        );
        let result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        Ok(result)
    }
}
