// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingError, NewAppointment,
    PaymentStatus, RecordPaymentRequest, Slot, SlotError,
};
use crate::store::{AppointmentStore, SlotStore, SupabaseAppointmentStore, SupabaseSlotStore};

/// Orchestrates slot reservation and appointment creation as one logical
/// operation. Slots and appointments live in separate storage partitions, so
/// the booking is a two-step saga: reserve, create, and on a failed create a
/// compensating release. The reserve step carries the whole no-double-booking
/// guarantee; everything after it must either finish or undo it.
pub struct BookingService {
    slots: Arc<dyn SlotStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        Self {
            slots: Arc::new(SupabaseSlotStore::new(Arc::clone(&supabase))),
            appointments: Arc::new(SupabaseAppointmentStore::new(supabase)),
        }
    }

    pub fn with_stores(
        slots: Arc<dyn SlotStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        Self { slots, appointments }
    }

    pub async fn book_appointment(
        &self,
        user_id: &str,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        info!("Booking slot {} for user {}", request.slot_id, user_id);

        let slot = match self.slots.reserve(request.slot_id, auth_token).await {
            Ok(slot) => slot,
            Err(SlotError::AlreadyBooked) | Err(SlotError::NotFound) => {
                // Both cases present to the caller the same way: pick another
                // slot. No partial state exists at this point.
                debug!("Slot {} unavailable for user {}", request.slot_id, user_id);
                return Err(BookingError::SlotUnavailable);
            }
            Err(SlotError::Storage(e)) => return Err(BookingError::Storage(e)),
        };

        let new_appointment = NewAppointment {
            user_id: user_id.to_string(),
            slot_id: Some(slot.id),
            title: request.title,
            appointment_time: slot.start_time,
            appointment_type: request.appointment_type,
            clinic_id: Some(slot.clinic_id),
            status: AppointmentStatus::Confirmed,
            notes: request.notes,
            has_reminder: request.has_reminder.unwrap_or(false),
            payment_status: PaymentStatus::Pending,
        };

        match self.appointments.create(new_appointment, auth_token).await {
            Ok(appointment) => {
                info!(
                    "Appointment {} booked for user {} on slot {}",
                    appointment.id, user_id, slot.id
                );
                Ok(appointment)
            }
            Err(e) => {
                warn!(
                    "Appointment creation failed after reserving slot {}, rolling back reservation",
                    slot.id
                );
                if let Err(release_err) = self.slots.release(slot.id, auth_token).await {
                    // The slot stays booked with no appointment behind it until
                    // an operator intervenes; make that loud.
                    error!(
                        "Compensating release of slot {} failed: {}",
                        slot.id, release_err
                    );
                }
                Err(e)
            }
        }
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        debug!("Cancelling appointment {}", appointment_id);

        let appointment = self.appointments.get(appointment_id, auth_token).await?;

        // Idempotent: a second cancel must not touch the slot, which may have
        // been rebooked by someone else since the first one released it.
        if !appointment.is_live() {
            debug!("Appointment {} is already cancelled", appointment_id);
            return Ok(appointment);
        }

        let cancelled = self
            .appointments
            .update_status(appointment_id, AppointmentStatus::Cancelled, auth_token)
            .await?;

        // Best-effort: cancellation must succeed even if the slot reference is
        // null or the slot was already released.
        if let Some(slot_id) = appointment.slot_id {
            match self.slots.release(slot_id, auth_token).await {
                Ok(()) => debug!("Released slot {} after cancellation", slot_id),
                Err(e) => warn!(
                    "Could not release slot {} for cancelled appointment {}: {}",
                    slot_id, appointment_id, e
                ),
            }
        }

        info!("Appointment {} cancelled", appointment_id);
        Ok(cancelled)
    }

    /// Pure state update on the payment sub-record; no slot interaction.
    pub async fn record_payment(
        &self,
        appointment_id: Uuid,
        request: RecordPaymentRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        debug!(
            "Recording payment for appointment {} ({})",
            appointment_id, request.payment_status
        );
        self.appointments
            .record_payment(appointment_id, request, auth_token)
            .await
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        self.appointments.get(appointment_id, auth_token).await
    }

    pub async fn get_available_slots(
        &self,
        clinic_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Slot>, BookingError> {
        self.slots
            .get_available_by_clinic(clinic_id, auth_token)
            .await
            .map_err(|e| match e {
                SlotError::Storage(msg) => BookingError::Storage(msg),
                SlotError::NotFound | SlotError::AlreadyBooked => BookingError::NotFound,
            })
    }

    /// The aggregator needs the raw appointment source for the unified feed.
    pub fn appointment_store(&self) -> Arc<dyn AppointmentStore> {
        Arc::clone(&self.appointments)
    }
}
