#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use scheduling_cell::models::{
    Appointment, AppointmentStatus, AppointmentType, BookAppointmentRequest, BookingError,
    NewAppointment, RecordPaymentRequest, Slot, SlotError,
};
use scheduling_cell::store::{AppointmentStore, SlotStore};

pub fn make_slot(clinic_id: Uuid, start_offset_hours: i64) -> Slot {
    let start = Utc::now() + Duration::hours(start_offset_hours);
    Slot {
        id: Uuid::new_v4(),
        clinic_id,
        start_time: start,
        end_time: start + Duration::minutes(30),
        is_booked: false,
    }
}

pub fn make_booking_request(slot_id: Uuid) -> BookAppointmentRequest {
    BookAppointmentRequest {
        slot_id,
        title: "General check-up".to_string(),
        appointment_type: AppointmentType::Checkup,
        notes: None,
        has_reminder: Some(false),
    }
}

/// Slot storage backed by a mutex-guarded map. Holding the lock across the
/// check-and-flip in `reserve` gives the same atomicity the production store
/// gets from its conditional write, which is what the concurrency tests lean
/// on.
pub struct InMemorySlotStore {
    slots: Mutex<HashMap<Uuid, Slot>>,
}

impl InMemorySlotStore {
    pub fn new(seed: Vec<Slot>) -> Arc<Self> {
        Arc::new(Self {
            slots: Mutex::new(seed.into_iter().map(|s| (s.id, s)).collect()),
        })
    }

    pub async fn slot(&self, slot_id: Uuid) -> Option<Slot> {
        self.slots.lock().await.get(&slot_id).cloned()
    }
}

#[async_trait]
impl SlotStore for InMemorySlotStore {
    async fn reserve(&self, slot_id: Uuid, _auth_token: &str) -> Result<Slot, SlotError> {
        let mut slots = self.slots.lock().await;
        let slot = slots.get_mut(&slot_id).ok_or(SlotError::NotFound)?;
        if slot.is_booked {
            return Err(SlotError::AlreadyBooked);
        }
        slot.is_booked = true;
        Ok(slot.clone())
    }

    async fn release(&self, slot_id: Uuid, _auth_token: &str) -> Result<(), SlotError> {
        let mut slots = self.slots.lock().await;
        let slot = slots.get_mut(&slot_id).ok_or(SlotError::NotFound)?;
        slot.is_booked = false;
        Ok(())
    }

    async fn get_slot(&self, slot_id: Uuid, _auth_token: &str) -> Result<Slot, SlotError> {
        self.slots
            .lock()
            .await
            .get(&slot_id)
            .cloned()
            .ok_or(SlotError::NotFound)
    }

    async fn get_available_by_clinic(
        &self,
        clinic_id: Uuid,
        _auth_token: &str,
    ) -> Result<Vec<Slot>, SlotError> {
        let slots = self.slots.lock().await;
        let mut available: Vec<Slot> = slots
            .values()
            .filter(|s| s.clinic_id == clinic_id && !s.is_booked)
            .cloned()
            .collect();
        available.sort_by_key(|s| s.start_time);
        Ok(available)
    }
}

pub struct InMemoryAppointmentStore {
    appointments: Mutex<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            appointments: Mutex::new(HashMap::new()),
        })
    }

    pub async fn live_appointments_for_slot(&self, slot_id: Uuid) -> Vec<Appointment> {
        self.appointments
            .lock()
            .await
            .values()
            .filter(|a| a.slot_id == Some(slot_id) && a.is_live())
            .cloned()
            .collect()
    }

    pub async fn insert(&self, appointment: Appointment) {
        self.appointments
            .lock()
            .await
            .insert(appointment.id, appointment);
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn create(
        &self,
        appointment: NewAppointment,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let now = Utc::now();
        let stored = Appointment {
            id: Uuid::new_v4(),
            user_id: appointment.user_id,
            slot_id: appointment.slot_id,
            title: appointment.title,
            appointment_time: appointment.appointment_time,
            appointment_type: appointment.appointment_type,
            clinic_id: appointment.clinic_id,
            status: appointment.status,
            notes: appointment.notes,
            has_reminder: appointment.has_reminder,
            payment_method: None,
            payment_status: appointment.payment_status,
            payment_amount: None,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        };
        self.appointments
            .lock()
            .await
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(
        &self,
        appointment_id: Uuid,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        self.appointments
            .lock()
            .await
            .get(&appointment_id)
            .cloned()
            .ok_or(BookingError::NotFound)
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let mut appointments = self.appointments.lock().await;
        let appointment = appointments
            .get_mut(&appointment_id)
            .ok_or(BookingError::NotFound)?;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn record_payment(
        &self,
        appointment_id: Uuid,
        payment: RecordPaymentRequest,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let mut appointments = self.appointments.lock().await;
        let appointment = appointments
            .get_mut(&appointment_id)
            .ok_or(BookingError::NotFound)?;
        appointment.payment_method = payment.payment_method;
        appointment.payment_status = payment.payment_status;
        appointment.payment_amount = payment.payment_amount;
        appointment.transaction_id = payment.transaction_id;
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn get_for_user(
        &self,
        user_id: &str,
        _auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let appointments = self.appointments.lock().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.appointment_time);
        Ok(result)
    }

    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        _auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let appointments = self.appointments.lock().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.user_id == user_id && a.appointment_time >= from && a.appointment_time < to)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.appointment_time);
        Ok(result)
    }
}

/// Appointment store whose `create` always fails, for exercising the
/// compensating slot release.
pub struct FailingAppointmentStore;

#[async_trait]
impl AppointmentStore for FailingAppointmentStore {
    async fn create(
        &self,
        _appointment: NewAppointment,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        Err(BookingError::Storage("insert rejected".to_string()))
    }

    async fn get(
        &self,
        _appointment_id: Uuid,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        Err(BookingError::NotFound)
    }

    async fn update_status(
        &self,
        _appointment_id: Uuid,
        _status: AppointmentStatus,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        Err(BookingError::NotFound)
    }

    async fn record_payment(
        &self,
        _appointment_id: Uuid,
        _payment: RecordPaymentRequest,
        _auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        Err(BookingError::NotFound)
    }

    async fn get_for_user(
        &self,
        _user_id: &str,
        _auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        Ok(Vec::new())
    }

    async fn get_for_user_in_range(
        &self,
        _user_id: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
        _auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        Ok(Vec::new())
    }
}
