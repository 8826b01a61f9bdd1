#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use calendar_cell::models::{CalendarError, MedicationLog, MedicationStatus, Mood, MoodType};
use calendar_cell::store::{MedicationLogStore, MoodStore};
use scheduling_cell::models::{
    Appointment, AppointmentStatus, AppointmentType, BookingError, NewAppointment, PaymentStatus,
    RecordPaymentRequest, Slot, SlotError,
};
use scheduling_cell::store::{AppointmentStore, SlotStore};

pub fn make_appointment(
    user_id: &str,
    appointment_time: DateTime<Utc>,
    slot_id: Option<Uuid>,
) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        slot_id,
        title: "Dentist".to_string(),
        appointment_time,
        appointment_type: AppointmentType::Checkup,
        clinic_id: None,
        status: AppointmentStatus::Confirmed,
        notes: None,
        has_reminder: false,
        payment_method: None,
        payment_status: PaymentStatus::Pending,
        payment_amount: None,
        transaction_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_log(user_id: &str, medication_time: DateTime<Utc>) -> MedicationLog {
    let now = Utc::now();
    MedicationLog {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        medication_id: Uuid::new_v4(),
        medication_name: Some("Ibuprofen".to_string()),
        medication_time,
        status: MedicationStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_mood(user_id: &str, timestamp: DateTime<Utc>, mood_type: MoodType) -> Mood {
    let now = Utc::now();
    Mood {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        timestamp,
        mood_type,
        feeling: None,
        journal: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_slot(start_time: DateTime<Utc>, is_booked: bool) -> Slot {
    Slot {
        id: Uuid::new_v4(),
        clinic_id: Uuid::new_v4(),
        start_time,
        end_time: start_time + Duration::minutes(30),
        is_booked,
    }
}

// ==============================================================================
// IN-MEMORY STORES
// ==============================================================================

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
    pub fn new(seed: Vec<Appointment>) -> Arc<Self> {
        Arc::new(Self {
            appointments: Mutex::new(seed.into_iter().map(|a| (a.id, a)).collect()),
        })
    }

    pub async fn appointment(&self, appointment_id: Uuid) -> Option<Appointment> {
        self.appointments.lock().await.get(&appointment_id).cloned()
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

pub struct InMemoryMedicationLogStore {
    logs: Mutex<HashMap<Uuid, MedicationLog>>,
}

impl InMemoryMedicationLogStore {
    pub fn new(seed: Vec<MedicationLog>) -> Arc<Self> {
        Arc::new(Self {
            logs: Mutex::new(seed.into_iter().map(|l| (l.id, l)).collect()),
        })
    }

    pub async fn contains(&self, log_id: Uuid) -> bool {
        self.logs.lock().await.contains_key(&log_id)
    }
}

#[async_trait]
impl MedicationLogStore for InMemoryMedicationLogStore {
    async fn get_for_user(
        &self,
        user_id: &str,
        _auth_token: &str,
    ) -> Result<Vec<MedicationLog>, CalendarError> {
        let logs = self.logs.lock().await;
        let mut result: Vec<MedicationLog> = logs
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|l| l.medication_time);
        Ok(result)
    }

    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        _auth_token: &str,
    ) -> Result<Vec<MedicationLog>, CalendarError> {
        let logs = self.logs.lock().await;
        let mut result: Vec<MedicationLog> = logs
            .values()
            .filter(|l| l.user_id == user_id && l.medication_time >= from && l.medication_time < to)
            .cloned()
            .collect();
        result.sort_by_key(|l| l.medication_time);
        Ok(result)
    }

    async fn update_status(
        &self,
        log_id: Uuid,
        status: MedicationStatus,
        _auth_token: &str,
    ) -> Result<MedicationLog, CalendarError> {
        let mut logs = self.logs.lock().await;
        let log = logs.get_mut(&log_id).ok_or(CalendarError::NotFound)?;
        log.status = status;
        log.updated_at = Utc::now();
        Ok(log.clone())
    }

    async fn delete(&self, log_id: Uuid, _auth_token: &str) -> Result<(), CalendarError> {
        self.logs
            .lock()
            .await
            .remove(&log_id)
            .map(|_| ())
            .ok_or(CalendarError::NotFound)
    }
}

pub struct InMemoryMoodStore {
    moods: Mutex<HashMap<Uuid, Mood>>,
}

impl InMemoryMoodStore {
    pub fn new(seed: Vec<Mood>) -> Arc<Self> {
        Arc::new(Self {
            moods: Mutex::new(seed.into_iter().map(|m| (m.id, m)).collect()),
        })
    }

    pub async fn contains(&self, mood_id: Uuid) -> bool {
        self.moods.lock().await.contains_key(&mood_id)
    }
}

#[async_trait]
impl MoodStore for InMemoryMoodStore {
    async fn get_for_user(
        &self,
        user_id: &str,
        _auth_token: &str,
    ) -> Result<Vec<Mood>, CalendarError> {
        let moods = self.moods.lock().await;
        let mut result: Vec<Mood> = moods
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.timestamp);
        Ok(result)
    }

    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        _auth_token: &str,
    ) -> Result<Vec<Mood>, CalendarError> {
        let moods = self.moods.lock().await;
        let mut result: Vec<Mood> = moods
            .values()
            .filter(|m| m.user_id == user_id && m.timestamp >= from && m.timestamp < to)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.timestamp);
        Ok(result)
    }

    async fn delete(&self, mood_id: Uuid, _auth_token: &str) -> Result<(), CalendarError> {
        self.moods
            .lock()
            .await
            .remove(&mood_id)
            .map(|_| ())
            .ok_or(CalendarError::NotFound)
    }
}
