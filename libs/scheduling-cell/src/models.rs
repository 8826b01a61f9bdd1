// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// SLOT MODELS
// ==============================================================================

/// A bookable time window published by a clinic. Slots are created by clinic
/// scheduling tooling; this cell only flips `is_booked` via reserve/release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
}

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: String,
    /// Legacy and ad-hoc appointments may exist without a backing slot.
    pub slot_id: Option<Uuid>,
    pub title: String,
    pub appointment_time: DateTime<Utc>,
    pub appointment_type: AppointmentType,
    pub clinic_id: Option<Uuid>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub has_reminder: bool,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_amount: Option<f64>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_live(&self) -> bool {
        !matches!(self.status, AppointmentStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    #[serde(alias = "check_up", alias = "general")]
    Checkup,
    Consultation,
    #[serde(alias = "followup")]
    FollowUp,
    Vaccination,
    #[serde(alias = "lab")]
    LabTest,
    Therapy,
}

impl AppointmentType {
    /// Human-readable label, used as the calendar feed subtitle.
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentType::Checkup => "Check-up",
            AppointmentType::Consultation => "Consultation",
            AppointmentType::FollowUp => "Follow-up",
            AppointmentType::Vaccination => "Vaccination",
            AppointmentType::LabTest => "Lab test",
            AppointmentType::Therapy => "Therapy",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub slot_id: Uuid,
    pub title: String,
    pub appointment_type: AppointmentType,
    pub notes: Option<String>,
    pub has_reminder: Option<bool>,
}

/// Row to persist; the booking service fills time and clinic in from the
/// reserved slot so they cannot drift from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub user_id: String,
    pub slot_id: Option<Uuid>,
    pub title: String,
    pub appointment_time: DateTime<Utc>,
    pub appointment_type: AppointmentType,
    pub clinic_id: Option<Uuid>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub has_reminder: bool,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_amount: Option<f64>,
    pub transaction_id: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SlotError {
    #[error("Slot not found")]
    NotFound,

    #[error("Slot is already booked")]
    AlreadyBooked,

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum BookingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("This slot is no longer available")]
    SlotUnavailable,

    #[error("Storage error: {0}")]
    Storage(String),
}
