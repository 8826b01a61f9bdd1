// libs/calendar-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use scheduling_cell::models::{Appointment, BookingError};

// ==============================================================================
// EVENT SOURCE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationLog {
    pub id: Uuid,
    pub user_id: String,
    pub medication_id: Uuid,
    /// Denormalized for feed titles, so the aggregator never joins at read
    /// time. Nullable for rows written before the column existed.
    pub medication_name: Option<String>,
    pub medication_time: DateTime<Utc>,
    pub status: MedicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MedicationStatus {
    Taken,
    Missed,
    Skipped,
    Pending,
}

impl MedicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MedicationStatus::Taken => "Taken",
            MedicationStatus::Missed => "Missed",
            MedicationStatus::Skipped => "Skipped",
            MedicationStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MedicationStatus::Taken => write!(f, "taken"),
            MedicationStatus::Missed => write!(f, "missed"),
            MedicationStatus::Skipped => write!(f, "skipped"),
            MedicationStatus::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mood {
    pub id: Uuid,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub mood_type: MoodType,
    pub feeling: Option<String>,
    pub journal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoodType {
    Happy,
    Calm,
    Neutral,
    Anxious,
    Sad,
    Angry,
    Tired,
}

impl MoodType {
    pub fn label(&self) -> &'static str {
        match self {
            MoodType::Happy => "Happy",
            MoodType::Calm => "Calm",
            MoodType::Neutral => "Neutral",
            MoodType::Anxious => "Anxious",
            MoodType::Sad => "Sad",
            MoodType::Angry => "Angry",
            MoodType::Tired => "Tired",
        }
    }
}

impl fmt::Display for MoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==============================================================================
// UNIFIED CALENDAR MODELS
// ==============================================================================

/// Routing tag for the unified feed. Raw ids are not globally unique across
/// the backing stores, so every write against the feed carries one of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalendarCategory {
    Appointment,
    Medication,
    Mood,
    MenstrualCycle,
}

impl fmt::Display for CalendarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarCategory::Appointment => write!(f, "appointment"),
            CalendarCategory::Medication => write!(f, "medication"),
            CalendarCategory::Mood => write!(f, "mood"),
            CalendarCategory::MenstrualCycle => write!(f, "menstrual_cycle"),
        }
    }
}

/// Read-side projection over the three event sources. Never stored; it has no
/// lifecycle of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterCalendarEvent {
    pub event_id: Uuid,
    pub category: CalendarCategory,
    pub title: String,
    pub subtitle: Option<String>,
    pub event_time: DateTime<Utc>,
    pub status: String,
}

impl MasterCalendarEvent {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            event_id: appointment.id,
            category: CalendarCategory::Appointment,
            title: appointment.title.clone(),
            subtitle: Some(appointment.appointment_type.label().to_string()),
            event_time: appointment.appointment_time,
            status: appointment.status.to_string(),
        }
    }

    pub fn from_medication_log(log: &MedicationLog) -> Self {
        Self {
            event_id: log.id,
            category: CalendarCategory::Medication,
            title: log
                .medication_name
                .clone()
                .unwrap_or_else(|| "Medication".to_string()),
            subtitle: Some(log.status.label().to_string()),
            event_time: log.medication_time,
            status: log.status.to_string(),
        }
    }

    pub fn from_mood(mood: &Mood) -> Self {
        Self {
            event_id: mood.id,
            category: CalendarCategory::Mood,
            title: mood.mood_type.label().to_string(),
            subtitle: mood.feeling.clone(),
            event_time: mood.timestamp,
            status: "logged".to_string(),
        }
    }
}

/// Per-mood-type share of a summary window. Computed, not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSummary {
    pub mood_type: MoodType,
    pub count: i64,
    pub percentage: f64,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMedicationStatusRequest {
    pub status: MedicationStatus,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar event not found")]
    NotFound,

    #[error("Operations on {0} events are not implemented")]
    NotImplemented(CalendarCategory),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<BookingError> for CalendarError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::NotFound => CalendarError::NotFound,
            BookingError::SlotUnavailable => {
                CalendarError::Storage("Unexpected slot state during calendar operation".to_string())
            }
            BookingError::Storage(msg) => CalendarError::Storage(msg),
        }
    }
}
