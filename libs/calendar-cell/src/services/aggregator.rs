// libs/calendar-cell/src/services/aggregator.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use scheduling_cell::services::booking::BookingService;
use scheduling_cell::store::{AppointmentStore, SupabaseAppointmentStore, SupabaseSlotStore};

use crate::models::{
    CalendarCategory, CalendarError, MasterCalendarEvent, MedicationLog, MedicationStatus, Mood,
};
use crate::store::{
    MedicationLogStore, MoodStore, SupabaseMedicationLogStore, SupabaseMoodStore,
};

/// Merges the three event sources into one chronologically ordered feed and
/// routes feed writes back to the store owning the event's category. The
/// sources have genuinely different schemas and lifecycles, so each keeps its
/// own store; only the projection is shared.
pub struct CalendarAggregator {
    appointments: Arc<dyn AppointmentStore>,
    medication_logs: Arc<dyn MedicationLogStore>,
    moods: Arc<dyn MoodStore>,
    booking_service: BookingService,
}

impl CalendarAggregator {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let slots = Arc::new(SupabaseSlotStore::new(Arc::clone(&supabase)));
        let appointments: Arc<dyn AppointmentStore> =
            Arc::new(SupabaseAppointmentStore::new(Arc::clone(&supabase)));

        Self {
            appointments: Arc::clone(&appointments),
            medication_logs: Arc::new(SupabaseMedicationLogStore::new(Arc::clone(&supabase))),
            moods: Arc::new(SupabaseMoodStore::new(supabase)),
            booking_service: BookingService::with_stores(slots, appointments),
        }
    }

    pub fn with_stores(
        booking_service: BookingService,
        medication_logs: Arc<dyn MedicationLogStore>,
        moods: Arc<dyn MoodStore>,
    ) -> Self {
        Self {
            appointments: booking_service.appointment_store(),
            medication_logs,
            moods,
            booking_service,
        }
    }

    /// Unified feed for `[from, to)`, ascending by event time with the event
    /// id as deterministic tie-break.
    pub async fn get_events_for_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<MasterCalendarEvent>, CalendarError> {
        debug!("Fetching calendar events for user {} in [{}, {})", user_id, from, to);

        let (appointments, logs, moods) = tokio::try_join!(
            async {
                self.appointments
                    .get_for_user_in_range(user_id, from, to, auth_token)
                    .await
                    .map_err(CalendarError::from)
            },
            self.medication_logs
                .get_for_user_in_range(user_id, from, to, auth_token),
            self.moods.get_for_user_in_range(user_id, from, to, auth_token),
        )?;

        let mut events = Self::project_all(&appointments, &logs, &moods);
        Self::sort_events(&mut events);

        info!(
            "Merged {} calendar events for user {} ({} appointments, {} medication logs, {} moods)",
            events.len(),
            user_id,
            appointments.len(),
            logs.len(),
            moods.len()
        );
        Ok(events)
    }

    /// Same projection restricted to one source, no range filter.
    pub async fn get_events_by_category(
        &self,
        user_id: &str,
        category: CalendarCategory,
        auth_token: &str,
    ) -> Result<Vec<MasterCalendarEvent>, CalendarError> {
        let mut events = match category {
            CalendarCategory::Appointment => self
                .appointments
                .get_for_user(user_id, auth_token)
                .await
                .map_err(CalendarError::from)?
                .iter()
                .map(MasterCalendarEvent::from_appointment)
                .collect(),
            CalendarCategory::Medication => self
                .medication_logs
                .get_for_user(user_id, auth_token)
                .await?
                .iter()
                .map(MasterCalendarEvent::from_medication_log)
                .collect(),
            CalendarCategory::Mood => self
                .moods
                .get_for_user(user_id, auth_token)
                .await?
                .iter()
                .map(MasterCalendarEvent::from_mood)
                .collect(),
            // No source produces these yet, so the feed is truthfully empty.
            CalendarCategory::MenstrualCycle => Vec::new(),
        };

        Self::sort_events(&mut events);
        Ok(events)
    }

    /// Category is the routing key: raw ids can collide across the backing
    /// stores, so the delete goes only to the store owning the category.
    pub async fn delete_event(
        &self,
        event_id: Uuid,
        category: CalendarCategory,
        auth_token: &str,
    ) -> Result<(), CalendarError> {
        debug!("Deleting {} event {}", category, event_id);

        match category {
            CalendarCategory::Appointment => {
                // Routed through the booking service so the linked slot is
                // released, same as a cancellation from the booking surface.
                self.booking_service
                    .cancel_appointment(event_id, auth_token)
                    .await
                    .map_err(CalendarError::from)?;
                Ok(())
            }
            CalendarCategory::Medication => self.medication_logs.delete(event_id, auth_token).await,
            CalendarCategory::Mood => self.moods.delete(event_id, auth_token).await,
            CalendarCategory::MenstrualCycle => {
                // Declared but unimplemented variant: fail loudly, a silent
                // no-op would be indistinguishable from a successful delete.
                warn!("Rejected delete of menstrual cycle event {}", event_id);
                Err(CalendarError::NotImplemented(CalendarCategory::MenstrualCycle))
            }
        }
    }

    /// Direct passthrough: only medication events carry this status
    /// vocabulary, so this is not generalized across categories.
    pub async fn update_medication_status(
        &self,
        log_id: Uuid,
        status: MedicationStatus,
        auth_token: &str,
    ) -> Result<MedicationLog, CalendarError> {
        self.medication_logs
            .update_status(log_id, status, auth_token)
            .await
    }

    fn project_all(
        appointments: &[scheduling_cell::models::Appointment],
        logs: &[MedicationLog],
        moods: &[Mood],
    ) -> Vec<MasterCalendarEvent> {
        let mut events = Vec::with_capacity(appointments.len() + logs.len() + moods.len());
        events.extend(appointments.iter().map(MasterCalendarEvent::from_appointment));
        events.extend(logs.iter().map(MasterCalendarEvent::from_medication_log));
        events.extend(moods.iter().map(MasterCalendarEvent::from_mood));
        events
    }

    fn sort_events(events: &mut [MasterCalendarEvent]) {
        events.sort_by(|a, b| {
            a.event_time
                .cmp(&b.event_time)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });
    }
}
