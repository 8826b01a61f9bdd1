// libs/calendar-cell/src/store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{CalendarError, MedicationLog, MedicationStatus, Mood};

#[async_trait]
pub trait MedicationLogStore: Send + Sync {
    async fn get_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<MedicationLog>, CalendarError>;

    /// Logs with `medication_time` in `[from, to)`, ordered ascending.
    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<MedicationLog>, CalendarError>;

    async fn update_status(
        &self,
        log_id: Uuid,
        status: MedicationStatus,
        auth_token: &str,
    ) -> Result<MedicationLog, CalendarError>;

    async fn delete(&self, log_id: Uuid, auth_token: &str) -> Result<(), CalendarError>;
}

#[async_trait]
pub trait MoodStore: Send + Sync {
    async fn get_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Mood>, CalendarError>;

    /// Moods with `timestamp` in `[from, to)`, ordered ascending.
    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<Mood>, CalendarError>;

    async fn delete(&self, mood_id: Uuid, auth_token: &str) -> Result<(), CalendarError>;
}

// ==============================================================================
// POSTGREST IMPLEMENTATIONS
// ==============================================================================

pub struct SupabaseMedicationLogStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseMedicationLogStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl MedicationLogStore for SupabaseMedicationLogStore {
    async fn get_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<MedicationLog>, CalendarError> {
        let path = format!(
            "/rest/v1/medication_logs?user_id=eq.{}&order=medication_time.asc",
            user_id
        );
        let result: Vec<MedicationLog> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CalendarError::Storage(e.to_string()))?;

        Ok(result)
    }

    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<MedicationLog>, CalendarError> {
        let from_enc = urlencoding::encode(&from.to_rfc3339()).into_owned();
        let to_enc = urlencoding::encode(&to.to_rfc3339()).into_owned();
        let path = format!(
            "/rest/v1/medication_logs?user_id=eq.{}&medication_time=gte.{}&medication_time=lt.{}&order=medication_time.asc",
            user_id, from_enc, to_enc
        );
        let result: Vec<MedicationLog> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CalendarError::Storage(e.to_string()))?;

        Ok(result)
    }

    async fn update_status(
        &self,
        log_id: Uuid,
        status: MedicationStatus,
        auth_token: &str,
    ) -> Result<MedicationLog, CalendarError> {
        debug!("Updating medication log {} status to {}", log_id, status);

        let path = format!("/rest/v1/medication_logs?id=eq.{}", log_id);
        let update = json!({
            "status": status,
            "updated_at": Utc::now().to_rfc3339()
        });
        let result: Vec<MedicationLog> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(update),
                Some(return_representation()),
            )
            .await
            .map_err(|e| CalendarError::Storage(e.to_string()))?;

        result.into_iter().next().ok_or(CalendarError::NotFound)
    }

    async fn delete(&self, log_id: Uuid, auth_token: &str) -> Result<(), CalendarError> {
        let path = format!("/rest/v1/medication_logs?id=eq.{}", log_id);
        let result: Vec<MedicationLog> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                Some(auth_token),
                None,
                Some(return_representation()),
            )
            .await
            .map_err(|e| CalendarError::Storage(e.to_string()))?;

        if result.is_empty() {
            return Err(CalendarError::NotFound);
        }

        Ok(())
    }
}

pub struct SupabaseMoodStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseMoodStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl MoodStore for SupabaseMoodStore {
    async fn get_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Mood>, CalendarError> {
        let path = format!("/rest/v1/moods?user_id=eq.{}&order=timestamp.asc", user_id);
        let result: Vec<Mood> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CalendarError::Storage(e.to_string()))?;

        Ok(result)
    }

    async fn get_for_user_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<Mood>, CalendarError> {
        let from_enc = urlencoding::encode(&from.to_rfc3339()).into_owned();
        let to_enc = urlencoding::encode(&to.to_rfc3339()).into_owned();
        let path = format!(
            "/rest/v1/moods?user_id=eq.{}&timestamp=gte.{}&timestamp=lt.{}&order=timestamp.asc",
            user_id, from_enc, to_enc
        );
        let result: Vec<Mood> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CalendarError::Storage(e.to_string()))?;

        Ok(result)
    }

    async fn delete(&self, mood_id: Uuid, auth_token: &str) -> Result<(), CalendarError> {
        let path = format!("/rest/v1/moods?id=eq.{}", mood_id);
        let result: Vec<Mood> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                Some(auth_token),
                None,
                Some(return_representation()),
            )
            .await
            .map_err(|e| CalendarError::Storage(e.to_string()))?;

        if result.is_empty() {
            return Err(CalendarError::NotFound);
        }

        Ok(())
    }
}
