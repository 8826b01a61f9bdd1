// libs/calendar-cell/src/services/summary.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CalendarError, Mood, MoodSummary};
use crate::store::{MoodStore, SupabaseMoodStore};

pub struct MoodSummaryService {
    moods: Arc<dyn MoodStore>,
}

impl MoodSummaryService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        Self {
            moods: Arc::new(SupabaseMoodStore::new(supabase)),
        }
    }

    pub fn with_store(moods: Arc<dyn MoodStore>) -> Self {
        Self { moods }
    }

    pub async fn get_daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<MoodSummary>, CalendarError> {
        let from = day_start(date);
        let to = day_start(date.succ_opt().unwrap_or(date));
        debug!("Daily mood summary for user {} on {}", user_id, date);

        let moods = self
            .moods
            .get_for_user_in_range(user_id, from, to, auth_token)
            .await?;
        Ok(summarize(&moods))
    }

    pub async fn get_monthly_summary(
        &self,
        user_id: &str,
        month_start: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<MoodSummary>, CalendarError> {
        let first = month_start.with_day(1).unwrap_or(month_start);
        let next_month = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        }
        .unwrap_or(first);
        debug!(
            "Monthly mood summary for user {} starting {}",
            user_id, first
        );

        let moods = self
            .moods
            .get_for_user_in_range(user_id, day_start(first), day_start(next_month), auth_token)
            .await?;
        Ok(summarize(&moods))
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Group by mood type and compute each type's share of the window. An empty
/// window yields an empty list rather than dividing by zero.
pub fn summarize(moods: &[Mood]) -> Vec<MoodSummary> {
    if moods.is_empty() {
        return Vec::new();
    }

    let mut counts = HashMap::new();
    for mood in moods {
        *counts.entry(mood.mood_type).or_insert(0i64) += 1;
    }

    let total = moods.len() as f64;
    let mut summaries: Vec<MoodSummary> = counts
        .into_iter()
        .map(|(mood_type, count)| MoodSummary {
            mood_type,
            count,
            percentage: count as f64 / total * 100.0,
        })
        .collect();

    // Largest share first; label as tie-break so output is deterministic.
    summaries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.mood_type.label().cmp(b.mood_type.label()))
    });

    summaries
}
