use std::sync::Arc;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use raya_core::repository::{BookingRepository, SettingsRepository, StoreError};
use raya_shared::{Booking, StudioSettings};

/// One bookable interval for a concept on a date. Ephemeral: recomputed on
/// every query, never persisted. The id is reconstructible from
/// (concept, date, start), so repeated generation yields identical ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub start_time: String,
    /// HH:MM, always `start + session_duration`
    pub end_time: String,
    pub is_booked: bool,
}

/// Derive the day's slot sequence from the operating hours. The cursor
/// starts at opening and advances by `session + buffer`; a final slot that
/// would overrun closing is discarded, not truncated. Degenerate settings
/// (non-positive session, opening at or past closing, unparseable times)
/// yield an empty sequence.
pub fn build_slots(
    date: &str,
    concept_id: &str,
    settings: &StudioSettings,
    existing: &[Booking],
) -> Vec<TimeSlot> {
    let (Some(opening), Some(closing)) = (
        parse_minutes(&settings.opening_time),
        parse_minutes(&settings.closing_time),
    ) else {
        return Vec::new();
    };
    if settings.session_duration <= 0 || opening >= closing {
        return Vec::new();
    }
    let buffer = settings.buffer_duration.max(0);

    let mut slots = Vec::new();
    let mut cursor = opening;
    loop {
        // Checked arithmetic: absurd admin-supplied durations terminate
        // the sequence instead of overflowing.
        let Some(slot_end) = cursor.checked_add(settings.session_duration) else {
            break;
        };
        if slot_end > closing {
            break;
        }
        let start = format_minutes(cursor);
        let end = format_minutes(slot_end);
        let is_booked = existing
            .iter()
            .any(|b| b.date == date && b.concept_id == concept_id && b.time == start);
        slots.push(TimeSlot {
            id: format!("{concept_id}-{date}-{start}"),
            date: date.to_string(),
            start_time: start,
            end_time: end,
            is_booked,
        });
        match slot_end.checked_add(buffer) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    slots
}

fn parse_minutes(hhmm: &str) -> Option<i64> {
    let t = NaiveTime::parse_from_str(hhmm, "%H:%M").ok()?;
    Some(i64::from(t.hour()) * 60 + i64::from(t.minute()))
}

fn format_minutes(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Reads settings and existing bookings through the injected repositories
/// and derives the bookable slots. Read-only; no side effects.
#[derive(Clone)]
pub struct SlotGenerator {
    bookings: Arc<dyn BookingRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl SlotGenerator {
    pub fn new(bookings: Arc<dyn BookingRepository>, settings: Arc<dyn SettingsRepository>) -> Self {
        Self { bookings, settings }
    }

    pub async fn generate(&self, date: &str, concept_id: &str) -> Result<Vec<TimeSlot>, StoreError> {
        let settings = self.settings.studio_settings().await?;
        let existing = self
            .bookings
            .list_by_date_and_concept(date, concept_id)
            .await?;
        Ok(build_slots(date, concept_id, &settings, &existing))
    }
}
