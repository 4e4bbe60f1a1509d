use serde::{Deserialize, Serialize};

/// Singleton operating-hours configuration. Written by the admin surface,
/// read by every slot computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudioSettings {
    /// Minutes per session.
    pub session_duration: i64,
    /// Minutes of turnaround between sessions.
    pub buffer_duration: i64,
    /// HH:MM
    pub opening_time: String,
    /// HH:MM
    pub closing_time: String,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            session_duration: 20,
            buffer_duration: 10,
            opening_time: "10:00".to_string(),
            closing_time: "18:00".to_string(),
        }
    }
}
