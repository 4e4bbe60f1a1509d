use serde::{Deserialize, Serialize};

use super::booking::Booking;
use super::message::Message;

/// Cross-view mutation broadcast. Tag names match the persisted wire
/// format of the channel (`NEW_BOOKING` etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudioEvent {
    NewBooking(Booking),
    StatusUpdate(Booking),
    NewMessage(Message),
}

impl StudioEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StudioEvent::NewBooking(_) => "NEW_BOOKING",
            StudioEvent::StatusUpdate(_) => "STATUS_UPDATE",
            StudioEvent::NewMessage(_) => "NEW_MESSAGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_event_tag_names() {
        let booking = Booking::new(
            Uuid::new_v4(),
            "Aisyah".to_string(),
            "0123456789".to_string(),
            "muji".to_string(),
            "2026-03-21".to_string(),
            "10:00".to_string(),
            15000,
        );
        let json = serde_json::to_value(StudioEvent::NewBooking(booking)).unwrap();
        assert_eq!(json["type"], "NEW_BOOKING");
        assert!(json["payload"]["id"].as_str().unwrap().starts_with("RAYA-"));
    }
}
