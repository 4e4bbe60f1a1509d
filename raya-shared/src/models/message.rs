use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    System,
    Email,
}

/// An inbox entry for one customer. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(user_id: Uuid, subject: String, body: String, kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            subject,
            body,
            timestamp: Utc::now(),
            is_read: false,
            kind,
        }
    }
}
