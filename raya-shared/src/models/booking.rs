use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fulfillment stage of a booking. Only advances once payment is settled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Arrived,
    PhotoshootDone,
    Editing,
    Completed,
}

impl BookingStatus {
    /// Next fulfillment stage, or `None` once the booking is completed.
    pub fn next(self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Confirmed => Some(BookingStatus::Arrived),
            BookingStatus::Arrived => Some(BookingStatus::PhotoshootDone),
            BookingStatus::PhotoshootDone => Some(BookingStatus::Editing),
            BookingStatus::Editing => Some(BookingStatus::Completed),
            BookingStatus::Completed => None,
        }
    }
}

/// Payment stage of a booking, tracked independently of fulfillment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    AwaitingVerification,
    Paid,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Qr,
    OnlineGateway,
}

/// A reserved studio session. Created once at submission, mutated in place
/// by status transitions, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_phone: String,
    pub concept_id: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM slot start
    pub time: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    /// Post-discount price in sen.
    pub price_cents: i64,
    pub receipt_base64: Option<String>,
    pub transaction_id: Option<String>,
    /// Optimistic-lock stamp: bumped by the store on every accepted update.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        user_id: Uuid,
        user_name: String,
        user_phone: String,
        concept_id: String,
        date: String,
        time: String,
        price_cents: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_reference(),
            user_id,
            user_name,
            user_phone,
            concept_id,
            date,
            time,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            price_cents,
            receipt_base64: None,
            transaction_id: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Advance fulfillment to the given stage.
    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn set_payment_status(&mut self, payment_status: PaymentStatus) {
        self.payment_status = payment_status;
        self.updated_at = Utc::now();
    }
}

/// Creation-ordered booking reference: `RAYA-{unix_millis}-{SHORT}`.
fn generate_reference() -> String {
    let millis = Utc::now().timestamp_millis();
    let short = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("RAYA-{}-{}", millis, short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fulfillment_chain() {
        let mut status = BookingStatus::Confirmed;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            status = next;
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                BookingStatus::Confirmed,
                BookingStatus::Arrived,
                BookingStatus::PhotoshootDone,
                BookingStatus::Editing,
                BookingStatus::Completed,
            ]
        );
        assert!(BookingStatus::Completed.next().is_none());
    }

    #[test]
    fn test_reference_format() {
        let booking = Booking::new(
            Uuid::new_v4(),
            "Aisyah".to_string(),
            "0123456789".to_string(),
            "muji".to_string(),
            "2026-03-21".to_string(),
            "10:00".to_string(),
            15000,
        );
        assert!(booking.id.starts_with("RAYA-"));
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.version, 0);
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&BookingStatus::PhotoshootDone).unwrap();
        assert_eq!(json, "\"photoshoot_done\"");
        let json = serde_json::to_string(&PaymentStatus::AwaitingVerification).unwrap();
        assert_eq!(json, "\"awaiting_verification\"");
        let json = serde_json::to_string(&PaymentMethod::OnlineGateway).unwrap();
        assert_eq!(json, "\"online_gateway\"");
    }
}
