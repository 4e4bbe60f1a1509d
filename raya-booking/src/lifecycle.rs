use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use raya_core::drafter::MessageDrafter;
use raya_core::repository::{BookingRepository, MessageRepository, StoreError};
use raya_shared::{Booking, Message, MessageKind, PaymentMethod, PaymentStatus, Promo};

use crate::greeting::fallback_confirmation;
use crate::slots::SlotGenerator;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("booking not found: {0}")]
    NotFound(String),

    #[error("no bookable slot at {time} on {date} for {concept_id}")]
    UnknownSlot {
        concept_id: String,
        date: String,
        time: String,
    },

    #[error("slot {time} on {date} for {concept_id} is already taken")]
    SlotUnavailable {
        concept_id: String,
        date: String,
        time: String,
    },

    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("booking {0} is already paid")]
    AlreadyPaid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Submission payload for a new booking. The promo, if any, has already
/// been validated against the code and concept.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_phone: String,
    pub concept_id: String,
    pub date: String,
    pub time: String,
    /// Concept list price in sen, before any discount.
    pub price_cents: i64,
    pub promo: Option<Promo>,
    /// Manual-transfer evidence; its presence moves the payment straight
    /// to verification.
    pub receipt_base64: Option<String>,
}

/// Orchestrates booking state transitions. Payment and fulfillment are
/// independent axes; fulfillment only advances once payment settles, one
/// stage at a time, never backwards.
pub struct BookingLifecycle {
    bookings: Arc<dyn BookingRepository>,
    messages: Arc<dyn MessageRepository>,
    drafter: Arc<dyn MessageDrafter>,
    slots: SlotGenerator,
    drafter_timeout: Duration,
}

impl BookingLifecycle {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        messages: Arc<dyn MessageRepository>,
        drafter: Arc<dyn MessageDrafter>,
        slots: SlotGenerator,
        drafter_timeout: Duration,
    ) -> Self {
        Self {
            bookings,
            messages,
            drafter,
            slots,
            drafter_timeout,
        }
    }

    /// Reserve a slot. The day's slots are regenerated from the store, so
    /// a slot taken since the customer last looked is rejected here.
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking, LifecycleError> {
        let day = self
            .slots
            .generate(&request.date, &request.concept_id)
            .await?;
        let slot = day
            .iter()
            .find(|s| s.start_time == request.time)
            .ok_or_else(|| LifecycleError::UnknownSlot {
                concept_id: request.concept_id.clone(),
                date: request.date.clone(),
                time: request.time.clone(),
            })?;
        if slot.is_booked {
            return Err(LifecycleError::SlotUnavailable {
                concept_id: request.concept_id.clone(),
                date: request.date.clone(),
                time: request.time.clone(),
            });
        }

        let price = match &request.promo {
            Some(promo) => promo.apply(request.price_cents),
            None => request.price_cents,
        };
        let mut booking = Booking::new(
            request.user_id,
            request.user_name,
            request.user_phone,
            request.concept_id,
            request.date,
            request.time,
            price,
        );
        if let Some(receipt) = request.receipt_base64 {
            booking.receipt_base64 = Some(receipt);
            booking.payment_status = PaymentStatus::AwaitingVerification;
        }

        self.bookings.append(&booking).await?;
        tracing::info!(
            booking_id = %booking.id,
            concept = %booking.concept_id,
            date = %booking.date,
            time = %booking.time,
            "booking created"
        );
        Ok(booking)
    }

    /// Attach transfer evidence to a pending booking and queue it for
    /// staff verification.
    pub async fn submit_receipt(
        &self,
        id: &str,
        receipt_base64: String,
    ) -> Result<Booking, LifecycleError> {
        let mut booking = self.load(id).await?;
        if booking.payment_status != PaymentStatus::Pending {
            return Err(invalid_payment_transition(&booking, "awaiting_verification"));
        }
        booking.receipt_base64 = Some(receipt_base64);
        booking.set_payment_status(PaymentStatus::AwaitingVerification);
        Ok(self.bookings.update(&booking).await?)
    }

    /// Settle payment. Drafts the confirmation message (bounded by the
    /// configured timeout, with the fixed fallback text on any failure) and
    /// appends it BEFORE persisting the paid record, so no subscriber
    /// observes the paid status without the message.
    pub async fn confirm_payment(
        &self,
        id: &str,
        method: PaymentMethod,
        transaction_id: Option<String>,
    ) -> Result<Booking, LifecycleError> {
        let mut booking = self.load(id).await?;
        match booking.payment_status {
            PaymentStatus::Paid => return Err(LifecycleError::AlreadyPaid(booking.id)),
            PaymentStatus::Failed => {
                return Err(invalid_payment_transition(&booking, "paid"));
            }
            PaymentStatus::Pending | PaymentStatus::AwaitingVerification => {}
        }

        booking.set_payment_status(PaymentStatus::Paid);
        booking.payment_method = Some(method);
        if transaction_id.is_some() {
            booking.transaction_id = transaction_id;
        }

        let body = self.draft_confirmation(&booking).await;
        let message = Message::new(
            booking.user_id,
            "Pengesahan Pembayaran".to_string(),
            body,
            MessageKind::Email,
        );
        self.messages.append(&message).await?;

        let stored = self.bookings.update(&booking).await?;
        tracing::info!(booking_id = %stored.id, ?method, "payment confirmed");
        Ok(stored)
    }

    /// Staff rejects the submitted evidence. Terminal for this attempt.
    pub async fn reject_payment(&self, id: &str) -> Result<Booking, LifecycleError> {
        let mut booking = self.load(id).await?;
        if booking.payment_status != PaymentStatus::AwaitingVerification {
            return Err(invalid_payment_transition(&booking, "failed"));
        }
        booking.set_payment_status(PaymentStatus::Failed);
        let stored = self.bookings.update(&booking).await?;
        tracing::info!(booking_id = %stored.id, "payment rejected");
        Ok(stored)
    }

    /// Move fulfillment one stage forward. Requires settled payment; no
    /// stage may be skipped and `completed` is terminal.
    pub async fn advance_fulfillment(&self, id: &str) -> Result<Booking, LifecycleError> {
        let mut booking = self.load(id).await?;
        if booking.payment_status != PaymentStatus::Paid {
            return Err(invalid_payment_transition(&booking, "fulfillment"));
        }
        let next = booking
            .status
            .next()
            .ok_or_else(|| LifecycleError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "beyond Completed".to_string(),
            })?;
        booking.set_status(next);
        let stored = self.bookings.update(&booking).await?;
        tracing::info!(booking_id = %stored.id, status = ?stored.status, "fulfillment advanced");
        Ok(stored)
    }

    async fn load(&self, id: &str) -> Result<Booking, LifecycleError> {
        self.bookings
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(id.to_string()))
    }

    /// Bounded collaborator call. Any failure mode (error, timeout, empty
    /// text) substitutes the fixed fallback and never fails the caller.
    async fn draft_confirmation(&self, booking: &Booking) -> String {
        let draft = self
            .drafter
            .draft_confirmation(&booking.user_name, &booking.id);
        match tokio::time::timeout(self.drafter_timeout, draft).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                tracing::warn!(booking_id = %booking.id, "drafter returned empty text, using fallback");
                fallback_confirmation(&booking.id)
            }
            Ok(Err(e)) => {
                tracing::warn!(booking_id = %booking.id, error = %e, "drafter failed, using fallback");
                fallback_confirmation(&booking.id)
            }
            Err(_) => {
                tracing::warn!(booking_id = %booking.id, "drafter timed out, using fallback");
                fallback_confirmation(&booking.id)
            }
        }
    }
}

fn invalid_payment_transition(booking: &Booking, to: &str) -> LifecycleError {
    LifecycleError::InvalidTransition {
        from: format!("{:?}", booking.payment_status),
        to: to.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use raya_core::drafter::DrafterError;
    use raya_core::NotificationBus;
    use raya_shared::{BookingStatus, DiscountType};
    use raya_store::MemoryStore;

    struct FixedDrafter;

    #[async_trait]
    impl MessageDrafter for FixedDrafter {
        async fn draft_confirmation(
            &self,
            user_name: &str,
            booking_ref: &str,
        ) -> Result<String, DrafterError> {
            Ok(format!("Tahniah {user_name}, tempahan {booking_ref} disahkan."))
        }

        async fn draft_greeting(&self, user_name: &str) -> Result<String, DrafterError> {
            Ok(format!("Selamat Hari Raya, {user_name}!"))
        }
    }

    struct FailingDrafter;

    #[async_trait]
    impl MessageDrafter for FailingDrafter {
        async fn draft_confirmation(&self, _: &str, _: &str) -> Result<String, DrafterError> {
            Err(DrafterError::Unavailable("quota exhausted".into()))
        }

        async fn draft_greeting(&self, _: &str) -> Result<String, DrafterError> {
            Err(DrafterError::Unavailable("quota exhausted".into()))
        }
    }

    struct StalledDrafter;

    #[async_trait]
    impl MessageDrafter for StalledDrafter {
        async fn draft_confirmation(&self, _: &str, _: &str) -> Result<String, DrafterError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }

        async fn draft_greeting(&self, _: &str) -> Result<String, DrafterError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    fn lifecycle_with(drafter: Arc<dyn MessageDrafter>) -> (BookingLifecycle, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new(NotificationBus::default()));
        let slots = SlotGenerator::new(store.clone(), store.clone());
        let lifecycle = BookingLifecycle::new(
            store.clone(),
            store.clone(),
            drafter,
            slots,
            Duration::from_millis(100),
        );
        (lifecycle, store)
    }

    fn request(time: &str) -> BookingRequest {
        BookingRequest {
            user_id: Uuid::new_v4(),
            user_name: "Aisyah".to_string(),
            user_phone: "0123456789".to_string(),
            concept_id: "muji".to_string(),
            date: "2026-03-21".to_string(),
            time: time.to_string(),
            price_cents: 15000,
            promo: None,
            receipt_base64: None,
        }
    }

    #[tokio::test]
    async fn test_confirm_payment_appends_message_and_persists() {
        let (lifecycle, store) = lifecycle_with(Arc::new(FixedDrafter));
        let booking = lifecycle.create_booking(request("10:00")).await.unwrap();

        let paid = lifecycle
            .confirm_payment(&booking.id, PaymentMethod::OnlineGateway, Some("TXN-1".into()))
            .await
            .unwrap();

        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_method, Some(PaymentMethod::OnlineGateway));
        assert_eq!(paid.transaction_id.as_deref(), Some("TXN-1"));
        assert_eq!(paid.version, 1);

        let inbox = MessageRepository::list_by_user(store.as_ref(), booking.user_id)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, MessageKind::Email);
        assert!(inbox[0].body.contains(&booking.id));
    }

    #[tokio::test]
    async fn test_failing_drafter_still_confirms_with_fallback() {
        let (lifecycle, store) = lifecycle_with(Arc::new(FailingDrafter));
        let booking = lifecycle.create_booking(request("10:00")).await.unwrap();

        let paid = lifecycle
            .confirm_payment(&booking.id, PaymentMethod::Transfer, None)
            .await
            .unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);

        let inbox = MessageRepository::list_by_user(store.as_ref(), booking.user_id)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].body, fallback_confirmation(&booking.id));
    }

    #[tokio::test]
    async fn test_stalled_drafter_hits_timeout_fallback() {
        let (lifecycle, store) = lifecycle_with(Arc::new(StalledDrafter));
        let booking = lifecycle.create_booking(request("10:00")).await.unwrap();

        let paid = lifecycle
            .confirm_payment(&booking.id, PaymentMethod::Qr, None)
            .await
            .unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);

        let inbox = MessageRepository::list_by_user(store.as_ref(), booking.user_id)
            .await
            .unwrap();
        assert_eq!(inbox[0].body, fallback_confirmation(&booking.id));
    }

    #[tokio::test]
    async fn test_confirming_twice_is_rejected() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        let booking = lifecycle.create_booking(request("10:00")).await.unwrap();

        lifecycle
            .confirm_payment(&booking.id, PaymentMethod::Cash, None)
            .await
            .unwrap();
        let err = lifecycle
            .confirm_payment(&booking.id, PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyPaid(_)));
    }

    #[tokio::test]
    async fn test_receipt_then_reject_is_terminal() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        let booking = lifecycle.create_booking(request("10:00")).await.unwrap();

        let awaiting = lifecycle
            .submit_receipt(&booking.id, "ZGF0YQ==".to_string())
            .await
            .unwrap();
        assert_eq!(awaiting.payment_status, PaymentStatus::AwaitingVerification);

        let rejected = lifecycle.reject_payment(&booking.id).await.unwrap();
        assert_eq!(rejected.payment_status, PaymentStatus::Failed);

        let err = lifecycle
            .confirm_payment(&booking.id, PaymentMethod::Transfer, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_reject_requires_pending_verification() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        let booking = lifecycle.create_booking(request("10:00")).await.unwrap();

        let err = lifecycle.reject_payment(&booking.id).await.unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_fulfillment_advances_one_stage_at_a_time() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        let booking = lifecycle.create_booking(request("10:00")).await.unwrap();

        // Unpaid bookings cannot advance.
        let err = lifecycle.advance_fulfillment(&booking.id).await.unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));

        lifecycle
            .confirm_payment(&booking.id, PaymentMethod::OnlineGateway, None)
            .await
            .unwrap();

        let expected = [
            BookingStatus::Arrived,
            BookingStatus::PhotoshootDone,
            BookingStatus::Editing,
            BookingStatus::Completed,
        ];
        for stage in expected {
            let advanced = lifecycle.advance_fulfillment(&booking.id).await.unwrap();
            assert_eq!(advanced.status, stage);
        }

        // Completed is terminal.
        let err = lifecycle.advance_fulfillment(&booking.id).await.unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_taken_slot_is_rejected() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        lifecycle.create_booking(request("10:00")).await.unwrap();

        let err = lifecycle.create_booking(request("10:00")).await.unwrap_err();
        assert!(matches!(err, LifecycleError::SlotUnavailable { .. }));

        // A different slot on the same day is fine.
        lifecycle.create_booking(request("10:30")).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_slot_time_is_rejected() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        // 10:10 is mid-session under the default operating hours.
        let err = lifecycle.create_booking(request("10:10")).await.unwrap_err();
        assert!(matches!(err, LifecycleError::UnknownSlot { .. }));
    }

    #[tokio::test]
    async fn test_promo_discount_applies_to_price() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        let mut req = request("10:00");
        req.promo = Some(Promo {
            id: Uuid::new_v4(),
            code: "SAVE20".to_string(),
            title: "Raya saver".to_string(),
            description: String::new(),
            discount_type: DiscountType::Percentage,
            discount_value: 20,
            expiry_date: chrono::Utc::now() + chrono::Duration::days(7),
            is_active: true,
            package_id: None,
        });

        let booking = lifecycle.create_booking(req).await.unwrap();
        assert_eq!(booking.price_cents, 12000);
    }

    #[tokio::test]
    async fn test_receipt_at_creation_starts_verification() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        let mut req = request("10:00");
        req.receipt_base64 = Some("ZGF0YQ==".to_string());

        let booking = lifecycle.create_booking(req).await.unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::AwaitingVerification);
    }

    #[tokio::test]
    async fn test_confirm_unknown_booking_is_not_found() {
        let (lifecycle, _) = lifecycle_with(Arc::new(FixedDrafter));
        let err = lifecycle
            .confirm_payment("RAYA-0-MISSING", PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::NotFound(_)));
    }
}
