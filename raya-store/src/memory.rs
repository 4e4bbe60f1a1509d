use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use raya_core::repository::{
    BookingRepository, MessageRepository, PromoRepository, SettingsRepository, StoreError,
    UserRepository,
};
use raya_core::NotificationBus;
use raya_shared::{Booking, Message, Promo, StudioEvent, StudioSettings, User};

/// The five logical collections of one studio profile.
#[derive(Debug, Default, Clone)]
pub(crate) struct Collections {
    pub users: Vec<User>,
    pub bookings: Vec<Booking>,
    pub promos: Vec<Promo>,
    pub messages: Vec<Message>,
    pub settings: Option<StudioSettings>,
}

impl Collections {
    pub(crate) fn append_booking(&mut self, booking: &Booking) -> Result<(), StoreError> {
        if self.bookings.iter().any(|b| b.id == booking.id) {
            return Err(StoreError::DuplicateId(booking.id.clone()));
        }
        self.bookings.push(booking.clone());
        Ok(())
    }

    /// Replace the stored record, enforcing the optimistic-lock stamp.
    pub(crate) fn update_booking(&mut self, booking: &Booking) -> Result<Booking, StoreError> {
        let stored = self
            .bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or_else(|| StoreError::NotFound(booking.id.clone()))?;
        if stored.version != booking.version {
            return Err(StoreError::VersionConflict {
                id: booking.id.clone(),
                stored: stored.version,
                caller: booking.version,
            });
        }
        let mut next = booking.clone();
        next.version += 1;
        *stored = next.clone();
        Ok(next)
    }

    pub(crate) fn save_user(&mut self, user: &User) -> Result<(), StoreError> {
        if self.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::DuplicateId(user.id.to_string()));
        }
        self.users.push(user.clone());
        Ok(())
    }

    pub(crate) fn mark_message_read(&mut self, id: Uuid) -> Result<(), StoreError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        message.is_read = true;
        Ok(())
    }
}

/// In-memory store for one profile. Mutations broadcast on the injected
/// bus after the write lock is released; an optional artificial latency is
/// applied ahead of every operation for UX parity with the real backend.
pub struct MemoryStore {
    inner: RwLock<Collections>,
    bus: NotificationBus,
    latency: Duration,
}

impl MemoryStore {
    pub fn new(bus: NotificationBus) -> Self {
        Self::with_latency(bus, Duration::ZERO)
    }

    pub fn with_latency(bus: NotificationBus, latency: Duration) -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
            bus,
            latency,
        }
    }

    /// Seed the read-only promo collection (admin surface stand-in).
    pub async fn insert_promo(&self, promo: Promo) {
        self.inner.write().await.promos.push(promo);
    }

    /// Install the operating-hours singleton (admin surface stand-in).
    pub async fn set_settings(&self, settings: StudioSettings) {
        self.inner.write().await.settings = Some(settings);
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn append(&self, booking: &Booking) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.inner.write().await.append_booking(booking)?;
        tracing::info!(booking_id = %booking.id, "booking appended");
        self.bus.publish(StudioEvent::NewBooking(booking.clone()));
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, StoreError> {
        self.simulate_latency().await;
        let stored = self.inner.write().await.update_booking(booking)?;
        tracing::info!(booking_id = %stored.id, version = stored.version, "booking updated");
        self.bus.publish(StudioEvent::StatusUpdate(stored.clone()));
        Ok(stored)
    }

    async fn get(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        self.simulate_latency().await;
        Ok(self
            .inner
            .read()
            .await
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        self.simulate_latency().await;
        Ok(self.inner.read().await.bookings.clone())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        self.simulate_latency().await;
        Ok(self
            .inner
            .read()
            .await
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_date_and_concept(
        &self,
        date: &str,
        concept_id: &str,
    ) -> Result<Vec<Booking>, StoreError> {
        self.simulate_latency().await;
        Ok(self
            .inner
            .read()
            .await
            .bookings
            .iter()
            .filter(|b| b.date == date && b.concept_id == concept_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.inner.write().await.messages.push(message.clone());
        self.bus.publish(StudioEvent::NewMessage(message.clone()));
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Message>, StoreError> {
        self.simulate_latency().await;
        Ok(self
            .inner
            .read()
            .await
            .messages
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.inner.write().await.mark_message_read(id)
    }
}

#[async_trait]
impl PromoRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Promo>, StoreError> {
        self.simulate_latency().await;
        Ok(self.inner.read().await.promos.clone())
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn studio_settings(&self) -> Result<StudioSettings, StoreError> {
        self.simulate_latency().await;
        Ok(self
            .inner
            .read()
            .await
            .settings
            .clone()
            .unwrap_or_default())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.inner.write().await.save_user(user)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        self.simulate_latency().await;
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        self.simulate_latency().await;
        Ok(self.inner.read().await.users.clone())
    }
}
