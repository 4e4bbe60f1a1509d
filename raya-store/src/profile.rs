use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use raya_core::repository::{
    BookingRepository, MessageRepository, PromoRepository, SettingsRepository, StoreError,
    UserRepository,
};
use raya_core::NotificationBus;
use raya_shared::{Booking, Message, Promo, StudioEvent, StudioSettings, User};

use crate::memory::Collections;

const USERS_KEY: &str = "raya_studio_users";
const BOOKINGS_KEY: &str = "raya_studio_bookings";
const PROMOS_KEY: &str = "raya_studio_promos";
const MESSAGES_KEY: &str = "raya_studio_messages";
const SETTINGS_KEY: &str = "raya_studio_settings";

/// Profile-scoped persistent store: one JSON file per collection under a
/// fixed key name. Collections are fully loaded and validated at open;
/// every mutation flushes its collection to disk before the matching event
/// is broadcast, so a reader woken by the bus sees the new state.
#[derive(Debug)]
pub struct ProfileStore {
    dir: PathBuf,
    inner: RwLock<Collections>,
    bus: NotificationBus,
    latency: Duration,
}

impl ProfileStore {
    pub async fn open(dir: impl Into<PathBuf>, bus: NotificationBus) -> Result<Self, StoreError> {
        Self::open_with_latency(dir, bus, Duration::ZERO).await
    }

    pub async fn open_with_latency(
        dir: impl Into<PathBuf>,
        bus: NotificationBus,
        latency: Duration,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let collections = Collections {
            users: read_array(&dir, USERS_KEY).await?,
            bookings: read_array(&dir, BOOKINGS_KEY).await?,
            promos: read_array(&dir, PROMOS_KEY).await?,
            messages: read_array(&dir, MESSAGES_KEY).await?,
            settings: read_optional(&dir, SETTINGS_KEY).await?,
        };
        tracing::info!(
            dir = %dir.display(),
            bookings = collections.bookings.len(),
            "profile store opened"
        );

        Ok(Self {
            dir,
            inner: RwLock::new(collections),
            bus,
            latency,
        })
    }

    /// Install the operating-hours singleton and persist it.
    pub async fn set_settings(&self, settings: StudioSettings) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.settings = Some(settings);
        write_json(&self.dir, SETTINGS_KEY, &inner.settings).await
    }

    /// Seed the promo collection and persist it.
    pub async fn insert_promo(&self, promo: Promo) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.promos.push(promo);
        write_json(&self.dir, PROMOS_KEY, &inner.promos).await
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn collection_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

async fn read_array<T: DeserializeOwned>(dir: &Path, key: &str) -> Result<Vec<T>, StoreError> {
    let path = collection_path(dir, key);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = tokio::fs::read(&path).await?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupted(format!("{key}: {e}")))
}

async fn read_optional<T: DeserializeOwned>(
    dir: &Path,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let path = collection_path(dir, key);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = tokio::fs::read(&path).await?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupted(format!("{key}: {e}")))
}

async fn write_json<T: Serialize>(dir: &Path, key: &str, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(collection_path(dir, key), bytes).await?;
    Ok(())
}

#[async_trait]
impl BookingRepository for ProfileStore {
    async fn append(&self, booking: &Booking) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;
        inner.append_booking(booking)?;
        write_json(&self.dir, BOOKINGS_KEY, &inner.bookings).await?;
        drop(inner);
        tracing::info!(booking_id = %booking.id, "booking appended");
        self.bus.publish(StudioEvent::NewBooking(booking.clone()));
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, StoreError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;
        let stored = inner.update_booking(booking)?;
        write_json(&self.dir, BOOKINGS_KEY, &inner.bookings).await?;
        drop(inner);
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
impl MessageRepository for ProfileStore {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;
        inner.messages.push(message.clone());
        write_json(&self.dir, MESSAGES_KEY, &inner.messages).await?;
        drop(inner);
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
        let mut inner = self.inner.write().await;
        inner.mark_message_read(id)?;
        write_json(&self.dir, MESSAGES_KEY, &inner.messages).await
    }
}

#[async_trait]
impl PromoRepository for ProfileStore {
    async fn list_all(&self) -> Result<Vec<Promo>, StoreError> {
        self.simulate_latency().await;
        Ok(self.inner.read().await.promos.clone())
    }
}

#[async_trait]
impl SettingsRepository for ProfileStore {
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
impl UserRepository for ProfileStore {
    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;
        inner.save_user(user)?;
        write_json(&self.dir, USERS_KEY, &inner.users).await
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
