use async_trait::async_trait;
use uuid::Uuid;

use raya_shared::{Booking, Message, Promo, StudioSettings, User};

/// Persistence failures. `NotFound`, `DuplicateId` and `VersionConflict`
/// indicate caller-sequencing bugs and propagate; the rest are structural
/// failures of the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("stale write for {id}: stored version {stored}, caller had {caller}")]
    VersionConflict { id: String, stored: u64, caller: u64 },

    #[error("corrupted collection {0}")]
    Corrupted(String),

    #[error("storage I/O failed")]
    Io(#[from] std::io::Error),

    #[error("storage encoding failed")]
    Serde(#[from] serde_json::Error),
}

/// Source of truth for bookings. Mutations broadcast the matching
/// `StudioEvent` on success; readers never mutate.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking. Fails with `DuplicateId` on id collision.
    async fn append(&self, booking: &Booking) -> Result<(), StoreError>;

    /// Whole-record replace. The caller supplies the full record built from
    /// a prior read; the write is rejected with `VersionConflict` unless the
    /// caller's version matches the stored one. Returns the stored record
    /// with its version bumped.
    async fn update(&self, booking: &Booking) -> Result<Booking, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Booking>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Booking>, StoreError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError>;

    async fn list_by_date_and_concept(
        &self,
        date: &str,
        concept_id: &str,
    ) -> Result<Vec<Booking>, StoreError>;
}

/// Append-only customer inbox.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: &Message) -> Result<(), StoreError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Message>, StoreError>;

    async fn mark_read(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Read-only promo collection.
#[async_trait]
pub trait PromoRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Promo>, StoreError>;
}

/// Singleton operating-hours record. A missing record yields the studio
/// defaults rather than an error.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn studio_settings(&self) -> Result<StudioSettings, StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError>;

    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}
