pub mod bus;
pub mod drafter;
pub mod repository;

pub use bus::NotificationBus;
pub use drafter::{DrafterError, MessageDrafter};
pub use repository::{
    BookingRepository, MessageRepository, PromoRepository, SettingsRepository, StoreError,
    UserRepository,
};
