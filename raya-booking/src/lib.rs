pub mod greeting;
pub mod lifecycle;
pub mod promo;
pub mod slots;

pub use greeting::{FallbackDrafter, GenAiDrafter};
pub use lifecycle::{BookingLifecycle, BookingRequest, LifecycleError};
pub use promo::PromoValidator;
pub use slots::{SlotGenerator, TimeSlot};
