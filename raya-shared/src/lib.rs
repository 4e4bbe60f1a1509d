pub mod models;

pub use models::booking::{Booking, BookingStatus, PaymentMethod, PaymentStatus};
pub use models::events::StudioEvent;
pub use models::message::{Message, MessageKind};
pub use models::promo::{DiscountType, Promo};
pub use models::settings::StudioSettings;
pub use models::user::{User, UserRole};
