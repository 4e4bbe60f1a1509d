pub mod booking;
pub mod events;
pub mod message;
pub mod promo;
pub mod settings;
pub mod user;
