//! Diesel models for the `users` and `hotel_platforms` tables.

mod hotel_platform;
mod user;

pub use hotel_platform::{HotelPlatform, NewHotelPlatform, UpdateHotelPlatform};
pub use user::{NewUser, USERNAME_MAX_LENGTH, User};
