//! Repository traits implemented for [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

mod hotel_platform;
mod user;

pub use hotel_platform::HotelPlatformRepository;
pub use user::UserRepository;
