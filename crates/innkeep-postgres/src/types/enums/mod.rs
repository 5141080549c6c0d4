//! Enumerations backed by PostgreSQL enum types.

mod platform_type;

pub use platform_type::PlatformType;
