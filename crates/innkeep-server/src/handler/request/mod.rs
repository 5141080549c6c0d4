//! Request types for HTTP handlers.

mod authentications;
mod hotel_platforms;
mod paths;

pub use authentications::*;
pub use hotel_platforms::*;
pub use paths::*;
