//! Response types for HTTP handlers.

mod authentications;
mod errors;
mod hotel_platforms;
mod messages;
mod platforms;
mod users;

pub use authentications::*;
pub use errors::*;
pub use hotel_platforms::*;
pub use messages::*;
pub use platforms::*;
pub use users::*;
