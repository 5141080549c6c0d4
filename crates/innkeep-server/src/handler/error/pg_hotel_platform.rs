//! Hotel platform constraint violation error handlers.

use innkeep_postgres::types::HotelPlatformConstraints;

use crate::handler::{Error, ErrorKind};

impl From<HotelPlatformConstraints> for Error<'static> {
    fn from(c: HotelPlatformConstraints) -> Self {
        let error = match c {
            HotelPlatformConstraints::UniqueUserPlatform => ErrorKind::BadRequest
                .with_message("Platform is already registered, use PUT to modify it"),
            HotelPlatformConstraints::UserForeignKey => {
                ErrorKind::NotFound.with_message("User not found")
            }
            HotelPlatformConstraints::UpdatedAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("hotel_platform")
    }
}
