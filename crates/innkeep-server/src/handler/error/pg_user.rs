//! User constraint violation error handlers.

use innkeep_postgres::types::UserConstraints;

use crate::handler::{Error, ErrorKind};

impl From<UserConstraints> for Error<'static> {
    fn from(c: UserConstraints) -> Self {
        let error = match c {
            UserConstraints::EmailUnique => {
                ErrorKind::BadRequest.with_message("Email already registered")
            }
            // Only reachable when two signups race for the same derived name.
            UserConstraints::UsernameUnique => ErrorKind::BadRequest
                .with_message("Username was taken concurrently, please retry"),
            UserConstraints::EmailNotEmpty => {
                ErrorKind::BadRequest.with_message("Email cannot be empty")
            }
            UserConstraints::UsernameNotEmpty => {
                ErrorKind::BadRequest.with_message("Email must have a non-empty local part")
            }
        };

        error.with_resource("user")
    }
}
