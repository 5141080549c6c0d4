//! User model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;

/// Maximum length of `users.username`, in characters.
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Characters kept free after the base for a numeric de-duplication suffix.
const USERNAME_SUFFIX_RESERVE: usize = 10;

/// A registered user of the service.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique handle, derived from the email's local part at signup.
    pub username: String,
    /// Unique email address used to log in.
    pub email: String,
    /// Argon2 password hash in PHC string format.
    pub hashed_password: String,
    /// Optional full name shown in greetings.
    pub full_name: Option<String>,
    /// Inactive users can authenticate but not use protected endpoints.
    pub is_active: bool,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Unique handle.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    pub hashed_password: String,
    /// Optional full name.
    pub full_name: Option<String>,
}

impl User {
    /// Returns the name to greet the user with: the full name if set, else the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

impl NewUser {
    /// Derives the base username from an email address: everything before the `@`.
    ///
    /// Long local parts are cut so the base plus a numeric suffix still fits
    /// in [`USERNAME_MAX_LENGTH`].
    pub fn username_base(email: &str) -> &str {
        let local = email.split('@').next().unwrap_or(email);
        let max_chars = USERNAME_MAX_LENGTH - USERNAME_SUFFIX_RESERVE;

        match local.char_indices().nth(max_chars) {
            Some((end, _)) => &local[..end],
            None => local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_base_is_local_part() {
        assert_eq!(NewUser::username_base("front.desk@example.com"), "front.desk");
        assert_eq!(NewUser::username_base("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn username_base_leaves_room_for_suffix() {
        let email = format!("{}@x.io", "a".repeat(64));
        let base = NewUser::username_base(&email);

        assert_eq!(base.chars().count(), USERNAME_MAX_LENGTH - USERNAME_SUFFIX_RESERVE);
        assert!(format!("{base}{}", u32::MAX).chars().count() <= USERNAME_MAX_LENGTH);
    }

    #[test]
    fn username_base_cuts_on_char_boundary() {
        let email = format!("{}@example.kr", "호".repeat(45));
        let base = NewUser::username_base(&email);

        assert_eq!(base.chars().count(), USERNAME_MAX_LENGTH - USERNAME_SUFFIX_RESERVE);
        assert!(base.chars().all(|c| c == '호'));
    }
}
