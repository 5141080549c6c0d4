//! Users repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Creates a new user record.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email address (exact match).
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by username (exact match).
    fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Returns the first free username of the form `base`, `base1`, `base2`, ...
    fn next_available_username(
        &mut self,
        base: &str,
    ) -> impl Future<Output = PgResult<String>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, new_user: NewUser) -> PgResult<User> {
        use schema::users;

        let user = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        let user = users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        let user = users::table
            .filter(dsl::email.eq(email))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user_by_username(&mut self, username: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        let user = users::table
            .filter(dsl::username.eq(username))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn next_available_username(&mut self, base: &str) -> PgResult<String> {
        use schema::users::{self, dsl};

        // One round trip: every taken name that could collide with a candidate.
        let taken: Vec<String> = users::table
            .filter(dsl::username.like(format!("{}%", escape_like(base))))
            .select(dsl::username)
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(first_free_username(base, &taken))
    }
}

/// Escapes `LIKE` wildcards so `base` matches literally.
fn escape_like(base: &str) -> String {
    base.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Picks `base` if free, otherwise `base` followed by the smallest free counter.
fn first_free_username(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|name| name == base) {
        return base.to_owned();
    }

    (1u64..)
        .map(|counter| format!("{base}{counter}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn free_base_is_used_as_is() {
        assert_eq!(first_free_username("guest", &names(&[])), "guest");
        assert_eq!(first_free_username("guest", &names(&["guest1"])), "guest");
    }

    #[test]
    fn counter_starts_at_one() {
        assert_eq!(first_free_username("guest", &names(&["guest"])), "guest1");
    }

    #[test]
    fn counter_skips_taken_suffixes() {
        let taken = names(&["guest", "guest1", "guest2", "guestbook"]);
        assert_eq!(first_free_username("guest", &taken), "guest3");
    }

    #[test]
    fn long_local_part_fits_the_column() {
        use crate::model::{NewUser, USERNAME_MAX_LENGTH};

        let email = format!("{}@x.io", "g".repeat(60));
        let base = NewUser::username_base(&email);
        let taken = vec![base.to_owned()];

        let username = first_free_username(base, &taken);
        assert!(username.chars().count() <= USERNAME_MAX_LENGTH);
        assert!(username.ends_with('1'));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_b%c"), "a\\_b\\%c");
    }
}
