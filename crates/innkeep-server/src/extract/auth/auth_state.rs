//! The authenticated user of a request.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use innkeep_postgres::model::User;
use innkeep_postgres::query::UserRepository;
use innkeep_postgres::{PgClient, PgConnection};

use super::{AuthClaims, AuthHeader};
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Active user resolved from a valid bearer token.
///
/// Extraction fails with:
/// - `401` if the token is missing, malformed, expired, or names a user that
///   no longer exists
/// - `400` if the user exists but is inactive
///
/// The result is cached in the request extensions, so extracting it twice
/// costs one database lookup.
#[derive(Debug, Clone, Deref, PartialEq)]
pub struct AuthState(pub User);

impl AuthState {
    /// Returns the authenticated user.
    #[inline]
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Consumes the state and returns the authenticated user.
    #[inline]
    pub fn into_user(self) -> User {
        self.0
    }

    /// Resolves the user named by validated claims.
    pub async fn from_claims(conn: &mut PgConnection, auth_claims: &AuthClaims) -> Result<Self> {
        let user = conn
            .find_user_by_username(&auth_claims.username)
            .await
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %e,
                    token_id = %auth_claims.token_id,
                    "Failed to load user during authentication",
                );
                Error::from(e)
            })?
            .ok_or_else(|| {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    token_id = %auth_claims.token_id,
                    username = %auth_claims.username,
                    "Authentication failed: token subject no longer exists",
                );
                ErrorKind::MalformedAuthToken.with_resource("authentication")
            })?;

        if !user.is_active {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %user.id,
                "Authentication failed: user is inactive",
            );
            return Err(ErrorKind::InactiveUser.with_resource("user"));
        }

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    PgClient: FromRef<S>,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let auth_claims = auth_header.into_auth_claims();

        let pg_client = PgClient::from_ref(state);
        let mut conn = pg_client.get_connection().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                "Failed to acquire database connection during authentication",
            );
            ErrorKind::ServiceUnavailable
                .with_message("Authentication is temporarily unavailable")
                .with_resource("authentication")
        })?;

        let auth_state = Self::from_claims(&mut conn, &auth_claims).await?;
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send,
    PgClient: FromRef<S>,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(auth_state) => Ok(Some(auth_state)),
            Err(_) => Ok(None),
        }
    }
}

impl aide::OperationInput for AuthState {}
