//! Access token parsing and issuance.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Validated bearer token of the current request.
///
/// Only checks the token itself: signature, expiry, issuer and audience.
/// Use [`AuthState`] to also resolve the user it names.
///
/// [`AuthState`]: crate::extract::AuthState
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    auth_claims: AuthClaims,
}

impl AuthHeader {
    /// Wraps already validated claims.
    #[inline]
    pub const fn new(auth_claims: AuthClaims) -> Self {
        Self { auth_claims }
    }

    /// Returns the token claims.
    #[inline]
    pub const fn as_auth_claims(&self) -> &AuthClaims {
        &self.auth_claims
    }

    /// Consumes the header and returns the token claims.
    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.auth_claims
    }

    fn from_header(
        authorization_header: TypedHeader<Authorization<Bearer>>,
        session_keys: &SessionKeys,
    ) -> Result<Self> {
        let auth_claims =
            AuthClaims::decode(authorization_header.token(), session_keys.decoding_key())?;
        Ok(Self::new(auth_claims))
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let session_keys = SessionKeys::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => {
                let auth_header = Self::from_header(bearer_header, &session_keys)?;
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_context("Missing Authorization header with Bearer token")
                        .with_resource("authentication"),
                    TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                        .with_context("Authorization header must contain a Bearer token")
                        .with_resource("authentication"),
                    _ => ErrorKind::InternalServerError
                        .with_message("Authentication processing failed")
                        .with_resource("authentication"),
                };
                Err(error)
            }
        }
    }
}

impl aide::OperationInput for AuthHeader {}

/// Claims of an access token.
///
/// | Claim | Field |
/// |-------|-------|
/// | `iss` | issuer, always `innkeep` |
/// | `aud` | audience, always `innkeep:server` |
/// | `jti` | [`token_id`](Self::token_id) |
/// | `sub` | [`username`](Self::username) |
/// | `iat` | [`issued_at`](Self::issued_at), unix seconds |
/// | `exp` | [`expires_at`](Self::expires_at), unix seconds |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(rename = "iss")]
    issued_by: String,
    #[serde(rename = "aud")]
    audience: String,

    /// Unique token identifier.
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Username of the token holder.
    #[serde(rename = "sub")]
    pub username: String,

    /// Issue time.
    #[serde(rename = "iat")]
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiry time.
    #[serde(rename = "exp")]
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl AuthClaims {
    const JWT_AUDIENCE: &str = "innkeep:server";
    const JWT_ISSUER: &str = "innkeep";

    /// Creates claims for `username`, valid for `lifetime` from now.
    pub fn new(username: impl Into<String>, lifetime: SignedDuration) -> Self {
        let issued_at = Timestamp::now();
        let expires_at = issued_at.saturating_add(lifetime).unwrap_or(Timestamp::MAX);

        Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            token_id: Uuid::new_v4(),
            username: username.into(),
            issued_at,
            expires_at,
        }
    }

    /// Returns true if the expiry time has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Returns the lifetime of the token in whole seconds.
    #[inline]
    #[must_use]
    pub fn lifetime_secs(&self) -> i64 {
        self.expires_at.as_second() - self.issued_at.as_second()
    }

    /// Signs the claims into a compact JWT.
    pub fn encode(&self, session_keys: &SessionKeys) -> Result<String> {
        self.encode_with(session_keys.encoding_key())
    }

    fn encode_with(&self, encoding_key: &EncodingKey) -> Result<String> {
        let header = Header::new(SessionKeys::ALGORITHM);
        encode(&header, self, encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                username = %self.username,
                "Failed to encode access token",
            );
            ErrorKind::InternalServerError
                .with_message("Access token generation failed")
                .with_resource("authentication")
        })
    }

    /// Verifies a compact JWT and returns its claims.
    pub fn decode(token: &str, decoding_key: &DecodingKey) -> Result<Self> {
        let mut validation = Validation::new(SessionKeys::ALGORITHM);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "jti", "sub", "iat", "exp"]);

        let claims = decode::<Self>(token, decoding_key, &validation)?.claims;

        if claims.is_expired() {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                token_id = %claims.token_id,
                "Access token expired",
            );
            return Err(ErrorKind::ExpiredAuthToken.with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            token_id = %claims.token_id,
            username = %claims.username,
            "Access token validated",
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            error = %error,
            "Access token rejected",
        );

        let error = match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::ExpiredAuthToken.into_error(),
            JwtErrorKind::InvalidToken
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_) => ErrorKind::MalformedAuthToken
                .with_context("The token could not be parsed"),
            JwtErrorKind::InvalidSignature => ErrorKind::MalformedAuthToken
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidAudience | JwtErrorKind::InvalidIssuer => {
                ErrorKind::MalformedAuthToken.with_context("Token was not issued by this service")
            }
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_context(format!("Token is missing required claim: {claim}")),
            JwtErrorKind::InvalidKeyFormat | JwtErrorKind::InvalidEcdsaKey => {
                ErrorKind::InternalServerError.with_message("Authentication processing failed")
            }
            _ => ErrorKind::MalformedAuthToken.into_error(),
        };

        error.with_resource("authentication")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SessionKeysConfig;

    fn session_keys(secret: &str) -> anyhow::Result<SessionKeys> {
        Ok(SessionKeys::from_config(&SessionKeysConfig::new(secret))?)
    }

    #[test]
    fn claims_round_trip() -> anyhow::Result<()> {
        let keys = session_keys("a-test-secret-that-is-long-enough-for-hs256")?;
        let claims = AuthClaims::new("guest", SignedDuration::from_mins(15));

        let token = claims.encode(&keys)?;
        let decoded = AuthClaims::decode(&token, keys.decoding_key())?;

        assert_eq!(decoded.username, "guest");
        assert_eq!(decoded.token_id, claims.token_id);
        assert_eq!(decoded.lifetime_secs(), 15 * 60);
        Ok(())
    }

    #[test]
    fn reject_token_signed_with_other_secret() -> anyhow::Result<()> {
        let keys = session_keys("a-test-secret-that-is-long-enough-for-hs256")?;
        let other = session_keys("another-secret-that-is-long-enough-too")?;
        let token = AuthClaims::new("guest", SignedDuration::from_mins(15)).encode(&other)?;

        let error = AuthClaims::decode(&token, keys.decoding_key()).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::MalformedAuthToken));
        Ok(())
    }

    #[test]
    fn reject_tampered_token() -> anyhow::Result<()> {
        let keys = session_keys("a-test-secret-that-is-long-enough-for-hs256")?;
        let token = AuthClaims::new("guest", SignedDuration::from_mins(15)).encode(&keys)?;

        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let forged = AuthClaims::new("admin", SignedDuration::from_mins(15)).encode(&keys)?;
        parts[1] = forged.split('.').nth(1).unwrap_or_default().to_owned();
        let tampered = format!("{}.{}.{}", parts[0], parts[1], parts[2]);

        assert!(AuthClaims::decode(&tampered, keys.decoding_key()).is_err());
        Ok(())
    }

    #[test]
    fn reject_expired_token() -> anyhow::Result<()> {
        let keys = session_keys("a-test-secret-that-is-long-enough-for-hs256")?;
        let token = AuthClaims::new("guest", SignedDuration::from_mins(-5)).encode(&keys)?;

        let error = AuthClaims::decode(&token, keys.decoding_key()).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::ExpiredAuthToken));
        Ok(())
    }

    #[test]
    fn reject_garbage() -> anyhow::Result<()> {
        let keys = session_keys("a-test-secret-that-is-long-enough-for-hs256")?;
        let error = AuthClaims::decode("not.a.jwt", keys.decoding_key()).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::MalformedAuthToken));
        Ok(())
    }
}
