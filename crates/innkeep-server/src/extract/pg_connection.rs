//! Pooled Postgres connection extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use innkeep_postgres::{PgClient, PgConn};

use crate::handler::{Error, ErrorKind};

/// Tracing target for connection acquisition.
const TRACING_TARGET: &str = "innkeep_server::extract::pg_connection";

/// Extractor that checks a connection out of the pool for the request.
///
/// Dereferences to [`PgConn`], which implements every repository trait.
///
/// ```rust,ignore
/// use innkeep_postgres::query::UserRepository;
/// use innkeep_server::extract::PgPool;
///
/// async fn handler(PgPool(mut conn): PgPool) {
///     let user = conn.find_user_by_email("guest@example.com").await;
/// }
/// ```
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pg_client = PgClient::from_ref(state);
        let conn = pg_client.get_connection().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "Failed to acquire database connection",
            );

            let kind = if e.is_transient() {
                ErrorKind::ServiceUnavailable
            } else {
                ErrorKind::InternalServerError
            };

            kind.with_message("Database connection unavailable")
        })?;

        Ok(PgPool(conn))
    }
}

impl aide::OperationInput for PgPool {}
