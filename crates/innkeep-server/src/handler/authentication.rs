//! Signup and access token issuance.
//!
//! Tokens are issued through two equivalent endpoints: `/token` accepts the
//! OAuth2 password grant form, `/login` accepts a JSON body. Both answer an
//! unknown email and a wrong password with the same 401, and both run a full
//! password verification in either case.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use innkeep_postgres::PgClient;
use innkeep_postgres::model::NewUser;
use innkeep_postgres::query::UserRepository;

use crate::extract::{AuthClaims, Form, Json, ValidateJson};
use crate::handler::request::{Login, Signup, TokenForm};
use crate::handler::response::{ErrorResponse, Token, User};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, SessionKeys};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "innkeep_server::handler::authentication";

/// Creates a new user.
///
/// The username is derived from the local part of the email, with a numeric
/// suffix appended when it is already taken.
#[tracing::instrument(skip_all)]
async fn signup(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    ValidateJson(request): ValidateJson<Signup>,
) -> Result<(StatusCode, Json<User>)> {
    let email = request.normalized_email();
    tracing::trace!(target: TRACING_TARGET, email = %email, "Signup attempt");

    let mut conn = pg_client.get_connection().await?;

    if conn.find_user_by_email(&email).await?.is_some() {
        tracing::warn!(target: TRACING_TARGET, email = %email, "Signup rejected: email taken");
        return Err(ErrorKind::BadRequest
            .with_message("Email already registered")
            .with_resource("user"));
    }

    let username = conn
        .next_available_username(NewUser::username_base(&email))
        .await?;
    let hashed_password = password_hasher.hash_password(&request.password)?;

    let new_user = NewUser {
        username,
        email,
        hashed_password,
        full_name: None,
    };

    let user = conn.create_user(new_user).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        username = %user.username,
        "User created",
    );

    Ok((StatusCode::CREATED, Json(User::from_model(user))))
}

fn signup_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Sign up")
        .description(
            "Registers a new user. The email is stored trimmed and lowercased; the username \
             is derived from its local part.",
        )
        .response::<201, Json<User>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Issues an access token for the OAuth2 password grant form.
#[tracing::instrument(skip_all)]
async fn issue_token(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    Form(form): Form<TokenForm>,
) -> Result<(StatusCode, Json<Token>)> {
    if let Some(grant_type) = form.grant_type.as_deref()
        && grant_type != "password"
    {
        return Err(ErrorKind::BadRequest
            .with_message("Unsupported grant type")
            .with_context(format!("Expected 'password', got '{grant_type}'"))
            .with_resource("authentication"));
    }

    let token = authenticate(&pg_client, &password_hasher, &session_keys, form.into()).await?;
    Ok((StatusCode::OK, Json(token)))
}

fn issue_token_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Issue access token")
        .description(
            "OAuth2 password grant. The `username` field carries the email address. \
             Returns a bearer token to send in the `Authorization` header.",
        )
        .response::<200, Json<Token>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Issues an access token for a JSON login body.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(StatusCode, Json<Token>)> {
    let token = authenticate(&pg_client, &password_hasher, &session_keys, request).await?;
    Ok((StatusCode::OK, Json(token)))
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Log in")
        .description("Same as `/token`, with the credentials sent as JSON.")
        .response::<200, Json<Token>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Verifies the credentials and signs a token for the matching user.
async fn authenticate(
    pg_client: &PgClient,
    password_hasher: &PasswordHasher,
    session_keys: &SessionKeys,
    login: Login,
) -> Result<Token> {
    let email = login.email.trim().to_lowercase();
    tracing::trace!(target: TRACING_TARGET, email = %email, "Login attempt");

    let mut conn = pg_client.get_connection().await?;
    let user = conn.find_user_by_email(&email).await?;

    let Some(user) = user else {
        // Same cost as a real verification, so timing does not reveal the account.
        let _ = password_hasher.verify_dummy_password(&login.password);
        tracing::warn!(target: TRACING_TARGET, email = %email, "Login failed: unknown email");
        return Err(ErrorKind::Unauthorized
            .with_message("Incorrect email or password")
            .with_resource("authentication"));
    };

    if let Err(error) = password_hasher.verify_password(&login.password, &user.hashed_password) {
        tracing::warn!(target: TRACING_TARGET, user_id = %user.id, "Login failed");
        return Err(error);
    }

    if !user.is_active {
        tracing::warn!(target: TRACING_TARGET, user_id = %user.id, "Login rejected: inactive user");
        return Err(ErrorKind::InactiveUser.with_resource("authentication"));
    }

    let auth_claims = AuthClaims::new(&user.username, session_keys.access_token_lifetime());
    let access_token = auth_claims.encode(session_keys)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        token_id = %auth_claims.token_id,
        expires_in = auth_claims.lifetime_secs(),
        "Access token issued",
    );

    Ok(Token::bearer(access_token))
}

/// Returns routes for signup and token issuance.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/signup", post_with(signup, signup_docs))
        .api_route("/token", post_with(issue_token, issue_token_docs))
        .api_route("/login", post_with(login, login_docs))
        .with_path_items(|item| item.tag("Authentication"))
}
