//! Endpoints about the authenticated user.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;

use crate::extract::{AuthState, Json};
use crate::handler::Result;
use crate::handler::response::{ErrorResponse, Message, User};
use crate::service::ServiceState;

/// Returns the authenticated user.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.id))]
async fn read_current_user(
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<User>)> {
    Ok((StatusCode::OK, Json(User::from_model(auth_state))))
}

fn read_current_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get current user")
        .description("Returns the user the bearer token was issued to.")
        .response::<200, Json<User>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Greets the authenticated user.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.id))]
async fn protected(AuthState(auth_state): AuthState) -> Result<(StatusCode, Json<Message>)> {
    let message = format!(
        "Hello, {}! This is a protected route.",
        auth_state.display_name()
    );

    Ok((StatusCode::OK, Json(Message::new(message))))
}

fn protected_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Protected greeting")
        .description("Greets the user by full name, or by username when no full name is set.")
        .response::<200, Json<Message>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns routes for the current user.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/users/me", get_with(read_current_user, read_current_user_docs))
        .api_route("/protected", get_with(protected, protected_docs))
        .with_path_items(|item| item.tag("Users"))
}
