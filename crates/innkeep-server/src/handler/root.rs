//! Service landing endpoint.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::Message;
use crate::service::ServiceState;

/// Greeting returned by the landing endpoint.
const WELCOME_MESSAGE: &str = "Welcome to the innkeep API";

/// Returns a static welcome message.
async fn welcome() -> Result<(StatusCode, Json<Message>)> {
    Ok((StatusCode::OK, Json(Message::new(WELCOME_MESSAGE))))
}

fn welcome_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Welcome")
        .description("Returns a static welcome message. Useful as a liveness probe.")
        .response::<200, Json<Message>>()
}

/// Returns the landing route.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/", get_with(welcome, welcome_docs))
        .with_path_items(|item| item.tag("Root"))
}
