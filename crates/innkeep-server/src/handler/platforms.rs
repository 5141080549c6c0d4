//! Supported booking platforms.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::Platform;
use crate::service::ServiceState;

/// Lists every supported platform in declaration order.
async fn list_platforms() -> Result<(StatusCode, Json<Vec<Platform>>)> {
    Ok((StatusCode::OK, Json(Platform::all())))
}

fn list_platforms_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List platforms")
        .description(
            "Returns the supported booking platforms. `value` is the stored display label, \
             `name` is the stable identifier accepted by the lookup endpoints.",
        )
        .response::<200, Json<Vec<Platform>>>()
}

/// Returns routes for platform discovery.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/platforms", get_with(list_platforms, list_platforms_docs))
        .with_path_items(|item| item.tag("Platforms"))
}
