//! Hotel platform credential handlers.
//!
//! Every record belongs to exactly one user; a record owned by someone else
//! is reported as missing. Passwords are encrypted with the master key before
//! they reach the database and are only decrypted for the detail endpoints.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use innkeep_postgres::model::HotelPlatform as HotelPlatformModel;
use innkeep_postgres::query::HotelPlatformRepository;
use innkeep_postgres::types::PlatformType;
use innkeep_postgres::{PgClient, PgConn};
use uuid::Uuid;

use crate::extract::{AuthState, Json, Path, ValidateJson};
use crate::handler::request::{
    CreateHotelPlatform, HotelPlatformPathParams, PlatformNamePathParams, UpdateHotelPlatform,
};
use crate::handler::response::{ErrorResponse, HotelPlatform, HotelPlatformDetail, Message};
use crate::handler::{ErrorKind, Result};
use crate::service::{MasterKey, ServiceState};

/// Tracing target for hotel platform operations.
const TRACING_TARGET: &str = "innkeep_server::handler::hotel_platforms";

/// Registers credentials for a platform.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %auth_state.id,
        platform = %request.platform.name(),
    )
)]
async fn create_hotel_platform(
    State(pg_client): State<PgClient>,
    State(master_key): State<MasterKey>,
    AuthState(auth_state): AuthState,
    ValidateJson(request): ValidateJson<CreateHotelPlatform>,
) -> Result<(StatusCode, Json<HotelPlatform>)> {
    tracing::debug!(target: TRACING_TARGET, "Creating hotel platform record");

    let mut conn = pg_client.get_connection().await?;

    // The unique constraint still guards concurrent inserts.
    if conn
        .find_user_hotel_platform_by_platform(auth_state.id, request.platform)
        .await?
        .is_some()
    {
        return Err(ErrorKind::BadRequest
            .with_message("Platform is already registered, use PUT to modify it")
            .with_resource("hotel_platform"));
    }

    let new_record = request.into_model(auth_state.id, &master_key);
    let record = conn.create_hotel_platform(new_record).await?;

    tracing::info!(
        target: TRACING_TARGET,
        record_id = %record.id,
        "Hotel platform record created",
    );

    Ok((StatusCode::CREATED, Json(HotelPlatform::from_model(record))))
}

fn create_hotel_platform_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Register platform credentials")
        .description(
            "Stores login credentials for one booking platform. Passwords are encrypted \
             before storage and never returned by this endpoint. A user can hold one record \
             per platform.",
        )
        .response::<201, Json<HotelPlatform>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Lists the user's records without secrets.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.id))]
async fn list_hotel_platforms(
    State(pg_client): State<PgClient>,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<Vec<HotelPlatform>>)> {
    let mut conn = pg_client.get_connection().await?;
    let records = conn.list_user_hotel_platforms(auth_state.id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        record_count = records.len(),
        "Hotel platform records listed",
    );

    let records = records.into_iter().map(HotelPlatform::from_model).collect();
    Ok((StatusCode::OK, Json(records)))
}

fn list_hotel_platforms_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List platform credentials")
        .description("Returns the user's records, oldest first. Passwords are omitted.")
        .response::<200, Json<Vec<HotelPlatform>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns one record with decrypted secrets.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %auth_state.id,
        record_id = %path_params.platform_id,
    )
)]
async fn read_hotel_platform(
    State(pg_client): State<PgClient>,
    State(master_key): State<MasterKey>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<HotelPlatformPathParams>,
) -> Result<(StatusCode, Json<HotelPlatformDetail>)> {
    let mut conn = pg_client.get_connection().await?;
    let record = find_hotel_platform(&mut conn, auth_state.id, path_params.platform_id).await?;

    tracing::debug!(target: TRACING_TARGET, "Hotel platform record read");

    Ok((
        StatusCode::OK,
        Json(HotelPlatformDetail::from_model(record, &master_key)),
    ))
}

fn read_hotel_platform_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get platform credentials")
        .description(
            "Returns one record with its passwords decrypted. A password that cannot be \
             decrypted with the current master key is returned as an empty string.",
        )
        .response::<200, Json<HotelPlatformDetail>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Applies a partial update to one record.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %auth_state.id,
        record_id = %path_params.platform_id,
    )
)]
async fn update_hotel_platform(
    State(pg_client): State<PgClient>,
    State(master_key): State<MasterKey>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<HotelPlatformPathParams>,
    ValidateJson(request): ValidateJson<UpdateHotelPlatform>,
) -> Result<(StatusCode, Json<HotelPlatform>)> {
    tracing::debug!(target: TRACING_TARGET, "Updating hotel platform record");

    let mut conn = pg_client.get_connection().await?;
    let existing = find_hotel_platform(&mut conn, auth_state.id, path_params.platform_id).await?;

    let updates = request.into_model(&master_key);
    let record = conn.update_hotel_platform(existing.id, updates).await?;

    tracing::info!(target: TRACING_TARGET, "Hotel platform record updated");

    Ok((StatusCode::OK, Json(HotelPlatform::from_model(record))))
}

fn update_hotel_platform_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update platform credentials")
        .description(
            "Updates only the supplied fields. Non-empty passwords are re-encrypted. For the \
             optional second-factor fields an explicit `null` clears the stored value.",
        )
        .response::<200, Json<HotelPlatform>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes one record.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %auth_state.id,
        record_id = %path_params.platform_id,
    )
)]
async fn delete_hotel_platform(
    State(pg_client): State<PgClient>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<HotelPlatformPathParams>,
) -> Result<(StatusCode, Json<Message>)> {
    tracing::debug!(target: TRACING_TARGET, "Deleting hotel platform record");

    let mut conn = pg_client.get_connection().await?;
    let record = find_hotel_platform(&mut conn, auth_state.id, path_params.platform_id).await?;

    if !conn.delete_hotel_platform(record.id).await? {
        return Err(not_found());
    }

    tracing::info!(
        target: TRACING_TARGET,
        platform = record.platform.name(),
        "Hotel platform record deleted",
    );

    let message = format!("{} platform credentials deleted", record.platform.value());
    Ok((StatusCode::OK, Json(Message::new(message))))
}

fn delete_hotel_platform_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete platform credentials")
        .description("Permanently removes the record and its encrypted passwords.")
        .response::<200, Json<Message>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns the user's record for a platform, looked up by enum name or label.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = %auth_state.id,
        platform_name = %path_params.platform_name,
    )
)]
async fn read_hotel_platform_by_name(
    State(pg_client): State<PgClient>,
    State(master_key): State<MasterKey>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<PlatformNamePathParams>,
) -> Result<(StatusCode, Json<HotelPlatformDetail>)> {
    let Some(platform) = PlatformType::from_name_or_value(&path_params.platform_name) else {
        tracing::debug!(target: TRACING_TARGET, "Unknown platform name");
        return Err(ErrorKind::BadRequest
            .with_message("Unsupported platform")
            .with_context(format!("Unknown platform: {}", path_params.platform_name))
            .with_resource("platform"));
    };

    let mut conn = pg_client.get_connection().await?;
    let record = conn
        .find_user_hotel_platform_by_platform(auth_state.id, platform)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message(format!(
                    "{} platform info not found",
                    path_params.platform_name
                ))
                .with_resource("hotel_platform")
        })?;

    Ok((
        StatusCode::OK,
        Json(HotelPlatformDetail::from_model(record, &master_key)),
    ))
}

fn read_hotel_platform_by_name_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get platform credentials by platform")
        .description(
            "Looks up the user's record for a platform. The platform may be given by its \
             identifier (e.g. `YANOLJA`) or its display label.",
        )
        .response::<200, Json<HotelPlatformDetail>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

fn not_found() -> crate::handler::Error<'static> {
    ErrorKind::NotFound
        .with_message("Platform information not found")
        .with_resource("hotel_platform")
}

/// Finds a record owned by the user or returns NotFound.
async fn find_hotel_platform(
    conn: &mut PgConn,
    user_id: Uuid,
    record_id: Uuid,
) -> Result<HotelPlatformModel> {
    conn.find_user_hotel_platform(user_id, record_id)
        .await?
        .ok_or_else(not_found)
}

/// Returns routes for hotel platform credential management.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/hotel-platforms",
            post_with(create_hotel_platform, create_hotel_platform_docs)
                .get_with(list_hotel_platforms, list_hotel_platforms_docs),
        )
        .api_route(
            "/hotel-platforms/{platform_id}",
            get_with(read_hotel_platform, read_hotel_platform_docs)
                .put_with(update_hotel_platform, update_hotel_platform_docs)
                .delete_with(delete_hotel_platform, delete_hotel_platform_docs),
        )
        .api_route(
            "/hotel-platforms/platform/{platform_name}",
            get_with(read_hotel_platform_by_name, read_hotel_platform_by_name_docs),
        )
        .with_path_items(|item| item.tag("Hotel Platforms"))
}
