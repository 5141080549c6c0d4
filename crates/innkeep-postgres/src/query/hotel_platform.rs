//! Hotel platform credentials repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{HotelPlatform, NewHotelPlatform, UpdateHotelPlatform};
use crate::types::PlatformType;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for hotel platform credential operations.
///
/// Every lookup is scoped to an owning user, so callers never see another
/// user's records.
pub trait HotelPlatformRepository {
    /// Inserts a new credential record.
    ///
    /// Fails with the `unique_user_platform` constraint if the user already
    /// has a record for the same platform.
    fn create_hotel_platform(
        &mut self,
        new_record: NewHotelPlatform,
    ) -> impl Future<Output = PgResult<HotelPlatform>> + Send;

    /// Finds a record by id, only if it belongs to `user_id`.
    fn find_user_hotel_platform(
        &mut self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<HotelPlatform>>> + Send;

    /// Finds the user's record for a platform.
    fn find_user_hotel_platform_by_platform(
        &mut self,
        user_id: Uuid,
        platform: PlatformType,
    ) -> impl Future<Output = PgResult<Option<HotelPlatform>>> + Send;

    /// Lists all records of a user, oldest first.
    fn list_user_hotel_platforms(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<HotelPlatform>>> + Send;

    /// Applies a partial update and returns the stored record.
    ///
    /// An empty update leaves the row untouched and returns it as is.
    fn update_hotel_platform(
        &mut self,
        record_id: Uuid,
        updates: UpdateHotelPlatform,
    ) -> impl Future<Output = PgResult<HotelPlatform>> + Send;

    /// Deletes a record. Returns whether a row was removed.
    fn delete_hotel_platform(
        &mut self,
        record_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl HotelPlatformRepository for PgConnection {
    async fn create_hotel_platform(
        &mut self,
        new_record: NewHotelPlatform,
    ) -> PgResult<HotelPlatform> {
        use schema::hotel_platforms;

        let record = diesel::insert_into(hotel_platforms::table)
            .values(&new_record)
            .returning(HotelPlatform::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            record_id = %record.id,
            user_id = %record.user_id,
            "Hotel platform record created",
        );

        Ok(record)
    }

    async fn find_user_hotel_platform(
        &mut self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> PgResult<Option<HotelPlatform>> {
        use schema::hotel_platforms::{self, dsl};

        let record = hotel_platforms::table
            .filter(dsl::id.eq(record_id))
            .filter(dsl::user_id.eq(user_id))
            .select(HotelPlatform::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(record)
    }

    async fn find_user_hotel_platform_by_platform(
        &mut self,
        user_id: Uuid,
        platform: PlatformType,
    ) -> PgResult<Option<HotelPlatform>> {
        use schema::hotel_platforms::{self, dsl};

        let record = hotel_platforms::table
            .filter(dsl::user_id.eq(user_id))
            .filter(dsl::platform.eq(platform))
            .select(HotelPlatform::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(record)
    }

    async fn list_user_hotel_platforms(&mut self, user_id: Uuid) -> PgResult<Vec<HotelPlatform>> {
        use schema::hotel_platforms::{self, dsl};

        let records = hotel_platforms::table
            .filter(dsl::user_id.eq(user_id))
            .order((dsl::created_at.asc(), dsl::id.asc()))
            .select(HotelPlatform::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(records)
    }

    async fn update_hotel_platform(
        &mut self,
        record_id: Uuid,
        updates: UpdateHotelPlatform,
    ) -> PgResult<HotelPlatform> {
        use schema::hotel_platforms::{self, dsl};

        // Diesel rejects an empty changeset.
        if updates.is_empty() {
            let record = hotel_platforms::table
                .filter(dsl::id.eq(record_id))
                .select(HotelPlatform::as_select())
                .first(self)
                .await
                .map_err(PgError::from)?;

            return Ok(record);
        }

        let record = diesel::update(hotel_platforms::table.filter(dsl::id.eq(record_id)))
            .set(&updates)
            .returning(HotelPlatform::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            record_id = %record.id,
            "Hotel platform record updated",
        );

        Ok(record)
    }

    async fn delete_hotel_platform(&mut self, record_id: Uuid) -> PgResult<bool> {
        use schema::hotel_platforms::{self, dsl};

        let deleted = diesel::delete(hotel_platforms::table.filter(dsl::id.eq(record_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
