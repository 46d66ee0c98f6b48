// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{Profile, ProfileChanges, ProfileView, UserSummary};
use crate::reconciler::{self, ProfilePayload};
use crate::schema::{profiles, users};

/// Get the caller's own profile, joined with the owner projection
pub async fn get_own_profile(
    State(db_pool): State<DbPool>,
    user: AuthUser,
) -> Result<Json<ProfileView>, ApiError> {
    let mut conn = db_pool.get().await?;

    let row = profiles::table
        .inner_join(users::table)
        .filter(profiles::user_id.eq(user.0))
        .select((Profile::as_select(), UserSummary::as_select()))
        .first::<(Profile, UserSummary)>(&mut conn)
        .await
        .optional()?;

    let (profile, owner) =
        row.ok_or_else(|| ApiError::NotFound("profile not available".to_string()))?;

    Ok(Json(ProfileView::new(profile, owner)))
}

/// Create or update the caller's profile from a partial field set
pub async fn upsert_profile(
    State(db_pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<Profile>, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let update = reconciler::build_update(payload, user.0);
    let mut conn = db_pool.get().await?;

    let existing = profiles::table
        .filter(profiles::user_id.eq(user.0))
        .select(Profile::as_select())
        .first::<Profile>(&mut conn)
        .await
        .optional()?;

    let profile = match existing {
        Some(mut profile) => {
            update.merge_into(&mut profile);
            diesel::update(profiles::table.filter(profiles::user_id.eq(user.0)))
                .set(ProfileChanges::from_merged(&profile))
                .returning(Profile::as_returning())
                .get_result(&mut conn)
                .await?
        }
        None => {
            debug!("Creating profile for user {}", user.0);
            diesel::insert_into(profiles::table)
                .values(update.into_new_profile())
                .returning(Profile::as_returning())
                .get_result(&mut conn)
                .await?
        }
    };

    Ok(Json(profile))
}

/// Get a list of all profiles with the owner projection
pub async fn get_profiles(
    State(db_pool): State<DbPool>,
) -> Result<Json<Vec<ProfileView>>, ApiError> {
    let mut conn = db_pool.get().await?;

    let rows = profiles::table
        .inner_join(users::table)
        .select((Profile::as_select(), UserSummary::as_select()))
        .load::<(Profile, UserSummary)>(&mut conn)
        .await?;

    let views = rows
        .into_iter()
        .map(|(profile, owner)| ProfileView::new(profile, owner))
        .collect();

    Ok(Json(views))
}

/// Get a profile by user id. A malformed id is reported the same way as a
/// missing profile.
pub async fn get_profile_by_user_id(
    State(db_pool): State<DbPool>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let user_id = Uuid::parse_str(&user_id).map_err(|_| {
        ApiError::NotFound("Profile not found,check ProfileID is correct?".to_string())
    })?;

    let mut conn = db_pool.get().await?;

    let row = profiles::table
        .inner_join(users::table)
        .filter(profiles::user_id.eq(user_id))
        .select((Profile::as_select(), UserSummary::as_select()))
        .first::<(Profile, UserSummary)>(&mut conn)
        .await
        .optional()?;

    let (profile, owner) = row.ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileView::new(profile, owner)))
}

/// Delete the caller's profile and account. Both rows go in one transaction
/// so a failed user delete cannot leave a profile-less half-deleted account.
pub async fn delete_account(
    State(db_pool): State<DbPool>,
    user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let mut conn = db_pool.get().await?;

    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        async move {
            diesel::delete(profiles::table.filter(profiles::user_id.eq(user.0)))
                .execute(conn)
                .await?;
            diesel::delete(users::table.filter(users::id.eq(user.0)))
                .execute(conn)
                .await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(Json(json!({ "msg": "user deleted" })))
}
