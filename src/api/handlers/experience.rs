// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Profile;
use crate::reconciler::{ExperiencePayload, ListKind, RemoveError};
use crate::schema::profiles;

/// Prepend an experience entry to the caller's profile
pub async fn add_experience(
    State(db_pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<ExperiencePayload>,
) -> Result<Json<Profile>, ApiError> {
    // Validate before any store access; nothing is written on failure
    let entry = payload.into_entry().map_err(ApiError::Validation)?;

    let mut conn = db_pool.get().await?;
    let mut profile = load_profile(&mut conn, user.0).await?;

    profile.experience.prepend(entry);

    let updated = diesel::update(profiles::table.filter(profiles::user_id.eq(user.0)))
        .set((
            profiles::experience.eq(profile.experience),
            profiles::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(updated))
}

/// Remove one experience entry by its generated id
pub async fn remove_experience(
    State(db_pool): State<DbPool>,
    user: AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let mut conn = db_pool.get().await?;
    let mut profile = load_profile(&mut conn, user.0).await?;

    // The empty-list check comes before id parsing, so a malformed id on an
    // empty list still reports the empty list
    if profile.experience.is_empty() {
        return Err(RemoveError::Empty(ListKind::Experience).into());
    }

    let exp_id = Uuid::parse_str(&exp_id)
        .map_err(|_| ApiError::NotFound("this experience not found".to_string()))?;
    profile.experience.remove(exp_id)?;

    let updated = diesel::update(profiles::table.filter(profiles::user_id.eq(user.0)))
        .set((
            profiles::experience.eq(profile.experience),
            profiles::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(updated))
}

pub(super) async fn load_profile(
    conn: &mut crate::db::DbConnection,
    user_id: Uuid,
) -> Result<Profile, ApiError> {
    profiles::table
        .filter(profiles::user_id.eq(user_id))
        .select(Profile::as_select())
        .first::<Profile>(conn)
        .await
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}
