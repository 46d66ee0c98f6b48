// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::experience::load_profile;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Profile;
use crate::reconciler::{EducationPayload, ListKind, RemoveError};
use crate::schema::profiles;

/// Prepend an education entry to the caller's profile
pub async fn add_education(
    State(db_pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<EducationPayload>,
) -> Result<Json<Profile>, ApiError> {
    // Validate before any store access; nothing is written on failure
    let entry = payload.into_entry().map_err(ApiError::Validation)?;

    let mut conn = db_pool.get().await?;
    let mut profile = load_profile(&mut conn, user.0).await?;

    profile.education.prepend(entry);

    let updated = diesel::update(profiles::table.filter(profiles::user_id.eq(user.0)))
        .set((
            profiles::education.eq(profile.education),
            profiles::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(updated))
}

/// Remove one education entry by its generated id
pub async fn remove_education(
    State(db_pool): State<DbPool>,
    user: AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let mut conn = db_pool.get().await?;
    let mut profile = load_profile(&mut conn, user.0).await?;

    if profile.education.is_empty() {
        return Err(RemoveError::Empty(ListKind::Education).into());
    }

    let edu_id = Uuid::parse_str(&edu_id)
        .map_err(|_| ApiError::NotFound("this education not found".to_string()))?;
    profile.education.remove(edu_id)?;

    let updated = diesel::update(profiles::table.filter(profiles::user_id.eq(user.0)))
        .set((
            profiles::education.eq(profile.education),
            profiles::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(updated))
}
