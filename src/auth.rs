// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Identity guard: turns the `x-auth-token` header into a typed caller id.
//!
//! Handlers receive the identity as an explicit [`AuthUser`] argument rather
//! than reading it off the request, so the reconciler can force the `user`
//! field from a value the payload cannot influence.

use anyhow::Result;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;

const TOKEN_HEADER: &str = "x-auth-token";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user: UserClaim,
    exp: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserClaim {
    id: Uuid,
}

/// The authenticated caller's user id.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("No token, authorization denied"))?;

        let config = Config::get();
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::Unauthorized("Token is not valid"))?;

        Ok(AuthUser(data.claims.user.id))
    }
}

/// Sign a token for the given user id, valid for `ttl_secs` seconds.
pub fn issue_token(user_id: Uuid, ttl_secs: i64) -> Result<String> {
    let config = Config::get();
    let claims = Claims {
        user: UserClaim { id: user_id },
        exp: (chrono::Utc::now() + chrono::Duration::seconds(ttl_secs)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}
