// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    Json,
};
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::error::ApiError;

const GITHUB_API: &str = "https://api.github.com";
const NOT_FOUND_MSG: &str = "No Github profile found";

/// Proxy a user's five oldest repositories from the GitHub API. Any upstream
/// failure is reported as 404.
pub async fn get_repos(
    State(http): State<reqwest::Client>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let config = Config::get();

    let mut query: Vec<(&str, String)> = vec![
        ("per_page", "5".to_string()),
        ("sort", "created".to_string()),
        ("direction", "asc".to_string()),
    ];
    if let (Some(client_id), Some(client_secret)) =
        (&config.github.client_id, &config.github.client_secret)
    {
        query.push(("client_id", client_id.clone()));
        query.push(("client_secret", client_secret.clone()));
    }

    let response = http
        .get(format!("{}/users/{}/repos", GITHUB_API, username))
        .header(USER_AGENT, "devconnect-api")
        .query(&query)
        .send()
        .await
        .map_err(|e| {
            warn!("GitHub request for {} failed: {}", username, e);
            ApiError::Upstream(NOT_FOUND_MSG.to_string())
        })?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(NOT_FOUND_MSG.to_string()));
    }

    let repos: Value = response
        .json()
        .await
        .map_err(|_| ApiError::Upstream(NOT_FOUND_MSG.to_string()))?;

    Ok(Json(repos))
}
