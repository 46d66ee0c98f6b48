// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::DbPoolError;
use crate::reconciler::RemoveError;

/// One entry of the `{errors: [...]}` body returned on request validation
/// failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub param: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(param: &str, msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
            param: param.to_string(),
            location: "body",
        }
    }
}

/// Every failure a handler can surface. By API convention, missing records
/// (including malformed identifiers) are client errors and map to 400, not
/// 404; only an upstream GitHub failure maps to 404.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    EmptyList(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("database pool error: {0}")]
    Pool(#[from] DbPoolError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RemoveError> for ApiError {
    fn from(err: RemoveError) -> Self {
        match err {
            RemoveError::Empty(kind) => ApiError::EmptyList(format!("no {} data", kind.noun())),
            RemoveError::NotFound(kind) => ApiError::NotFound(format!("{} not found", kind.noun())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::NotFound(msg) | ApiError::EmptyList(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Upstream(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Database(e) => server_error(e),
            ApiError::Pool(e) => server_error(e),
            ApiError::Internal(e) => server_error(e),
        }
    }
}

// Unexpected failures are logged server-side; callers only see a generic body.
fn server_error(err: impl std::fmt::Display) -> Response {
    error!("unexpected server error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "msg": "Server Error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::ListKind;

    #[test]
    fn remove_errors_map_to_api_messages() {
        let empty: ApiError = RemoveError::Empty(ListKind::Experience).into();
        assert!(matches!(empty, ApiError::EmptyList(ref msg) if msg == "no experience data"));

        let missing: ApiError = RemoveError::NotFound(ListKind::Education).into();
        assert!(matches!(missing, ApiError::NotFound(ref msg) if msg == "education not found"));
    }

    #[test]
    fn field_error_carries_body_location() {
        let err = FieldError::body("status", "Status is required");
        assert_eq!(err.location, "body");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({
                "msg": "Status is required",
                "param": "status",
                "location": "body"
            })
        );
    }
}
