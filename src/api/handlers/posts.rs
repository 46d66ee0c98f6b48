// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::Json;
use serde_json::{json, Value};

// TODO: replace with real post storage once the posts API lands
pub async fn get_posts() -> Json<Value> {
    Json(json!({ "msg": "posts route" }))
}
