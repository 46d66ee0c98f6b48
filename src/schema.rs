// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::allow_tables_to_appear_in_same_query;
use diesel::joinable;
use diesel::table;

// Define users table
table! {
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        avatar -> Nullable<Varchar>,
        created_at -> Timestamp,
    }
}

// Define profiles table
table! {
    profiles (id) {
        id -> Uuid,
        user_id -> Uuid,
        status -> Varchar,
        company -> Nullable<Varchar>,
        website -> Nullable<Varchar>,
        location -> Nullable<Varchar>,
        bio -> Nullable<Text>,
        github_username -> Nullable<Varchar>,
        skills -> Array<Text>,
        social -> Jsonb,
        experience -> Jsonb,
        education -> Jsonb,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

joinable!(profiles -> users (user_id));

// Allow joining the tables for the {name, avatar} projection
allow_tables_to_appear_in_same_query!(users, profiles,);
