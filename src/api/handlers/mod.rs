// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod education;
pub mod experience;
pub mod github;
pub mod health;
pub mod posts;
pub mod profiles;
