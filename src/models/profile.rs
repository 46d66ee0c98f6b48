// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveDateTime};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Jsonb;
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;

use crate::schema::profiles;

/// Social links stored as a single JSONB object. Keys absent from an update
/// keep their stored value; present keys overwrite.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Jsonb)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

impl SocialLinks {
    /// Field-level merge: only keys set in `update` overwrite stored values.
    pub fn merge(&mut self, update: &SocialLinks) {
        if update.youtube.is_some() {
            self.youtube = update.youtube.clone();
        }
        if update.twitter.is_some() {
            self.twitter = update.twitter.clone();
        }
        if update.instagram.is_some() {
            self.instagram = update.instagram.clone();
        }
        if update.linkedin.is_some() {
            self.linkedin = update.linkedin.clone();
        }
        if update.facebook.is_some() {
            self.facebook = update.facebook.clone();
        }
    }
}

/// One entry of a profile's work history. The id is generated on insertion
/// and is the handle used for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry of a profile's education history. Same id/deletion contract as
/// [`Experience`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: String,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered, newest-first experience entries backed by one JSONB column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Jsonb)]
pub struct ExperienceList(pub Vec<Experience>);

/// Ordered, newest-first education entries backed by one JSONB column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Jsonb)]
pub struct EducationList(pub Vec<Education>);

impl ExperienceList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl EducationList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// Postgres sends JSONB as a one-byte version tag followed by JSON text.
macro_rules! jsonb_codec {
    ($ty:ty) => {
        impl FromSql<Jsonb, Pg> for $ty {
            fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
                let bytes = value.as_bytes();
                if bytes.first() != Some(&1) {
                    return Err("unsupported JSONB encoding version".into());
                }
                serde_json::from_slice(&bytes[1..]).map_err(Into::into)
            }
        }

        impl ToSql<Jsonb, Pg> for $ty {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(&[1])?;
                serde_json::to_writer(&mut *out, self)?;
                Ok(IsNull::No)
            }
        }
    };
}

jsonb_codec!(SocialLinks);
jsonb_codec!(ExperienceList);
jsonb_codec!(EducationList);

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "githubusername", skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: ExperienceList,
    pub education: EducationList,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProfile {
    pub user_id: Uuid,
    pub status: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: ExperienceList,
    pub education: EducationList,
}

/// Changeset written after merging an update into the stored row. Scalar
/// `None`s are skipped by diesel, which is equivalent here: a merged field is
/// only `None` when the stored column was already NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = profiles)]
pub struct ProfileChanges {
    pub status: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: ExperienceList,
    pub education: EducationList,
    pub updated_at: NaiveDateTime,
}

impl ProfileChanges {
    pub fn from_merged(profile: &Profile) -> Self {
        Self {
            status: profile.status.clone(),
            company: profile.company.clone(),
            website: profile.website.clone(),
            location: profile.location.clone(),
            bio: profile.bio.clone(),
            github_username: profile.github_username.clone(),
            skills: profile.skills.clone(),
            social: profile.social.clone(),
            experience: profile.experience.clone(),
            education: profile.education.clone(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// A profile joined with the `{name, avatar}` projection of its owner.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub user: crate::models::UserSummary,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "githubusername", skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: ExperienceList,
    pub education: EducationList,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProfileView {
    pub fn new(profile: Profile, user: crate::models::UserSummary) -> Self {
        Self {
            id: profile.id,
            user,
            status: profile.status,
            company: profile.company,
            website: profile.website,
            location: profile.location,
            bio: profile.bio,
            github_username: profile.github_username,
            skills: profile.skills,
            social: profile.social,
            experience: profile.experience,
            education: profile.education,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
