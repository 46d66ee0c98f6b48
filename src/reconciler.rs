// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Pure transformation logic between request payloads and profile updates.
//!
//! Nothing in this module touches the database: handlers feed payloads in,
//! get an update document or a mutated list back, and persist the result
//! themselves. Same payload plus same user id always yields the same output.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::FieldError;
use crate::models::{
    Education, EducationList, Experience, ExperienceList, NewProfile, Profile, SocialLinks,
};

/// Create-or-update request body. Every field is optional at the type level;
/// `validate` enforces the creation-time requirements.
#[derive(Debug, Default, Deserialize)]
pub struct ProfilePayload {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub skills: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "githubusername")]
    pub github_username: Option<String>,
    pub experience: Option<ExperienceList>,
    pub education: Option<EducationList>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
}

impl ProfilePayload {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if is_blank(&self.status) {
            errors.push(FieldError::body("status", "Status is required"));
        }
        if is_blank(&self.skills) {
            errors.push(FieldError::body("skills", "Skills is required"));
        }
        errors
    }
}

/// Partial-update document produced by [`build_update`]. `user` is always the
/// authenticated identity; a payload has no way to supply it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub user: Uuid,
    pub status: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social: SocialLinks,
    pub experience: Option<ExperienceList>,
    pub education: Option<EducationList>,
}

/// Build the partial-update document for one profile. Fields the caller
/// omitted (or sent empty) never appear in the document, so the stored value
/// survives the upsert untouched.
pub fn build_update(payload: ProfilePayload, user: Uuid) -> ProfileUpdate {
    ProfileUpdate {
        user,
        status: non_empty(payload.status),
        company: non_empty(payload.company),
        website: non_empty(payload.website),
        location: non_empty(payload.location),
        bio: non_empty(payload.bio),
        github_username: non_empty(payload.github_username),
        skills: non_empty(payload.skills).map(|raw| parse_skills(&raw)),
        social: SocialLinks {
            youtube: non_empty(payload.youtube),
            twitter: non_empty(payload.twitter),
            instagram: non_empty(payload.instagram),
            linkedin: non_empty(payload.linkedin),
            facebook: non_empty(payload.facebook),
        },
        experience: payload.experience,
        education: payload.education,
    }
}

/// Split a comma-separated skills string into trimmed segments, preserving
/// order. Re-joining with commas and re-parsing yields the same sequence.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',').map(|skill| skill.trim().to_string()).collect()
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

impl ProfileUpdate {
    /// Structural merge against the stored record: set fields overwrite,
    /// unset fields preserve, skills replace wholesale, social merges at the
    /// key level, list fields replace only when present (bulk path).
    pub fn merge_into(&self, profile: &mut Profile) {
        if let Some(status) = &self.status {
            profile.status = status.clone();
        }
        if self.company.is_some() {
            profile.company = self.company.clone();
        }
        if self.website.is_some() {
            profile.website = self.website.clone();
        }
        if self.location.is_some() {
            profile.location = self.location.clone();
        }
        if self.bio.is_some() {
            profile.bio = self.bio.clone();
        }
        if self.github_username.is_some() {
            profile.github_username = self.github_username.clone();
        }
        if let Some(skills) = &self.skills {
            profile.skills = skills.clone();
        }
        profile.social.merge(&self.social);
        if let Some(experience) = &self.experience {
            profile.experience = experience.clone();
        }
        if let Some(education) = &self.education {
            profile.education = education.clone();
        }
    }

    /// Seed a fresh record from the update document. Unset collections start
    /// empty; `status`/`skills` are guaranteed present by validation.
    pub fn into_new_profile(self) -> NewProfile {
        NewProfile {
            user_id: self.user,
            status: self.status.unwrap_or_default(),
            company: self.company,
            website: self.website,
            location: self.location,
            bio: self.bio,
            github_username: self.github_username,
            skills: self.skills.unwrap_or_default(),
            social: self.social,
            experience: self.experience.unwrap_or_default(),
            education: self.education.unwrap_or_default(),
        }
    }
}

/// Which nested list a list operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Experience,
    Education,
}

impl ListKind {
    pub fn noun(self) -> &'static str {
        match self {
            ListKind::Experience => "experience",
            ListKind::Education => "education",
        }
    }
}

/// Failure modes of [`remove`] on a nested list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveError {
    /// The target list has zero elements.
    Empty(ListKind),
    /// No element carries the requested id; the list is left unmodified.
    NotFound(ListKind),
}

fn remove_entry<T>(
    entries: &mut Vec<T>,
    id: Uuid,
    kind: ListKind,
    entry_id: impl Fn(&T) -> Uuid,
) -> Result<T, RemoveError> {
    if entries.is_empty() {
        return Err(RemoveError::Empty(kind));
    }
    // First match wins; ids are generated unique but not enforced as such.
    let index = entries
        .iter()
        .position(|entry| entry_id(entry) == id)
        .ok_or(RemoveError::NotFound(kind))?;
    Ok(entries.remove(index))
}

impl ExperienceList {
    /// Insert at the front: lists read newest-first.
    pub fn prepend(&mut self, entry: Experience) {
        self.0.insert(0, entry);
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Experience, RemoveError> {
        remove_entry(&mut self.0, id, ListKind::Experience, |entry| entry.id)
    }
}

impl EducationList {
    /// Insert at the front: lists read newest-first.
    pub fn prepend(&mut self, entry: Education) {
        self.0.insert(0, entry);
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Education, RemoveError> {
        remove_entry(&mut self.0, id, ListKind::Education, |entry| entry.id)
    }
}

/// Single-item add request for the experience list.
#[derive(Debug, Default, Deserialize)]
pub struct ExperiencePayload {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl ExperiencePayload {
    /// Validate and convert to a list entry with a freshly generated id.
    pub fn into_entry(self) -> Result<Experience, Vec<FieldError>> {
        let mut errors = Vec::new();
        if is_blank(&self.title) {
            errors.push(FieldError::body("title", "Title is required"));
        }
        if is_blank(&self.company) {
            errors.push(FieldError::body("company", "Company is required"));
        }
        if self.from.is_none() {
            errors.push(FieldError::body(
                "from",
                "From date is required and needs to be from the past",
            ));
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Experience {
            id: Uuid::new_v4(),
            title: self.title.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            location: self.location,
            from: self.from.unwrap_or_default(),
            to: self.to,
            current: self.current,
            description: self.description,
        })
    }
}

/// Single-item add request for the education list.
#[derive(Debug, Default, Deserialize)]
pub struct EducationPayload {
    pub school: Option<String>,
    pub degree: Option<String>,
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl EducationPayload {
    /// Validate and convert to a list entry with a freshly generated id.
    pub fn into_entry(self) -> Result<Education, Vec<FieldError>> {
        let mut errors = Vec::new();
        if is_blank(&self.school) {
            errors.push(FieldError::body("school", "school is required"));
        }
        if is_blank(&self.degree) {
            errors.push(FieldError::body("degree", "degree is required"));
        }
        if is_blank(&self.field_of_study) {
            errors.push(FieldError::body("fieldofstudy", "fieldofstudy is required"));
        }
        if self.from.is_none() {
            errors.push(FieldError::body(
                "from",
                "From date is required and needs to be from the past",
            ));
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Education {
            id: Uuid::new_v4(),
            school: self.school.unwrap_or_default(),
            degree: self.degree.unwrap_or_default(),
            field_of_study: self.field_of_study.unwrap_or_default(),
            from: self.from.unwrap_or_default(),
            to: self.to,
            current: self.current,
            description: self.description,
        })
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user() -> Uuid {
        Uuid::new_v4()
    }

    fn entry(title: &str) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            to: None,
            current: false,
            description: None,
        }
    }

    fn stored_profile(user_id: Uuid) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id,
            status: "dev".to_string(),
            company: Some("Acme".to_string()),
            website: None,
            location: Some("Berlin".to_string()),
            bio: None,
            github_username: None,
            skills: vec!["go".to_string()],
            social: SocialLinks {
                twitter: Some("@old".to_string()),
                youtube: Some("yt".to_string()),
                ..Default::default()
            },
            experience: ExperienceList::default(),
            education: EducationList::default(),
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn build_update_omits_absent_fields() {
        let id = user();
        let update = build_update(ProfilePayload::default(), id);
        assert_eq!(update.user, id);
        assert!(update.status.is_none());
        assert!(update.company.is_none());
        assert!(update.skills.is_none());
        assert!(update.experience.is_none());
        assert_eq!(update.social, SocialLinks::default());
    }

    #[test]
    fn build_update_drops_empty_strings() {
        let payload = ProfilePayload {
            company: Some(String::new()),
            status: Some("dev".to_string()),
            ..Default::default()
        };
        let update = build_update(payload, user());
        assert!(update.company.is_none());
        assert_eq!(update.status.as_deref(), Some("dev"));
    }

    #[test]
    fn build_update_is_deterministic() {
        let id = user();
        let payload = || ProfilePayload {
            status: Some("dev".to_string()),
            skills: Some("go, rust".to_string()),
            twitter: Some("@me".to_string()),
            ..Default::default()
        };
        assert_eq!(build_update(payload(), id), build_update(payload(), id));
    }

    #[test]
    fn skills_are_split_and_trimmed() {
        assert_eq!(parse_skills("go, rust , ts"), vec!["go", "rust", "ts"]);
    }

    #[test]
    fn skills_parsing_is_idempotent() {
        for raw in ["go, rust , ts", "a,,b", "solo", " x ,y,"] {
            let parsed = parse_skills(raw);
            assert_eq!(parse_skills(&parsed.join(",")), parsed);
        }
    }

    #[test]
    fn social_keys_set_only_when_present() {
        let payload = ProfilePayload {
            twitter: Some("@me".to_string()),
            linkedin: Some(String::new()),
            ..Default::default()
        };
        let update = build_update(payload, user());
        assert_eq!(update.social.twitter.as_deref(), Some("@me"));
        assert!(update.social.linkedin.is_none());
        assert!(update.social.youtube.is_none());
    }

    #[test]
    fn merge_preserves_unset_and_overwrites_set() {
        let id = user();
        let mut profile = stored_profile(id);
        let payload = ProfilePayload {
            status: Some("senior dev".to_string()),
            skills: Some("rust, ts".to_string()),
            twitter: Some("@new".to_string()),
            ..Default::default()
        };
        build_update(payload, id).merge_into(&mut profile);

        assert_eq!(profile.status, "senior dev");
        assert_eq!(profile.skills, vec!["rust", "ts"]);
        // Unset scalars keep stored values
        assert_eq!(profile.company.as_deref(), Some("Acme"));
        assert_eq!(profile.location.as_deref(), Some("Berlin"));
        // Social merges at the key level
        assert_eq!(profile.social.twitter.as_deref(), Some("@new"));
        assert_eq!(profile.social.youtube.as_deref(), Some("yt"));
    }

    #[test]
    fn merge_is_idempotent_under_noop_updates() {
        let id = user();
        let mut profile = stored_profile(id);
        let before = profile.clone();
        let payload = ProfilePayload {
            status: Some(before.status.clone()),
            company: before.company.clone(),
            location: before.location.clone(),
            skills: Some(before.skills.join(",")),
            ..Default::default()
        };
        build_update(payload, id).merge_into(&mut profile);
        assert_eq!(profile, before);
    }

    #[test]
    fn new_profile_defaults_unset_collections() {
        let id = user();
        let payload = ProfilePayload {
            status: Some("dev".to_string()),
            skills: Some("go".to_string()),
            ..Default::default()
        };
        let record = build_update(payload, id).into_new_profile();
        assert_eq!(record.user_id, id);
        assert_eq!(record.status, "dev");
        assert_eq!(record.skills, vec!["go"]);
        assert!(record.experience.is_empty());
        assert!(record.education.is_empty());
    }

    #[test]
    fn prepend_inserts_at_front() {
        let mut list = ExperienceList(vec![entry("first")]);
        list.prepend(entry("second"));
        assert_eq!(list.0[0].title, "second");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn add_then_remove_restores_length() {
        let mut list = ExperienceList(vec![entry("existing")]);
        let before = list.len();
        let added = entry("temp");
        let added_id = added.id;
        list.prepend(added);
        list.remove(added_id).unwrap();
        assert_eq!(list.len(), before);
        assert_eq!(list.0[0].title, "existing");
    }

    #[test]
    fn remove_on_empty_list_reports_empty() {
        let mut list = ExperienceList::default();
        assert_eq!(
            list.remove(Uuid::new_v4()),
            Err(RemoveError::Empty(ListKind::Experience))
        );
    }

    #[test]
    fn remove_unknown_id_leaves_list_unmodified() {
        let mut list = EducationList(vec![Education {
            id: Uuid::new_v4(),
            school: "MIT".to_string(),
            degree: "BSc".to_string(),
            field_of_study: "CS".to_string(),
            from: NaiveDate::from_ymd_opt(2015, 9, 1).unwrap(),
            to: None,
            current: true,
            description: None,
        }]);
        let before = list.clone();
        assert_eq!(
            list.remove(Uuid::new_v4()),
            Err(RemoveError::NotFound(ListKind::Education))
        );
        assert_eq!(list, before);
    }

    #[test]
    fn remove_takes_first_match() {
        let shared = Uuid::new_v4();
        let mut first = entry("one");
        first.id = shared;
        let mut second = entry("two");
        second.id = shared;
        let mut list = ExperienceList(vec![first, second]);
        let removed = list.remove(shared).unwrap();
        assert_eq!(removed.title, "one");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn profile_payload_requires_status_and_skills() {
        let errors = ProfilePayload::default().validate();
        let params: Vec<_> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["status", "skills"]);
        assert_eq!(errors[0].msg, "Status is required");
        assert_eq!(errors[1].msg, "Skills is required");
    }

    #[test]
    fn experience_payload_requires_company() {
        let payload = ExperiencePayload {
            title: Some("Engineer".to_string()),
            from: NaiveDate::from_ymd_opt(2021, 3, 1),
            ..Default::default()
        };
        let errors = payload.into_entry().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Company is required");
        assert_eq!(errors[0].param, "company");
    }

    #[test]
    fn education_payload_requires_all_named_fields() {
        let errors = EducationPayload::default().into_entry().unwrap_err();
        let params: Vec<_> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["school", "degree", "fieldofstudy", "from"]);
    }

    #[test]
    fn valid_experience_payload_gets_generated_id() {
        let payload = ExperiencePayload {
            title: Some("Engineer".to_string()),
            company: Some("Acme".to_string()),
            from: NaiveDate::from_ymd_opt(2021, 3, 1),
            current: true,
            ..Default::default()
        };
        let entry = payload.into_entry().unwrap();
        assert!(!entry.id.is_nil());
        assert!(entry.current);
    }
}
