//! Typed partial updates, one struct per record kind.
//!
//! Every field is optional; only `Some` fields are written. Model fields that
//! are themselves optional use `Option<Option<_>>` so a patch can clear them
//! (`Some(None)`) as well as set them. Unknown keys are rejected when a patch
//! is deserialized from host input.

use serde::{Deserialize, Deserializer};

use crate::models::resume::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, SkillEntry, SkillLevel,
};

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
}

impl PersonalInfoPatch {
    pub fn apply_to(self, info: &mut PersonalInfo) {
        set(&mut info.full_name, self.full_name);
        set(&mut info.email, self.email);
        set(&mut info.phone, self.phone);
        set(&mut info.location, self.location);
        set(&mut info.website, self.website);
        set(&mut info.linkedin, self.linkedin);
        set(&mut info.github, self.github);
        set(&mut info.avatar, self.avatar);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl ExperiencePatch {
    pub fn apply_to(self, entry: &mut ExperienceEntry) {
        set(&mut entry.company, self.company);
        set(&mut entry.position, self.position);
        set(&mut entry.start_date, self.start_date);
        set(&mut entry.end_date, self.end_date);
        set(&mut entry.current, self.current);
        set(&mut entry.location, self.location);
        set(&mut entry.description, self.description);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EducationPatch {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub score: Option<Option<String>>,
}

impl EducationPatch {
    pub fn apply_to(self, entry: &mut EducationEntry) {
        set(&mut entry.institution, self.institution);
        set(&mut entry.degree, self.degree);
        set(&mut entry.field_of_study, self.field_of_study);
        set(&mut entry.start_date, self.start_date);
        set(&mut entry.end_date, self.end_date);
        set(&mut entry.current, self.current);
        set(&mut entry.score, self.score);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<SkillLevel>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
}

impl SkillPatch {
    pub fn apply_to(self, entry: &mut SkillEntry) {
        set(&mut entry.name, self.name);
        set(&mut entry.level, self.level);
        set(&mut entry.category, self.category);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<String>>,
}

impl ProjectPatch {
    pub fn apply_to(self, entry: &mut ProjectEntry) {
        set(&mut entry.name, self.name);
        set(&mut entry.description, self.description);
        set(&mut entry.technologies, self.technologies);
        set(&mut entry.link, self.link);
        set(&mut entry.start_date, self.start_date);
        set(&mut entry.end_date, self.end_date);
    }
}
