//! Small pure functions turning content fields into display values.
//!
//! Everything here is computed at render time only; nothing is written back
//! into the content model.

use tracing::debug;

use crate::layout::tree::Rgb;
use crate::models::{ExperienceEntry, PersonalInfo, SkillLevel};

pub const PRESENT: &str = "Present";
pub const DEFAULT_SUBTITLE: &str = "Professional";
const RANGE_DASH: &str = " – ";

/// Share of a full indicator for a proficiency level.
pub fn skill_proportion(level: SkillLevel) -> f32 {
    match level {
        SkillLevel::Beginner => 0.25,
        SkillLevel::Intermediate => 0.50,
        SkillLevel::Advanced => 0.75,
        SkillLevel::Expert => 1.00,
    }
}

/// `skill_proportion` as a whole percentage.
pub fn skill_percent(level: SkillLevel) -> u8 {
    (skill_proportion(level) * 100.0).round() as u8
}

/// `start – end`, with `Present` standing in for the end of an ongoing entry.
///
/// A missing side drops the dash; a range with neither side is `None`.
pub fn date_range(start: &str, end: &str, current: bool) -> Option<String> {
    let start = start.trim();
    let end = if current { PRESENT } else { end.trim() };
    match (start.is_empty(), end.is_empty()) {
        (true, true) => None,
        (false, true) => Some(start.to_string()),
        (true, false) => Some(end.to_string()),
        (false, false) => Some(format!("{start}{RANGE_DASH}{end}")),
    }
}

/// Collapses whitespace runs to one space and trims the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins project technologies in their stored order. Casing is untouched;
/// tags that are blank after whitespace normalization are skipped.
pub fn join_technologies(technologies: &[String], separator: &str) -> Option<String> {
    let tags: Vec<String> = technologies
        .iter()
        .map(|t| normalize_whitespace(t))
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(separator))
    }
}

/// Joins the non-blank parts with `separator`; `None` when all are blank.
pub fn join_present(parts: &[&str], separator: &str) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(separator))
    }
}

/// `Degree in Field`, degrading to whichever half is present.
pub fn degree_line(degree: &str, field_of_study: &str) -> Option<String> {
    join_present(&[degree, field_of_study], " in ")
}

/// The subtitle shown under the name by layouts that derive one: the first
/// experience entry's position, or a generic label.
pub fn derived_subtitle(experience: &[ExperienceEntry]) -> String {
    experience
        .first()
        .map(|e| e.position.trim())
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SUBTITLE)
        .to_string()
}

/// Which contact fields a layout shows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Email,
    Phone,
    Location,
    Linkedin,
    Website,
}

impl ContactField {
    fn read(self, info: &PersonalInfo) -> &str {
        match self {
            ContactField::Email => &info.email,
            ContactField::Phone => &info.phone,
            ContactField::Location => &info.location,
            ContactField::Linkedin => &info.linkedin,
            ContactField::Website => &info.website,
        }
    }
}

/// Non-blank contact values for the requested fields, in the requested order.
pub fn contact_items(info: &PersonalInfo, fields: &[ContactField]) -> Vec<(ContactField, String)> {
    fields
        .iter()
        .filter_map(|&field| {
            let value = field.read(info).trim();
            (!value.is_empty()).then(|| (field, value.to_string()))
        })
        .collect()
}

/// The metadata accent colour, or `fallback` when it is not a hex colour.
pub fn accent_rgb(accent: &str, fallback: Rgb) -> Rgb {
    Rgb::from_hex(accent).unwrap_or_else(|| {
        debug!("Ignoring unparseable accent colour '{accent}'");
        fallback
    })
}

/// True when a free-text field has something to show.
pub fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Non-blank optional field, trimmed.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_skill_proportion_exact_mapping() {
        assert_eq!(skill_proportion(SkillLevel::Beginner), 0.25);
        assert_eq!(skill_proportion(SkillLevel::Intermediate), 0.50);
        assert_eq!(skill_proportion(SkillLevel::Advanced), 0.75);
        assert_eq!(skill_proportion(SkillLevel::Expert), 1.00);
        let percents: Vec<u8> = SkillLevel::ALL.into_iter().map(skill_percent).collect();
        assert_eq!(percents, [25, 50, 75, 100]);
    }

    #[test]
    fn test_date_range_closed_and_current() {
        assert_eq!(
            date_range("01/2020", "01/2022", false).as_deref(),
            Some("01/2020 – 01/2022")
        );
        assert_eq!(
            date_range("01/2020", "01/2022", true).as_deref(),
            Some("01/2020 – Present")
        );
    }

    #[test]
    fn test_date_range_missing_sides() {
        assert_eq!(date_range("", "", false), None);
        assert_eq!(date_range("2019", "", false).as_deref(), Some("2019"));
        assert_eq!(date_range("", "2021", false).as_deref(), Some("2021"));
        assert_eq!(date_range("", "", true).as_deref(), Some("Present"));
    }

    #[test]
    fn test_join_technologies_keeps_order_and_case() {
        let techs = vec![
            "  Rust ".to_string(),
            "PostgreSQL".to_string(),
            "   ".to_string(),
            "GitHub   Actions".to_string(),
        ];
        assert_eq!(
            join_technologies(&techs, ", ").as_deref(),
            Some("Rust, PostgreSQL, GitHub Actions")
        );
        assert_eq!(join_technologies(&[], " • "), None);
    }

    #[test]
    fn test_degree_line_omits_missing_half() {
        assert_eq!(
            degree_line("BSc", "Physics").as_deref(),
            Some("BSc in Physics")
        );
        assert_eq!(degree_line("BSc", "").as_deref(), Some("BSc"));
        assert_eq!(degree_line("", "").as_deref(), None);
    }

    #[test]
    fn test_derived_subtitle_uses_first_position_or_fallback() {
        assert_eq!(derived_subtitle(&[]), "Professional");

        let mut first = ExperienceEntry::blank(Uuid::new_v4());
        first.position = "Staff Engineer".to_string();
        let mut second = ExperienceEntry::blank(Uuid::new_v4());
        second.position = "Intern".to_string();
        assert_eq!(derived_subtitle(&[first.clone(), second]), "Staff Engineer");

        first.position = "  ".to_string();
        assert_eq!(derived_subtitle(&[first]), "Professional");
    }

    #[test]
    fn test_accent_rgb_falls_back_on_garbage() {
        assert_eq!(accent_rgb("#2563eb", Rgb::BLACK), Rgb::BLUE_600);
        assert_eq!(accent_rgb("teal", Rgb::GRAY_800), Rgb::GRAY_800);
        assert_eq!(accent_rgb("", Rgb::BLACK), Rgb::BLACK);
    }

    #[test]
    fn test_contact_items_skip_blank_and_follow_requested_order() {
        let info = PersonalInfo {
            email: "a@b.co".to_string(),
            phone: " ".to_string(),
            linkedin: "in/ada".to_string(),
            ..Default::default()
        };
        let items = contact_items(
            &info,
            &[ContactField::Linkedin, ContactField::Phone, ContactField::Email],
        );
        assert_eq!(
            items,
            vec![
                (ContactField::Linkedin, "in/ada".to_string()),
                (ContactField::Email, "a@b.co".to_string()),
            ]
        );
    }
}
