//! Classic layout: one serif column under a centered header.

use crate::layout::mappers::{
    accent_rgb, contact_items, date_range, degree_line, has_text, join_technologies, present,
    ContactField,
};
use crate::layout::selector::LayoutRenderer;
use crate::layout::tree::{
    Chip, Column, ColumnRole, FontFamily, HeaderAlignment, HeaderBlock, Heading, ItemBlock,
    LayoutTree, PageGeometry, Rgb, Row, Rule, SectionBlock, TextRun, TextStyle,
};
use crate::models::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, ResumeContent, SectionKind,
    SkillEntry, TemplateId,
};

const MARGIN_PT: f32 = 40.0;
const SECTION_SPACING_PT: f32 = 20.0;
const ITEM_SPACING_PT: f32 = 12.0;

const BODY: TextStyle = TextStyle::new(FontFamily::Serif, 10.0, Rgb::GRAY_800).line_height(1.5);
const TITLE: TextStyle = TextStyle::new(FontFamily::Serif, 10.0, Rgb::GRAY_800).bold();
const SUBTITLE: TextStyle = TextStyle::new(FontFamily::Serif, 10.0, Rgb::GRAY_800).italic();
const META: TextStyle = TextStyle::new(FontFamily::Serif, 8.0, Rgb::GRAY_500);
const SKILL: TextStyle = TextStyle::new(FontFamily::Serif, 9.0, Rgb::GRAY_800);
const LINK: TextStyle = TextStyle::new(FontFamily::Serif, 8.0, Rgb::BLUE_600);

const CONTACT_FIELDS: [ContactField; 5] = [
    ContactField::Email,
    ContactField::Phone,
    ContactField::Location,
    ContactField::Linkedin,
    ContactField::Website,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassicRenderer;

impl LayoutRenderer for ClassicRenderer {
    fn template(&self) -> TemplateId {
        TemplateId::MinimalClassic
    }

    fn render(&self, content: &ResumeContent) -> LayoutTree {
        let accent = accent_rgb(&content.metadata.accent_color, Rgb::GRAY_800);
        let mut sections = Vec::new();

        if has_text(&content.summary) {
            let rows = Row::text(&content.summary, BODY).into_iter().collect();
            sections.push(section(
                SectionKind::Summary,
                "Professional Summary",
                accent,
                vec![ItemBlock::plain(None, rows, 0.0)],
            ));
        }
        if !content.experience.is_empty() {
            let items = content.experience.iter().map(experience_item).collect();
            sections.push(section(SectionKind::Experience, "Experience", accent, items));
        }
        if !content.education.is_empty() {
            let items = content.education.iter().map(education_item).collect();
            sections.push(section(SectionKind::Education, "Education", accent, items));
        }
        if !content.skills.is_empty() {
            sections.push(section(
                SectionKind::Skills,
                "Skills",
                accent,
                vec![skills_item(&content.skills)],
            ));
        }
        if !content.projects.is_empty() {
            let items = content.projects.iter().map(project_item).collect();
            sections.push(section(SectionKind::Projects, "Projects", accent, items));
        }

        LayoutTree {
            template: self.template(),
            page: PageGeometry::a4(MARGIN_PT, 0.0),
            header: header(&content.personal_info, accent),
            columns: vec![Column {
                role: ColumnRole::Single,
                width_fraction: 1.0,
                sections,
            }],
        }
    }
}

fn header(info: &PersonalInfo, accent: Rgb) -> HeaderBlock {
    let contact = TextStyle::new(FontFamily::Serif, 8.0, Rgb::GRAY_500);
    HeaderBlock {
        alignment: HeaderAlignment::Center,
        band: None,
        name: TextRun::new(
            info.full_name.trim().to_uppercase(),
            TextStyle::new(FontFamily::Serif, 20.0, accent).bold(),
        ),
        subtitle: None,
        contacts: contact_items(info, &CONTACT_FIELDS)
            .into_iter()
            .map(|(_, value)| TextRun::new(value, contact))
            .collect(),
        contact_separator: " • ".to_string(),
        rule_below: Some(Rule {
            color: Rgb::GRAY_800,
            thickness_pt: 2.0,
        }),
        padding_pt: 12.0,
        spacing_after_pt: SECTION_SPACING_PT,
    }
}

fn section(kind: SectionKind, title: &str, accent: Rgb, items: Vec<ItemBlock>) -> SectionBlock {
    SectionBlock {
        kind,
        heading: Heading {
            text: TextRun::new(title.to_uppercase(), TITLE.color(accent)),
            marker: None,
            rule: Some(Rule {
                color: Rgb::GRAY_300,
                thickness_pt: 1.0,
            }),
        },
        items,
        spacing_after_pt: SECTION_SPACING_PT,
    }
}

fn experience_item(entry: &ExperienceEntry) -> ItemBlock {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current);
    let rows = [
        Row::split(&entry.position, dates.as_deref(), TITLE, META),
        Row::split(&entry.company, Some(entry.location.as_str()), SUBTITLE, META),
        Row::text(&entry.description, BODY),
    ];
    ItemBlock::plain(Some(entry.id), rows.into_iter().flatten().collect(), ITEM_SPACING_PT)
}

fn education_item(entry: &EducationEntry) -> ItemBlock {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current);
    let degree = degree_line(&entry.degree, &entry.field_of_study).unwrap_or_default();
    let score = present(entry.score.as_deref()).map(|s| format!("GPA: {s}"));
    let rows = [
        Row::split(&entry.institution, dates.as_deref(), TITLE, META),
        Row::split(&degree, score.as_deref(), BODY, META),
    ];
    ItemBlock::plain(Some(entry.id), rows.into_iter().flatten().collect(), ITEM_SPACING_PT)
}

/// All skills share one flowing row of `name (Level)` items.
fn skills_item(skills: &[SkillEntry]) -> ItemBlock {
    let chips = skills
        .iter()
        .map(|skill| Chip {
            source_id: skill.id,
            text: TextRun::new(skill_label(skill), SKILL),
            background: None,
            padding_pt: 0.0,
        })
        .collect();
    ItemBlock::plain(None, vec![Row::Chips { chips, gap_pt: 16.0 }], 0.0)
}

fn skill_label(skill: &SkillEntry) -> String {
    let name = skill.name.trim();
    if name.is_empty() {
        format!("({})", skill.level)
    } else {
        format!("{name} ({})", skill.level)
    }
}

fn project_item(entry: &ProjectEntry) -> ItemBlock {
    let link = present(entry.link.as_deref()).map(|_| "Link");
    let technologies = join_technologies(&entry.technologies, ", ").unwrap_or_default();
    let rows = [
        Row::split(&entry.name, link, TITLE, LINK),
        Row::text(&technologies, META),
        Row::text(&entry.description, BODY),
    ];
    ItemBlock::plain(Some(entry.id), rows.into_iter().flatten().collect(), ITEM_SPACING_PT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::make_content;
    use uuid::Uuid;

    #[test]
    fn test_sections_follow_fixed_order_in_one_column() {
        let tree = ClassicRenderer.render(&make_content());
        assert_eq!(tree.columns.len(), 1);
        let kinds: Vec<SectionKind> = tree.sections().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
                SectionKind::Projects,
            ]
        );
        assert_eq!(
            tree.section(SectionKind::Summary).unwrap().heading.text.text,
            "PROFESSIONAL SUMMARY"
        );
    }

    #[test]
    fn test_empty_content_has_no_sections() {
        let tree = ClassicRenderer.render(&ResumeContent::default());
        assert_eq!(tree.sections().count(), 0);
        assert_eq!(tree.header.name.text, "");
        assert!(tree.header.contacts.is_empty());
    }

    #[test]
    fn test_blank_summary_is_omitted() {
        let mut content = make_content();
        content.summary = "   \n ".to_string();
        let tree = ClassicRenderer.render(&content);
        assert!(tree.section(SectionKind::Summary).is_none());
    }

    #[test]
    fn test_header_centered_uppercase_with_bullet_contacts() {
        let tree = ClassicRenderer.render(&make_content());
        assert_eq!(tree.header.alignment, HeaderAlignment::Center);
        assert_eq!(tree.header.name.text, "ADA LOVELACE");
        assert_eq!(tree.header.contact_separator, " • ");
        let contacts: Vec<&str> = tree.header.contacts.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            contacts,
            ["ada@example.com", "555-123-4567", "London", "in/ada"]
        );
    }

    #[test]
    fn test_experience_shows_present_for_current_role() {
        let content = make_content();
        let tree = ClassicRenderer.render(&content);
        let texts = tree.section(SectionKind::Experience).unwrap().items[0].texts();
        assert!(texts.contains(&"01/2022 – Present"), "{texts:?}");
        assert_eq!(content.experience[0].end_date, "06/2023");
    }

    #[test]
    fn test_education_degree_and_gpa() {
        let tree = ClassicRenderer.render(&make_content());
        let texts = tree.section(SectionKind::Education).unwrap().items[0].texts();
        assert!(texts.contains(&"BSc in Mathematics"));
        assert!(texts.contains(&"GPA: 3.9"));
    }

    #[test]
    fn test_education_without_score_drops_only_gpa() {
        let mut content = make_content();
        content.education[0].score = None;
        content.education[0].field_of_study.clear();
        let tree = ClassicRenderer.render(&content);
        let texts = tree.section(SectionKind::Education).unwrap().items[0].texts();
        assert!(texts.contains(&"BSc"));
        assert!(!texts.iter().any(|t| t.starts_with("GPA")));
    }

    #[test]
    fn test_skills_render_name_and_level_text() {
        let content = make_content();
        let tree = ClassicRenderer.render(&content);
        let skills = tree.section(SectionKind::Skills).unwrap();
        assert_eq!(
            skills.items[0].texts(),
            ["Go (Expert)", "Rust (Advanced)", "SQL (Beginner)"]
        );
        let ids: Vec<Uuid> = content.skills.iter().map(|s| s.id).collect();
        assert_eq!(skills.entry_ids(), ids);
    }

    #[test]
    fn test_projects_link_marker_and_technologies() {
        let tree = ClassicRenderer.render(&make_content());
        let projects = tree.section(SectionKind::Projects).unwrap();
        let first = projects.items[0].texts();
        assert!(first.contains(&"Link"));
        assert!(first.contains(&"Rust, PostgreSQL"));
        let second = projects.items[1].texts();
        assert!(!second.contains(&"Link"));
    }

    #[test]
    fn test_accent_colours_name_and_headings() {
        let mut content = make_content();
        content.metadata.accent_color = "#2563eb".to_string();
        let tree = ClassicRenderer.render(&content);
        assert_eq!(tree.header.name.style.color, Rgb::BLUE_600);
        assert!(tree.sections().all(|s| s.heading.text.style.color == Rgb::BLUE_600));
    }

    #[test]
    fn test_render_is_deterministic_and_keeps_order() {
        let content = make_content();
        let tree = ClassicRenderer.render(&content);
        assert_eq!(tree, ClassicRenderer.render(&content));

        let experience = tree.section(SectionKind::Experience).unwrap();
        let expected: Vec<Uuid> = content.experience.iter().map(|e| e.id).collect();
        assert_eq!(experience.entry_ids(), expected);
    }
}
