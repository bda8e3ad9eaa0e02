//! Corporate layout: a full-width blue band over a two-column body.
//!
//! Profile, experience and projects flow in the wide primary column;
//! education and skills sit in the narrow secondary column. Column placement
//! is fixed per section and never depends on the content.

use crate::layout::mappers::{
    contact_items, date_range, has_text, join_present, join_technologies, skill_proportion,
    ContactField,
};
use crate::layout::selector::LayoutRenderer;
use crate::layout::tree::{
    Chip, Column, ColumnRole, FontFamily, HeaderAlignment, HeaderBlock, Heading, ItemBlock,
    LayoutTree, PageGeometry, Rgb, Row, Rule, SectionBlock, TextRun, TextStyle,
};
use crate::models::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, ResumeContent, SectionKind,
    SkillEntry, SkillLevel, TemplateId,
};

/// The fixed brand colour of this layout; the accent setting does not apply.
pub const CORPORATE_BLUE: Rgb = Rgb::BLUE_900;

const MARGIN_PT: f32 = 40.0;
const COLUMN_GAP_PT: f32 = 24.0;
const SECTION_SPACING_PT: f32 = 24.0;

const HEADING: TextStyle = TextStyle::new(FontFamily::Sans, 11.0, CORPORATE_BLUE).bold();
const ITEM_TITLE: TextStyle = TextStyle::new(FontFamily::Sans, 12.0, Rgb::GRAY_800).bold();
const COMPANY: TextStyle = TextStyle::new(FontFamily::Sans, 10.0, Rgb::BLUE_800).bold();
const META: TextStyle = TextStyle::new(FontFamily::Sans, 8.0, Rgb::GRAY_500);
const BODY: TextStyle = TextStyle::new(FontFamily::Sans, 10.0, Rgb::GRAY_700).line_height(1.5);
const SIDEBAR_TITLE: TextStyle = TextStyle::new(FontFamily::Sans, 10.0, Rgb::GRAY_800).bold();
const SIDEBAR_TEXT: TextStyle = TextStyle::new(FontFamily::Sans, 9.0, Rgb::GRAY_800);
const CHIP: TextStyle = TextStyle::new(FontFamily::Sans, 8.0, CORPORATE_BLUE).bold();

const CONTACT_FIELDS: [ContactField; 4] = [
    ContactField::Email,
    ContactField::Phone,
    ContactField::Location,
    ContactField::Linkedin,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorporateRenderer;

impl LayoutRenderer for CorporateRenderer {
    fn template(&self) -> TemplateId {
        TemplateId::CorporateBlue
    }

    fn render(&self, content: &ResumeContent) -> LayoutTree {
        let mut primary = Vec::new();
        let mut secondary = Vec::new();

        if has_text(&content.summary) {
            let rows = Row::text(&content.summary, BODY.line_height(1.6))
                .into_iter()
                .collect();
            primary.push(section(
                SectionKind::Summary,
                "Profile",
                vec![ItemBlock::plain(None, rows, 0.0)],
            ));
        }
        if !content.experience.is_empty() {
            let items = content.experience.iter().map(experience_item).collect();
            primary.push(section(SectionKind::Experience, "Experience", items));
        }
        if !content.projects.is_empty() {
            let items = content.projects.iter().map(project_item).collect();
            primary.push(section(SectionKind::Projects, "Projects", items));
        }
        if !content.education.is_empty() {
            let items = content.education.iter().map(education_item).collect();
            secondary.push(section(SectionKind::Education, "Education", items));
        }
        if !content.skills.is_empty() {
            secondary.push(section(
                SectionKind::Skills,
                "Skills",
                vec![skills_item(&content.skills)],
            ));
        }

        LayoutTree {
            template: self.template(),
            page: PageGeometry::a4(MARGIN_PT, COLUMN_GAP_PT),
            header: header(&content.personal_info),
            columns: vec![
                Column {
                    role: ColumnRole::Primary,
                    width_fraction: 2.0 / 3.0,
                    sections: primary,
                },
                Column {
                    role: ColumnRole::Secondary,
                    width_fraction: 1.0 / 3.0,
                    sections: secondary,
                },
            ],
        }
    }
}

/// Chip background: lighter for lower proficiency.
pub fn chip_tint(level: SkillLevel) -> Rgb {
    CORPORATE_BLUE.tint(0.95 - 0.25 * skill_proportion(level))
}

fn header(info: &PersonalInfo) -> HeaderBlock {
    let contact = TextStyle::new(FontFamily::Sans, 9.0, Rgb::BLUE_200);
    HeaderBlock {
        alignment: HeaderAlignment::Left,
        band: Some(CORPORATE_BLUE),
        name: TextRun::new(
            info.full_name.trim(),
            TextStyle::new(FontFamily::Sans, 28.0, Rgb::WHITE).bold(),
        ),
        subtitle: None,
        contacts: contact_items(info, &CONTACT_FIELDS)
            .into_iter()
            .map(|(_, value)| TextRun::new(value, contact))
            .collect(),
        contact_separator: "   ".to_string(),
        rule_below: None,
        padding_pt: 32.0,
        spacing_after_pt: 32.0,
    }
}

fn section(kind: SectionKind, title: &str, items: Vec<ItemBlock>) -> SectionBlock {
    SectionBlock {
        kind,
        heading: Heading {
            text: TextRun::new(title.to_uppercase(), HEADING),
            marker: None,
            rule: Some(Rule {
                color: CORPORATE_BLUE,
                thickness_pt: 2.0,
            }),
        },
        items,
        spacing_after_pt: SECTION_SPACING_PT,
    }
}

fn experience_item(entry: &ExperienceEntry) -> ItemBlock {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current).unwrap_or_default();
    let meta = join_present(&[dates.as_str(), entry.location.as_str()], " | ").unwrap_or_default();
    let rows = [
        Row::text(&entry.position, ITEM_TITLE),
        Row::text(&entry.company, COMPANY),
        Row::text(&meta, META),
        Row::text(&entry.description, BODY),
    ];
    ItemBlock::plain(Some(entry.id), rows.into_iter().flatten().collect(), 16.0)
}

fn project_item(entry: &ProjectEntry) -> ItemBlock {
    let technologies = join_technologies(&entry.technologies, ", ").unwrap_or_default();
    let rows = [
        Row::text(&entry.name, ITEM_TITLE),
        Row::text(&technologies, META),
        Row::text(&entry.description, BODY),
    ];
    ItemBlock::plain(Some(entry.id), rows.into_iter().flatten().collect(), 16.0)
}

fn education_item(entry: &EducationEntry) -> ItemBlock {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current).unwrap_or_default();
    let rows = [
        Row::text(&entry.institution, SIDEBAR_TITLE),
        Row::text(&entry.degree, SIDEBAR_TEXT),
        Row::text(&entry.field_of_study, SIDEBAR_TEXT),
        Row::text(&dates, META),
    ];
    ItemBlock::plain(Some(entry.id), rows.into_iter().flatten().collect(), 14.0)
}

fn skills_item(skills: &[SkillEntry]) -> ItemBlock {
    let chips = skills
        .iter()
        .map(|skill| Chip {
            source_id: skill.id,
            text: TextRun::new(skill.name.trim(), CHIP),
            background: Some(chip_tint(skill.level)),
            padding_pt: 4.0,
        })
        .collect();
    ItemBlock::plain(None, vec![Row::Chips { chips, gap_pt: 6.0 }], 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::make_content;

    #[test]
    fn test_column_assignment_is_fixed() {
        let tree = CorporateRenderer.render(&make_content());
        assert_eq!(tree.column_of(SectionKind::Summary), Some(ColumnRole::Primary));
        assert_eq!(tree.column_of(SectionKind::Experience), Some(ColumnRole::Primary));
        assert_eq!(tree.column_of(SectionKind::Projects), Some(ColumnRole::Primary));
        assert_eq!(tree.column_of(SectionKind::Education), Some(ColumnRole::Secondary));
        assert_eq!(tree.column_of(SectionKind::Skills), Some(ColumnRole::Secondary));
        assert!(tree.columns[0].width_fraction > tree.columns[1].width_fraction);
    }

    #[test]
    fn test_header_band_is_corporate_blue() {
        let mut content = make_content();
        content.metadata.accent_color = "#ff0000".to_string();
        let tree = CorporateRenderer.render(&content);
        assert_eq!(tree.header.band, Some(CORPORATE_BLUE));
        assert_eq!(tree.header.name.text, "Ada Lovelace");
        assert_eq!(tree.header.name.style.color, Rgb::WHITE);
    }

    #[test]
    fn test_experience_meta_line_joins_dates_and_location() {
        let tree = CorporateRenderer.render(&make_content());
        let experience = tree.section(SectionKind::Experience).unwrap();
        assert!(experience.items[0].texts().contains(&"01/2022 – Present | London"));
        assert!(experience.items[1].texts().contains(&"03/2019 – 12/2021"));
    }

    #[test]
    fn test_skill_chips_keep_order_and_tint_by_level() {
        let content = make_content();
        let tree = CorporateRenderer.render(&content);
        let skills = tree.section(SectionKind::Skills).unwrap();
        assert_eq!(skills.items[0].texts(), ["Go", "Rust", "SQL"]);

        let Row::Chips { chips, .. } = &skills.items[0].rows[0] else {
            panic!("skills should render as chips");
        };
        assert_eq!(chips[0].background, Some(chip_tint(SkillLevel::Expert)));
        assert_eq!(chips[2].background, Some(chip_tint(SkillLevel::Beginner)));
        assert_ne!(chip_tint(SkillLevel::Expert), chip_tint(SkillLevel::Beginner));
    }

    #[test]
    fn test_empty_sequences_leave_columns_empty() {
        let mut content = make_content();
        content.education.clear();
        content.skills.clear();
        let tree = CorporateRenderer.render(&content);
        assert!(tree.columns[1].sections.is_empty());
        assert!(tree.section(SectionKind::Skills).is_none());
    }

    #[test]
    fn test_projects_join_technologies_with_commas() {
        let tree = CorporateRenderer.render(&make_content());
        let projects = tree.section(SectionKind::Projects).unwrap();
        assert!(projects.items[0].texts().contains(&"Rust, PostgreSQL"));
    }
}
