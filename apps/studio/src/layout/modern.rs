//! Modern layout: split header with a derived subtitle, a wide primary column
//! and a sidebar of education and skill bars.

use crate::layout::mappers::{
    accent_rgb, contact_items, date_range, derived_subtitle, has_text, join_technologies,
    skill_proportion, ContactField,
};
use crate::layout::selector::LayoutRenderer;
use crate::layout::tree::{
    Column, ColumnRole, FontFamily, HeaderAlignment, HeaderBlock, Heading, ItemBlock, LayoutTree,
    PageGeometry, Rgb, Row, Rule, SectionBlock, SkillIndicator, TextRun, TextStyle,
};
use crate::models::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, ResumeContent, SectionKind,
    SkillEntry, TemplateId,
};

const MARGIN_PT: f32 = 40.0;
const COLUMN_GAP_PT: f32 = 32.0;
const SECTION_SPACING_PT: f32 = 24.0;

const PRIMARY_HEADING: TextStyle = TextStyle::new(FontFamily::Sans, 13.0, Rgb::GRAY_800).bold();
const SIDEBAR_HEADING: TextStyle = TextStyle::new(FontFamily::Sans, 11.0, Rgb::GRAY_800).bold();
const ITEM_TITLE: TextStyle = TextStyle::new(FontFamily::Sans, 12.0, Rgb::GRAY_800).bold();
const DATE: TextStyle = TextStyle::new(FontFamily::Mono, 8.0, Rgb::GRAY_500);
const COMPANY: TextStyle = TextStyle::new(FontFamily::Sans, 10.0, Rgb::GRAY_600).bold();
const LOCATION: TextStyle = TextStyle::new(FontFamily::Sans, 9.0, Rgb::GRAY_500);
const BODY: TextStyle = TextStyle::new(FontFamily::Sans, 10.0, Rgb::GRAY_700).line_height(1.5);
const PROJECT_NAME: TextStyle = TextStyle::new(FontFamily::Sans, 10.0, Rgb::GRAY_800).bold();
const PROJECT_TECH: TextStyle = TextStyle::new(FontFamily::Mono, 8.0, Rgb::GRAY_500);
const PROJECT_BODY: TextStyle = TextStyle::new(FontFamily::Sans, 9.0, Rgb::GRAY_700);
const SIDEBAR_TITLE: TextStyle = TextStyle::new(FontFamily::Sans, 10.0, Rgb::GRAY_800).bold();
const SIDEBAR_TEXT: TextStyle = TextStyle::new(FontFamily::Sans, 9.0, Rgb::GRAY_800);
const SIDEBAR_DATE: TextStyle = TextStyle::new(FontFamily::Sans, 8.0, Rgb::GRAY_400);
const SKILL_NAME: TextStyle = TextStyle::new(FontFamily::Sans, 9.0, Rgb::GRAY_800).bold();
const SKILL_LEVEL: TextStyle = TextStyle::new(FontFamily::Sans, 8.0, Rgb::GRAY_500);

const CONTACT_FIELDS: [ContactField; 4] = [
    ContactField::Email,
    ContactField::Phone,
    ContactField::Location,
    ContactField::Linkedin,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModernRenderer;

impl LayoutRenderer for ModernRenderer {
    fn template(&self) -> TemplateId {
        TemplateId::ModernProfessional
    }

    fn render(&self, content: &ResumeContent) -> LayoutTree {
        let accent = accent_rgb(&content.metadata.accent_color, Rgb::BLACK);
        let mut primary = Vec::new();
        let mut sidebar = Vec::new();

        if has_text(&content.summary) {
            let rows = Row::text(&content.summary, TextStyle { size_pt: 11.0, ..BODY })
                .into_iter()
                .collect();
            primary.push(primary_section(
                SectionKind::Summary,
                "Profile",
                accent,
                vec![ItemBlock::plain(None, rows, 0.0)],
            ));
        }
        if !content.experience.is_empty() {
            let items = content.experience.iter().map(experience_item).collect();
            primary.push(primary_section(SectionKind::Experience, "Experience", accent, items));
        }
        if !content.projects.is_empty() {
            let items = content.projects.iter().map(project_item).collect();
            primary.push(primary_section(SectionKind::Projects, "Projects", accent, items));
        }
        if !content.education.is_empty() {
            let items = content.education.iter().map(education_item).collect();
            sidebar.push(sidebar_section(SectionKind::Education, "Education", items));
        }
        if !content.skills.is_empty() {
            let items = content
                .skills
                .iter()
                .map(|skill| skill_item(skill, accent))
                .collect();
            sidebar.push(sidebar_section(SectionKind::Skills, "Skills", items));
        }

        LayoutTree {
            template: self.template(),
            page: PageGeometry::a4(MARGIN_PT, COLUMN_GAP_PT),
            header: header(&content.personal_info, &content.experience, accent),
            columns: vec![
                Column {
                    role: ColumnRole::Primary,
                    width_fraction: 2.0 / 3.0,
                    sections: primary,
                },
                Column {
                    role: ColumnRole::Secondary,
                    width_fraction: 1.0 / 3.0,
                    sections: sidebar,
                },
            ],
        }
    }
}

fn header(info: &PersonalInfo, experience: &[ExperienceEntry], accent: Rgb) -> HeaderBlock {
    let contacts = contact_items(info, &CONTACT_FIELDS)
        .into_iter()
        .map(|(field, value)| {
            let style = TextStyle::new(FontFamily::Sans, 9.0, Rgb::GRAY_800);
            let style = match field {
                ContactField::Email => style.bold(),
                ContactField::Linkedin => style.color(Rgb::BLUE_600),
                _ => style,
            };
            TextRun::new(value, style)
        })
        .collect();

    HeaderBlock {
        alignment: HeaderAlignment::Split,
        band: None,
        name: TextRun::new(
            info.full_name.trim(),
            TextStyle::new(FontFamily::Sans, 32.0, Rgb::GRAY_800)
                .bold()
                .line_height(1.15),
        ),
        subtitle: Some(TextRun::new(
            derived_subtitle(experience),
            TextStyle::new(FontFamily::Sans, 14.0, Rgb::GRAY_500),
        )),
        contacts,
        contact_separator: String::new(),
        rule_below: Some(Rule {
            color: accent,
            thickness_pt: 4.0,
        }),
        padding_pt: 20.0,
        spacing_after_pt: SECTION_SPACING_PT,
    }
}

fn primary_section(
    kind: SectionKind,
    title: &str,
    accent: Rgb,
    items: Vec<ItemBlock>,
) -> SectionBlock {
    SectionBlock {
        kind,
        heading: Heading {
            text: TextRun::new(title.to_uppercase(), PRIMARY_HEADING),
            marker: Some(accent),
            rule: None,
        },
        items,
        spacing_after_pt: SECTION_SPACING_PT,
    }
}

fn sidebar_section(kind: SectionKind, title: &str, items: Vec<ItemBlock>) -> SectionBlock {
    SectionBlock {
        kind,
        heading: Heading {
            text: TextRun::new(title.to_uppercase(), SIDEBAR_HEADING),
            marker: None,
            rule: Some(Rule {
                color: Rgb::GRAY_800,
                thickness_pt: 2.0,
            }),
        },
        items,
        spacing_after_pt: SECTION_SPACING_PT,
    }
}

fn experience_item(entry: &ExperienceEntry) -> ItemBlock {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current);
    let rows = [
        Row::split(&entry.position, dates.as_deref(), ITEM_TITLE, DATE),
        Row::split(&entry.company, Some(entry.location.as_str()), COMPANY, LOCATION),
        Row::text(&entry.description, BODY),
    ];
    ItemBlock {
        source_id: Some(entry.id),
        background: None,
        rail: Some(Rgb::GRAY_200),
        padding_pt: 12.0,
        rows: rows.into_iter().flatten().collect(),
        spacing_after_pt: 16.0,
    }
}

fn project_item(entry: &ProjectEntry) -> ItemBlock {
    let technologies = join_technologies(&entry.technologies, " • ").unwrap_or_default();
    let rows = [
        Row::text(&entry.name, PROJECT_NAME),
        Row::text(&technologies, PROJECT_TECH),
        Row::text(&entry.description, PROJECT_BODY),
    ];
    ItemBlock {
        source_id: Some(entry.id),
        background: Some(Rgb::GRAY_50),
        rail: None,
        padding_pt: 12.0,
        rows: rows.into_iter().flatten().collect(),
        spacing_after_pt: 12.0,
    }
}

fn education_item(entry: &EducationEntry) -> ItemBlock {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current).unwrap_or_default();
    let rows = [
        Row::text(&entry.institution, SIDEBAR_TITLE),
        Row::text(&entry.degree, SIDEBAR_TEXT),
        Row::text(&entry.field_of_study, SIDEBAR_TEXT),
        Row::text(&dates, SIDEBAR_DATE),
    ];
    ItemBlock::plain(Some(entry.id), rows.into_iter().flatten().collect(), 12.0)
}

fn skill_item(skill: &SkillEntry, accent: Rgb) -> ItemBlock {
    let indicator = SkillIndicator {
        label: TextRun::new(skill.name.trim(), SKILL_NAME),
        level: TextRun::new(skill.level.as_str(), SKILL_LEVEL),
        proportion: skill_proportion(skill.level),
        track: Rgb::GRAY_200,
        fill: accent,
        bar_height_pt: 4.0,
    };
    ItemBlock::plain(Some(skill.id), vec![Row::Indicator(indicator)], 8.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::make_content;
    use crate::models::SkillLevel;

    fn indicators(tree: &LayoutTree) -> Vec<&SkillIndicator> {
        tree.section(SectionKind::Skills)
            .map(|s| {
                s.items
                    .iter()
                    .flat_map(|i| i.rows.iter())
                    .filter_map(|r| match r {
                        Row::Indicator(ind) => Some(ind),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_subtitle_comes_from_first_position() {
        let content = make_content();
        let tree = ModernRenderer.render(&content);
        assert_eq!(tree.header.alignment, HeaderAlignment::Split);
        assert_eq!(
            tree.header.subtitle.as_ref().map(|s| s.text.as_str()),
            Some("Lead Engineer")
        );
    }

    #[test]
    fn test_subtitle_falls_back_without_experience() {
        let mut content = make_content();
        content.experience.clear();
        let tree = ModernRenderer.render(&content);
        assert_eq!(
            tree.header.subtitle.as_ref().map(|s| s.text.as_str()),
            Some("Professional")
        );
        assert!(tree.section(SectionKind::Experience).is_none());
    }

    #[test]
    fn test_subtitle_is_never_written_back() {
        let mut content = make_content();
        content.experience.clear();
        let before = content.clone();
        let _ = ModernRenderer.render(&content);
        assert_eq!(content, before);
    }

    #[test]
    fn test_skill_indicator_proportions_are_exact() {
        let mut content = make_content();
        let template = content.skills[0].clone();
        content.skills = SkillLevel::ALL
            .into_iter()
            .map(|level| crate::models::SkillEntry {
                id: uuid::Uuid::new_v4(),
                level,
                ..template.clone()
            })
            .collect();

        let tree = ModernRenderer.render(&content);
        let proportions: Vec<f32> = indicators(&tree).iter().map(|i| i.proportion).collect();
        assert_eq!(proportions, [0.25, 0.50, 0.75, 1.00]);
        let levels: Vec<&str> = indicators(&tree).iter().map(|i| i.level.text.as_str()).collect();
        assert_eq!(levels, ["Beginner", "Intermediate", "Advanced", "Expert"]);
    }

    #[test]
    fn test_accent_drives_rule_and_bar_fill() {
        let mut content = make_content();
        content.metadata.accent_color = "#1e3a8a".to_string();
        let tree = ModernRenderer.render(&content);
        assert_eq!(tree.header.rule_below.map(|r| r.color), Some(Rgb::BLUE_900));
        assert!(indicators(&tree).iter().all(|i| i.fill == Rgb::BLUE_900));
    }

    #[test]
    fn test_sidebar_holds_education_and_skills() {
        let tree = ModernRenderer.render(&make_content());
        assert_eq!(tree.column_of(SectionKind::Summary), Some(ColumnRole::Primary));
        assert_eq!(tree.column_of(SectionKind::Projects), Some(ColumnRole::Primary));
        assert_eq!(tree.column_of(SectionKind::Education), Some(ColumnRole::Secondary));
        assert_eq!(tree.column_of(SectionKind::Skills), Some(ColumnRole::Secondary));
    }

    #[test]
    fn test_current_education_shows_present() {
        let mut content = make_content();
        content.education[0].current = true;
        let tree = ModernRenderer.render(&content);
        let texts = tree.section(SectionKind::Education).unwrap().items[0].texts();
        assert!(texts.contains(&"09/2014 – Present"), "{texts:?}");
    }

    #[test]
    fn test_projects_are_boxed_with_bullet_separated_technologies() {
        let tree = ModernRenderer.render(&make_content());
        let projects = tree.section(SectionKind::Projects).unwrap();
        assert_eq!(projects.items[0].background, Some(Rgb::GRAY_50));
        assert!(projects.items[0].texts().contains(&"Rust • PostgreSQL"));
    }
}
