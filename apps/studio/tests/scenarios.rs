// End-to-end flows through the public library API: store mutations feeding
// the template selector and renderers.

use studio::layout::tree::Row;
use studio::layout::{paginate, render_current, select_renderer, LayoutRenderer, LayoutTree};
use studio::models::{
    EducationPatch, ExperiencePatch, PersonalInfoPatch, ProjectPatch, ResumeContent, SectionKind, SkillLevel,
    SkillPatch, TemplateId,
};
use studio::store::ResumeStore;

fn make_acme_patch() -> ExperiencePatch {
    ExperiencePatch {
        company: Some("Acme".to_string()),
        position: Some("Engineer".to_string()),
        start_date: Some("01/2020".to_string()),
        end_date: Some("01/2022".to_string()),
        current: Some(false),
        location: Some("NY".to_string()),
        description: Some("Built things".to_string()),
    }
}

fn make_project(store: &mut ResumeStore, name: &str) {
    let id = store.add_project(ProjectPatch::default());
    store.update_project(
        id,
        ProjectPatch {
            name: Some(name.to_string()),
            description: Some(format!("About {name}.")),
            ..Default::default()
        },
    );
}

fn section_texts(tree: &LayoutTree, kind: SectionKind) -> Vec<String> {
    tree.section(kind)
        .map(|s| {
            s.items
                .iter()
                .flat_map(|item| item.texts())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ── scenarios ───────────────────────────────────────────────────────────────

#[test]
fn test_scenario_a_added_experience_renders_date_range() {
    let mut store = ResumeStore::in_memory();
    let id = store.add_experience(ExperiencePatch::default());
    store.update_experience(id, make_acme_patch());

    let tree = select_renderer(TemplateId::MinimalClassic).render(&store.snapshot());
    let section = tree.section(SectionKind::Experience).unwrap();
    assert_eq!(section.entry_ids(), vec![id]);
    assert!(section_texts(&tree, SectionKind::Experience).contains(&"01/2020 – 01/2022".to_string()));
}

#[test]
fn test_scenario_b_current_role_shows_present_but_keeps_end_date() {
    let mut store = ResumeStore::in_memory();
    let id = store.add_experience(ExperiencePatch::default());
    store.update_experience(id, make_acme_patch());
    store.update_experience(
        id,
        ExperiencePatch {
            current: Some(true),
            ..Default::default()
        },
    );

    let content = store.snapshot();
    let texts = section_texts(&render_current(&content), SectionKind::Experience);
    assert!(texts.contains(&"01/2020 – Present".to_string()));
    assert!(!texts.iter().any(|t| t.contains("01/2022")));
    assert_eq!(content.experience[0].end_date, "01/2022");
}

#[test]
fn test_scenario_c_expert_skill_fills_modern_indicator() {
    let mut store = ResumeStore::in_memory();
    let id = store.add_skill(SkillPatch::default());
    store.update_skill(
        id,
        SkillPatch {
            name: Some("Go".to_string()),
            level: Some(SkillLevel::Expert),
            ..Default::default()
        },
    );

    let tree = select_renderer(TemplateId::ModernProfessional).render(&store.snapshot());
    let indicator = tree
        .section(SectionKind::Skills)
        .unwrap()
        .items
        .iter()
        .flat_map(|item| item.rows.iter())
        .find_map(|row| match row {
            Row::Indicator(ind) if ind.label.text == "Go" => Some(ind),
            _ => None,
        })
        .unwrap();
    assert_eq!(indicator.proportion, 1.0);
}

#[test]
fn test_scenario_d_unknown_template_resolves_to_classic() {
    let mut store = ResumeStore::in_memory();
    store.set_template("corporate-blue");
    store.set_template("unknown-id");

    let content = store.snapshot();
    assert_eq!(content.metadata.template, TemplateId::MinimalClassic);
    assert_eq!(render_current(&content).template, TemplateId::MinimalClassic);
}

#[test]
fn test_scenario_e_reversed_projects_render_reversed() {
    let mut store = ResumeStore::in_memory();
    for name in ["Alpha", "Beta", "Gamma"] {
        make_project(&mut store, name);
    }
    let mut reversed = store.snapshot().projects.clone();
    reversed.reverse();
    let expected: Vec<_> = reversed.iter().map(|p| p.id).collect();
    store.reorder_projects(reversed);

    for template in TemplateId::ALL {
        let tree = select_renderer(template).render(&store.snapshot());
        assert_eq!(tree.section(SectionKind::Projects).unwrap().entry_ids(), expected);
    }
}

// ── properties ──────────────────────────────────────────────────────────────

#[test]
fn test_reset_always_yields_default_model() {
    let mut store = ResumeStore::in_memory();
    store.update_summary("Something");
    store.set_template("modern-professional");
    store.add_skill(SkillPatch::default());
    store.reset_resume();
    assert_eq!(*store.snapshot(), ResumeContent::default());

    store.reset_resume();
    assert_eq!(*store.snapshot(), ResumeContent::default());
}

#[test]
fn test_update_touches_only_patched_fields_of_one_entry() {
    let mut store = ResumeStore::in_memory();
    let first = store.add_experience(ExperiencePatch::default());
    store.update_experience(first, make_acme_patch());
    let second = store.add_experience(make_acme_patch());
    let before = store.snapshot();

    store.update_experience(
        first,
        ExperiencePatch {
            location: Some("Boston".to_string()),
            ..Default::default()
        },
    );

    let after = store.snapshot();
    let mut expected = before.experience[0].clone();
    expected.location = "Boston".to_string();
    assert_eq!(after.experience[0], expected);
    assert_eq!(after.experience[1], before.experience[1]);
    assert_eq!(after.experience[1].id, second);
}

#[test]
fn test_empty_sections_never_render() {
    let mut store = ResumeStore::in_memory();
    store.update_personal_info(PersonalInfoPatch {
        full_name: Some("Ada Lovelace".to_string()),
        ..Default::default()
    });
    for template in TemplateId::ALL {
        let tree = select_renderer(template).render(&store.snapshot());
        assert_eq!(tree.sections().count(), 0, "{template}");
    }
}

#[test]
fn test_skill_levels_map_to_exact_proportions() {
    let mut store = ResumeStore::in_memory();
    for level in SkillLevel::ALL {
        store.add_skill(SkillPatch {
            name: Some(level.to_string()),
            level: Some(level),
            ..Default::default()
        });
    }

    let tree = select_renderer(TemplateId::ModernProfessional).render(&store.snapshot());
    let proportions: Vec<f32> = tree
        .section(SectionKind::Skills)
        .unwrap()
        .items
        .iter()
        .flat_map(|item| item.rows.iter())
        .filter_map(|row| match row {
            Row::Indicator(ind) => Some(ind.proportion),
            _ => None,
        })
        .collect();
    assert_eq!(proportions, vec![0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn test_preview_and_export_share_one_tree() {
    let mut store = ResumeStore::in_memory();
    let id = store.add_experience(ExperiencePatch::default());
    store.update_experience(id, make_acme_patch());

    let content = store.snapshot();
    let tree = render_current(&content);
    let document = paginate(&tree).unwrap();
    assert_eq!(document.page_count(), 1);
    assert!(document.pages[0].texts().any(|t| t == "Acme"));
    assert_eq!(render_current(&content), tree);
}

#[test]
fn test_current_education_shows_present_in_every_template() {
    let mut store = ResumeStore::in_memory();
    store.add_education(EducationPatch {
        institution: Some("University of London".to_string()),
        degree: Some("BSc".to_string()),
        start_date: Some("09/2014".to_string()),
        end_date: Some("06/2018".to_string()),
        current: Some(true),
        ..Default::default()
    });

    let content = store.snapshot();
    for template in TemplateId::ALL {
        let texts = section_texts(&select_renderer(template).render(&content), SectionKind::Education);
        assert!(texts.iter().any(|t| t.contains("09/2014 – Present")), "{template}: {texts:?}");
    }
    assert_eq!(content.education[0].end_date, "06/2018");
}
