//! The state container: sole owner and mutator of the resume content model.
//!
//! Every mutation clones the current snapshot, edits the clone, and swaps it
//! in as a fresh `Arc`. Earlier snapshots are never touched, so observers can
//! detect change with `Arc::ptr_eq` and an in-flight export keeps reading the
//! value it captured. Each new snapshot is published on a `watch` channel and
//! written to the snapshot store; a failed write is logged and otherwise
//! ignored, the in-memory model stays authoritative.

pub mod snapshot;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    EducationEntry, EducationPatch, ExperienceEntry, ExperiencePatch, PersonalInfoPatch,
    ProjectEntry, ProjectPatch, ResumeContent, SkillEntry, SkillPatch, TemplateId,
};

pub use snapshot::{restore_or_default, FileSnapshotStore, MemorySnapshotStore, SnapshotStore};

/// Anything kept in an id-keyed ordered sequence.
trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for ExperienceEntry {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for EducationEntry {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for SkillEntry {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for ProjectEntry {
    fn key(&self) -> Uuid {
        self.id
    }
}

fn position_of<T: Keyed>(items: &[T], id: Uuid) -> Option<usize> {
    items.iter().position(|item| item.key() == id)
}

pub struct ResumeStore {
    tx: watch::Sender<Arc<ResumeContent>>,
    persistence: Arc<dyn SnapshotStore>,
}

impl ResumeStore {
    /// Opens the store, restoring the last persisted snapshot if there is a
    /// readable one and starting from the default model otherwise.
    pub fn open(persistence: Arc<dyn SnapshotStore>) -> Self {
        let initial = restore_or_default(persistence.as_ref());
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx, persistence }
    }

    /// A store backed by a fresh in-memory record.
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemorySnapshotStore::new()))
    }

    /// The current immutable snapshot.
    pub fn snapshot(&self) -> Arc<ResumeContent> {
        self.tx.borrow().clone()
    }

    /// Receives every snapshot published after this call.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ResumeContent>> {
        self.tx.subscribe()
    }

    fn commit(&mut self, op: &'static str, edit: impl FnOnce(&mut ResumeContent)) {
        let mut next = ResumeContent::clone(&self.snapshot());
        edit(&mut next);
        let next = Arc::new(next);
        self.tx.send_replace(Arc::clone(&next));
        if let Err(e) = self.persistence.save(&next) {
            warn!("Persisting snapshot after {op} failed: {e}");
        }
    }

    // ── experience ──────────────────────────────────────────────────────────

    pub fn add_experience(&mut self, defaults: ExperiencePatch) -> Uuid {
        let id = Uuid::new_v4();
        let mut entry = ExperienceEntry::blank(id);
        defaults.apply_to(&mut entry);
        self.commit("add_experience", |c| c.experience.push(entry));
        id
    }

    pub fn update_experience(&mut self, id: Uuid, patch: ExperiencePatch) {
        let Some(idx) = position_of(&self.snapshot().experience, id) else {
            debug!("update_experience: no entry {id}, ignoring");
            return;
        };
        self.commit("update_experience", |c| patch.apply_to(&mut c.experience[idx]));
    }

    pub fn remove_experience(&mut self, id: Uuid) {
        let Some(idx) = position_of(&self.snapshot().experience, id) else {
            debug!("remove_experience: no entry {id}, ignoring");
            return;
        };
        self.commit("remove_experience", |c| {
            c.experience.remove(idx);
        });
    }

    /// Replaces the sequence wholesale. The caller supplies a permutation of
    /// the current entries; this is not re-checked.
    pub fn reorder_experience(&mut self, items: Vec<ExperienceEntry>) {
        self.commit("reorder_experience", |c| c.experience = items);
    }

    // ── education ───────────────────────────────────────────────────────────

    pub fn add_education(&mut self, defaults: EducationPatch) -> Uuid {
        let id = Uuid::new_v4();
        let mut entry = EducationEntry::blank(id);
        defaults.apply_to(&mut entry);
        self.commit("add_education", |c| c.education.push(entry));
        id
    }

    pub fn update_education(&mut self, id: Uuid, patch: EducationPatch) {
        let Some(idx) = position_of(&self.snapshot().education, id) else {
            debug!("update_education: no entry {id}, ignoring");
            return;
        };
        self.commit("update_education", |c| patch.apply_to(&mut c.education[idx]));
    }

    pub fn remove_education(&mut self, id: Uuid) {
        let Some(idx) = position_of(&self.snapshot().education, id) else {
            debug!("remove_education: no entry {id}, ignoring");
            return;
        };
        self.commit("remove_education", |c| {
            c.education.remove(idx);
        });
    }

    pub fn reorder_education(&mut self, items: Vec<EducationEntry>) {
        self.commit("reorder_education", |c| c.education = items);
    }

    // ── skills ──────────────────────────────────────────────────────────────

    /// New skills default to an empty name at `Intermediate` level.
    pub fn add_skill(&mut self, defaults: SkillPatch) -> Uuid {
        let id = Uuid::new_v4();
        let mut entry = SkillEntry::blank(id);
        defaults.apply_to(&mut entry);
        self.commit("add_skill", |c| c.skills.push(entry));
        id
    }

    pub fn update_skill(&mut self, id: Uuid, patch: SkillPatch) {
        let Some(idx) = position_of(&self.snapshot().skills, id) else {
            debug!("update_skill: no entry {id}, ignoring");
            return;
        };
        self.commit("update_skill", |c| patch.apply_to(&mut c.skills[idx]));
    }

    pub fn remove_skill(&mut self, id: Uuid) {
        let Some(idx) = position_of(&self.snapshot().skills, id) else {
            debug!("remove_skill: no entry {id}, ignoring");
            return;
        };
        self.commit("remove_skill", |c| {
            c.skills.remove(idx);
        });
    }

    pub fn reorder_skills(&mut self, items: Vec<SkillEntry>) {
        self.commit("reorder_skills", |c| c.skills = items);
    }

    // ── projects ────────────────────────────────────────────────────────────

    pub fn add_project(&mut self, defaults: ProjectPatch) -> Uuid {
        let id = Uuid::new_v4();
        let mut entry = ProjectEntry::blank(id);
        defaults.apply_to(&mut entry);
        self.commit("add_project", |c| c.projects.push(entry));
        id
    }

    pub fn update_project(&mut self, id: Uuid, patch: ProjectPatch) {
        let Some(idx) = position_of(&self.snapshot().projects, id) else {
            debug!("update_project: no entry {id}, ignoring");
            return;
        };
        self.commit("update_project", |c| patch.apply_to(&mut c.projects[idx]));
    }

    pub fn remove_project(&mut self, id: Uuid) {
        let Some(idx) = position_of(&self.snapshot().projects, id) else {
            debug!("remove_project: no entry {id}, ignoring");
            return;
        };
        self.commit("remove_project", |c| {
            c.projects.remove(idx);
        });
    }

    pub fn reorder_projects(&mut self, items: Vec<ProjectEntry>) {
        self.commit("reorder_projects", |c| c.projects = items);
    }

    // ── scalar fields ───────────────────────────────────────────────────────

    pub fn update_personal_info(&mut self, patch: PersonalInfoPatch) {
        self.commit("update_personal_info", |c| {
            patch.apply_to(&mut c.personal_info)
        });
    }

    pub fn update_summary(&mut self, summary: impl Into<String>) {
        let summary = summary.into();
        self.commit("update_summary", |c| c.summary = summary);
    }

    /// Unrecognized identifiers resolve to `minimal-classic`.
    pub fn set_template(&mut self, template: &str) {
        let template = TemplateId::from_name(template);
        self.commit("set_template", |c| c.metadata.template = template);
    }

    pub fn set_accent_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        self.commit("set_accent_color", |c| c.metadata.accent_color = color);
    }

    pub fn set_font(&mut self, font: impl Into<String>) {
        let font = font.into();
        self.commit("set_font", |c| c.metadata.font = font);
    }

    pub fn reset_resume(&mut self) {
        self.commit("reset_resume", |c| *c = ResumeContent::default());
    }

    /// Replaces the whole model, e.g. with one read from an exported file.
    pub fn import_resume(&mut self, content: ResumeContent) {
        self.commit("import_resume", |c| *c = content);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
