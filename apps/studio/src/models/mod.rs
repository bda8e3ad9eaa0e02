pub mod patch;
pub mod resume;

pub use patch::{
    EducationPatch, ExperiencePatch, PersonalInfoPatch, ProjectPatch, SkillPatch,
};
pub use resume::{
    CertificationEntry, ColumnLayout, CustomSection, CustomSectionItem, EducationEntry,
    ExperienceEntry, Metadata, PersonalInfo, ProjectEntry, ResumeContent, SectionKind,
    SkillEntry, SkillLevel, TemplateId,
};
