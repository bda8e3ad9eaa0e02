pub mod ats;

pub use ats::{score_resume, score_text, AtsIssue, AtsReport, IssueKind, Severity};
