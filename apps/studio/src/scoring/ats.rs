//! ATS compatibility score: a quick heuristic over the text an applicant
//! tracking system would extract from the resume.
//!
//! Deterministic and offline. Starts from a base score, applies penalties and
//! bonuses per check, and clamps to 0–100. Illustrative only; the weights are
//! not a contract.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::layout::render_current;
use crate::models::ResumeContent;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Contact,
    Formatting,
    Keywords,
    Experience,
    Skills,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsReport {
    pub score: u32, // 0 – 100
    pub issues: Vec<AtsIssue>,
}

impl AtsReport {
    /// "Good" from 71, "Fair" from 41, otherwise "Needs work".
    pub fn rating(&self) -> &'static str {
        match self.score {
            71.. => "Good",
            41.. => "Fair",
            _ => "Needs work",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

const BASE_SCORE: i32 = 70;
const MAX_ISSUES: usize = 6;

/// Section words looked for anywhere in the text, with their penalty.
const SECTIONS: [(&str, i32); 3] = [("experience", 10), ("education", 8), ("skills", 7)];

const ACTION_VERBS: [&str; 8] = [
    "managed",
    "developed",
    "led",
    "improved",
    "achieved",
    "created",
    "implemented",
    "designed",
];

const MIN_ACTION_VERBS: usize = 3;
const MIN_QUANTIFIED: usize = 2;
const MIN_WORDS: usize = 200;
const MAX_WORDS: usize = 1000;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+").expect("Invalid email regex"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}").expect("Invalid phone regex"));

static QUANTIFIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9]+%|\$[0-9]+|increased|decreased|improved by").expect("Invalid quantified regex")
});

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores the resume as it would be exported: the text of the layout its
/// template selects, in reading order.
pub fn score_resume(content: &ResumeContent) -> AtsReport {
    let text = render_current(content).texts().join("\n");
    score_text(&text)
}

/// Scores free text. Issues are kept in check order, at most six.
pub fn score_text(text: &str) -> AtsReport {
    let mut score = BASE_SCORE;
    let mut issues = Vec::new();
    let lower = text.to_lowercase();

    if !EMAIL.is_match(text) {
        score -= 10;
        issues.push(issue(IssueKind::Contact, "Add a professional email address", Severity::High));
    }
    if !PHONE.is_match(text) {
        score -= 5;
        issues.push(issue(
            IssueKind::Contact,
            "Include a phone number for better reach",
            Severity::Medium,
        ));
    }

    for (section, penalty) in SECTIONS {
        if !lower.contains(section) {
            score -= penalty;
            issues.push(issue(
                IssueKind::Formatting,
                &format!("Add a clear \"{section}\" section header"),
                Severity::High,
            ));
        }
    }

    let verbs = ACTION_VERBS.iter().filter(|verb| lower.contains(*verb)).count();
    if verbs < MIN_ACTION_VERBS {
        score -= 5;
        issues.push(issue(
            IssueKind::Keywords,
            "Use more action verbs (managed, developed, led, etc.)",
            Severity::Medium,
        ));
    } else {
        score += (verbs as i32 * 2).min(10);
    }

    if QUANTIFIED.find_iter(text).count() < MIN_QUANTIFIED {
        issues.push(issue(
            IssueKind::Experience,
            "Add quantifiable achievements (numbers, percentages, $)",
            Severity::Medium,
        ));
    } else {
        score += 5;
    }

    let words = text.split_whitespace().count();
    if words < MIN_WORDS {
        score -= 10;
        issues.push(issue(
            IssueKind::Formatting,
            "Resume appears too short. Add more details",
            Severity::High,
        ));
    } else if words > MAX_WORDS {
        issues.push(issue(
            IssueKind::Formatting,
            "Resume may be too long. Keep it concise",
            Severity::Low,
        ));
    }

    issues.truncate(MAX_ISSUES);
    AtsReport {
        score: score.clamp(0, 100) as u32,
        issues,
    }
}

fn issue(kind: IssueKind, message: &str, severity: Severity) -> AtsIssue {
    AtsIssue {
        kind,
        message: message.to_string(),
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::make_content;

    fn make_text(words: usize) -> String {
        let head = "ada@example.com 555-123-4567 Experience Education Skills \
                    Led and developed and designed the platform, increased throughput 20%.";
        let filler = vec!["detail"; words.saturating_sub(head.split_whitespace().count())];
        format!("{head} {}", filler.join(" "))
    }

    #[test]
    fn test_empty_text_collects_every_penalty() {
        let report = score_text("");
        // 70 - 10 - 5 - 10 - 8 - 7 - 5 - 10
        assert_eq!(report.score, 15);
        assert_eq!(report.issues.len(), 6);
        assert_eq!(report.issues[0].kind, IssueKind::Contact);
        assert_eq!(report.rating(), "Needs work");
    }

    #[test]
    fn test_short_text_with_all_signals() {
        let report = score_text(&make_text(0));
        // 70 + 3 verbs * 2 + 5 quantified - 10 short
        assert_eq!(report.score, 71);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].message, "Resume appears too short. Add more details");
        assert_eq!(report.rating(), "Good");
    }

    #[test]
    fn test_full_length_text_scores_without_issues() {
        let report = score_text(&make_text(400));
        assert_eq!(report.score, 81);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_long_text_gets_low_severity_issue() {
        let report = score_text(&make_text(1200));
        assert_eq!(report.score, 81);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_action_verb_bonus_is_capped() {
        let text = format!(
            "{} managed improved achieved created implemented",
            make_text(400)
        );
        // All eight verbs: bonus capped at 10.
        assert_eq!(score_text(&text).score, 85);
    }

    #[test]
    fn test_section_words_are_case_insensitive() {
        let report = score_text("EXPERIENCE education SkIlLs");
        assert!(!report
            .issues
            .iter()
            .any(|i| i.message.contains("section header")));
    }

    #[test]
    fn test_missing_section_is_named() {
        let report = score_text("ada@example.com 555-123-4567 Experience Skills");
        assert!(report
            .issues
            .iter()
            .any(|i| i.message == "Add a clear \"education\" section header"));
    }

    #[test]
    fn test_score_resume_reads_rendered_text() {
        let report = score_resume(&make_content());
        // Contact details and section headings come through the layout.
        assert!(!report.issues.iter().any(|i| i.kind == IssueKind::Contact));
        assert!(!report
            .issues
            .iter()
            .any(|i| i.message.contains("section header")));
        assert!(report.score <= 100);
    }

    #[test]
    fn test_report_serializes_issue_type() {
        let json = serde_json::to_value(score_text("")).unwrap();
        assert_eq!(json["issues"][0]["type"], "contact");
        assert_eq!(json["issues"][0]["severity"], "high");
    }
}
