//! Recommendation rules derived from a record and its report.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analysis::AnalysisReport;
use crate::domain::ResumeRecord;

/// Keyword count below which more keywords are suggested.
pub const MIN_KEYWORDS: usize = 5;

/// Overall score below which general ATS optimization is suggested.
pub const OPTIMIZE_BELOW_SCORE: u32 = 80;

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Fix before applying anywhere.
    High,
    /// Noticeable improvement.
    Medium,
    /// Polish.
    Low,
}

impl Priority {
    /// Lowercase identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// An actionable suggestion for improving the resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Urgency.
    pub priority: Priority,
    /// Short imperative title.
    pub title: String,
    /// What to change and why it matters to screening software.
    pub description: String,
    /// Display hint for the presentation layer.
    pub icon: String,
}

struct Rule {
    applies: fn(&ResumeRecord, &AnalysisReport) -> bool,
    priority: Priority,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
}

// Evaluation order is the output order.
const RULES: [Rule; 6] = [
    Rule {
        applies: missing_email,
        priority: Priority::High,
        title: "Add Email Address",
        description: "Recruiters and screening software need a way to reach you. \
                      Add a professional email address to your resume header.",
        icon: "mail",
    },
    Rule {
        applies: missing_phone,
        priority: Priority::High,
        title: "Add Phone Number",
        description: "Include a phone number with country code so recruiters can \
                      contact you directly.",
        icon: "phone",
    },
    Rule {
        applies: missing_experience,
        priority: Priority::High,
        title: "Add Work Experience",
        description: "Add a work experience section listing roles, dates and \
                      measurable achievements.",
        icon: "briefcase",
    },
    Rule {
        applies: missing_skills,
        priority: Priority::Medium,
        title: "Add Skills Section",
        description: "List your technical and soft skills under a dedicated \
                      Skills heading so keyword matching can find them.",
        icon: "list-checks",
    },
    Rule {
        applies: too_few_keywords,
        priority: Priority::Medium,
        title: "Increase Keywords",
        description: "Mirror the terminology of the roles you target. Aim for at \
                      least five relevant industry keywords.",
        icon: "key",
    },
    Rule {
        applies: below_target_score,
        priority: Priority::Low,
        title: "Optimize for ATS",
        description: "Use standard section headings and a simple single-column \
                      layout to push your score above 80.",
        icon: "target",
    },
];

/// Derive recommendations in rule order. Never sorted by priority.
///
/// `report` must be the report built from `record`; the keyword and overall
/// score rules read from it.
pub fn recommend(record: &ResumeRecord, report: &AnalysisReport) -> Vec<Recommendation> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(record, report))
        .map(|rule| Recommendation {
            priority: rule.priority,
            title: rule.title.to_string(),
            description: rule.description.to_string(),
            icon: rule.icon.to_string(),
        })
        .collect()
}

fn missing_email(record: &ResumeRecord, _: &AnalysisReport) -> bool {
    !record.has_email
}

fn missing_phone(record: &ResumeRecord, _: &AnalysisReport) -> bool {
    !record.has_phone
}

fn missing_experience(record: &ResumeRecord, _: &AnalysisReport) -> bool {
    !record.has_experience
}

fn missing_skills(record: &ResumeRecord, _: &AnalysisReport) -> bool {
    !record.has_skills
}

fn too_few_keywords(_: &ResumeRecord, report: &AnalysisReport) -> bool {
    report.keywords.len() < MIN_KEYWORDS
}

fn below_target_score(_: &ResumeRecord, report: &AnalysisReport) -> bool {
    report.overall_score < OPTIMIZE_BELOW_SCORE
}
