//! Report derivation: turns a backend resume record into categorized checks.

use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ResumeRecord;

/// Feedback shown when the backend returned none.
pub const DEFAULT_FEEDBACK: &str = "Analysis completed successfully";

/// Minimum score for a scored category to count as passed.
pub const CATEGORY_PASS_THRESHOLD: u32 = 70;

/// ATS compatibility category name.
pub const ATS_COMPATIBILITY: &str = "ATS Compatibility";
/// Contact information category name.
pub const CONTACT_INFORMATION: &str = "Contact Information";
/// Content structure category name.
pub const CONTENT_STRUCTURE: &str = "Content Structure";

/// Outcome of an individual check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Requirement met.
    Passed,
    /// Optional element missing.
    Warning,
    /// Required element missing.
    Failed,
}

/// Outcome of a whole category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    /// Category meets its threshold.
    Passed,
    /// Category needs attention.
    Warning,
}

impl CategoryStatus {
    fn from_pass(passed: bool) -> Self {
        if passed { Self::Passed } else { Self::Warning }
    }
}

/// How much an unmet check weighs on the resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Likely to get the resume filtered out.
    High,
    /// Worth fixing, rarely decisive.
    Medium,
}

/// A single check within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckItem {
    /// Display name of the check.
    pub name: String,
    /// Check outcome.
    pub status: CheckStatus,
    /// Human-readable explanation of the outcome.
    pub message: String,
    /// Impact of the deficiency; absent for passed checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
}

/// A fixed grouping of checks with an aggregate score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckCategory {
    /// Category name.
    pub name: String,
    /// Category score, 0-100.
    pub score: u32,
    /// Category outcome.
    pub status: CategoryStatus,
    /// Checks in fixed display order.
    pub items: Vec<CheckItem>,
}

/// Structured view of one resume record, rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Overall ATS score, 0-100.
    pub overall_score: u32,
    /// The three categories in fixed order.
    pub categories: Vec<CheckCategory>,
    /// Scoring feedback, defaulted when empty.
    pub feedback: String,
    /// Parsed keywords; empty when absent or malformed.
    pub keywords: Vec<String>,
}

impl AnalysisReport {
    /// Number of checks with a passed status across all categories.
    pub fn passed_count(&self) -> usize {
        self.items()
            .filter(|item| item.status == CheckStatus::Passed)
            .count()
    }

    /// Number of checks across all categories.
    pub fn total_count(&self) -> usize {
        self.items().count()
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&CheckCategory> {
        self.categories.iter().find(|category| category.name == name)
    }

    fn items(&self) -> impl Iterator<Item = &CheckItem> {
        self.categories
            .iter()
            .flat_map(|category| category.items.iter())
    }
}

/// Three-bucket classification shared by the overall and category scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// 80 and above.
    High,
    /// 60 to 79.
    Medium,
    /// Below 60.
    Low,
}

impl ScoreBand {
    /// Classify a 0-100 score.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => Self::High,
            s if s >= 60 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Lowercase identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Verdict shown next to the overall score.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "Excellent",
            Self::Medium => "Good",
            Self::Low => "Needs Improvement",
        }
    }
}

/// Build the categorized report for a record. Never fails.
pub fn build_report(record: &ResumeRecord) -> AnalysisReport {
    let feedback = if record.feedback.is_empty() {
        DEFAULT_FEEDBACK.to_string()
    } else {
        record.feedback.clone()
    };

    AnalysisReport {
        overall_score: record.ats_score,
        categories: vec![
            ats_compatibility(record),
            contact_information(record),
            content_structure(record),
        ],
        feedback,
        keywords: parse_keywords(record.keywords.as_deref()),
    }
}

/// Parse keyword JSON text. Absent or malformed input yields no keywords.
pub fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(keywords) => keywords,
        Err(err) => {
            debug!("ignoring malformed keyword list: {err}");
            Vec::new()
        }
    }
}

/// Weighted section score: experience 40, education 40, skills 20.
pub fn content_structure_score(record: &ResumeRecord) -> u32 {
    let mut score = 0;
    if record.has_experience {
        score += 40;
    }
    if record.has_education {
        score += 40;
    }
    if record.has_skills {
        score += 20;
    }
    score
}

fn ats_compatibility(record: &ResumeRecord) -> CheckCategory {
    let score = record.ats_score;
    let text_extracted = record.has_extracted_text();
    CheckCategory {
        name: ATS_COMPATIBILITY.to_string(),
        score,
        status: CategoryStatus::from_pass(score >= CATEGORY_PASS_THRESHOLD),
        items: vec![
            // Format is validated by the upload endpoint.
            check(
                "File Format",
                CheckStatus::Passed,
                "Resume format is ATS-friendly",
                Impact::High,
            ),
            required(
                "Text Extraction",
                text_extracted,
                "Text successfully extracted",
                "Failed to extract text",
                Impact::High,
            ),
        ],
    }
}

fn contact_information(record: &ResumeRecord) -> CheckCategory {
    CheckCategory {
        name: CONTACT_INFORMATION.to_string(),
        score: if record.has_contact_info { 100 } else { 50 },
        status: CategoryStatus::from_pass(record.has_contact_info),
        items: vec![
            required(
                "Email Address",
                record.has_email,
                "Valid email found",
                "No email detected",
                Impact::High,
            ),
            required(
                "Phone Number",
                record.has_phone,
                "Phone number present",
                "No phone number detected",
                Impact::High,
            ),
            recommended(
                "Links/Profile",
                record.has_links,
                "Professional links included",
                "Consider adding LinkedIn or portfolio",
            ),
        ],
    }
}

fn content_structure(record: &ResumeRecord) -> CheckCategory {
    let score = content_structure_score(record);
    CheckCategory {
        name: CONTENT_STRUCTURE.to_string(),
        score,
        status: CategoryStatus::from_pass(score >= CATEGORY_PASS_THRESHOLD),
        items: vec![
            required(
                "Experience Section",
                record.has_experience,
                "Experience section found",
                "No experience section detected",
                Impact::High,
            ),
            required(
                "Education Section",
                record.has_education,
                "Education section found",
                "No education section detected",
                Impact::Medium,
            ),
            recommended(
                "Skills Section",
                record.has_skills,
                "Skills section found",
                "Consider adding a skills section",
            ),
        ],
    }
}

/// Present or failed.
fn required(name: &str, present: bool, ok: &str, missing: &str, impact: Impact) -> CheckItem {
    if present {
        check(name, CheckStatus::Passed, ok, impact)
    } else {
        check(name, CheckStatus::Failed, missing, impact)
    }
}

/// Present or warning, never failed.
fn recommended(name: &str, present: bool, ok: &str, missing: &str) -> CheckItem {
    if present {
        check(name, CheckStatus::Passed, ok, Impact::Medium)
    } else {
        check(name, CheckStatus::Warning, missing, Impact::Medium)
    }
}

fn check(name: &str, status: CheckStatus, message: &str, impact: Impact) -> CheckItem {
    CheckItem {
        name: name.to_string(),
        status,
        message: message.to_string(),
        impact: (status != CheckStatus::Passed).then_some(impact),
    }
}
