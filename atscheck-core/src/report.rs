//! Report bundling and formatting utilities.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analysis::{AnalysisReport, CategoryStatus, CheckStatus, ScoreBand, build_report};
use crate::domain::ResumeRecord;
use crate::library::LibrarySummary;
use crate::recommend::{Recommendation, recommend};

/// Shown in place of an empty recommendation list.
pub const NO_QUICK_WINS: &str = "No quick wins: this resume already covers every check.";

/// A record with everything derived from it.
///
/// Counts are taken from the bundled report so they never drift from what is
/// displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    /// The backend record.
    pub record: ResumeRecord,
    /// Categorized checks.
    pub report: AnalysisReport,
    /// Recommendations in rule order.
    pub recommendations: Vec<Recommendation>,
    /// Checks with a passed status.
    pub passed_count: usize,
    /// All checks.
    pub total_count: usize,
}

impl ResumeAnalysis {
    /// Build the report and recommendations for a record.
    pub fn analyze(record: ResumeRecord) -> Self {
        let report = build_report(&record);
        let recommendations = recommend(&record, &report);
        Self {
            passed_count: report.passed_count(),
            total_count: report.total_count(),
            record,
            report,
            recommendations,
        }
    }

    /// Score band of the overall score.
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.report.overall_score)
    }
}

/// Render an analysis as Markdown.
pub fn render_analysis_markdown(analysis: &ResumeAnalysis) -> String {
    let mut output = String::new();
    let report = &analysis.report;
    let title = display_file_name(&analysis.record);
    let _ = writeln!(output, "# ATS Report: {title}\n");
    if let Some(date) = analysis.record.upload_date() {
        let _ = writeln!(output, "- Uploaded: {date}");
    }
    let _ = writeln!(
        output,
        "- Overall score: {}/100 ({})",
        report.overall_score,
        analysis.band().label()
    );
    let _ = writeln!(
        output,
        "- Checks passed: {}/{}\n",
        analysis.passed_count, analysis.total_count
    );

    let _ = writeln!(output, "## Feedback\n{}\n", report.feedback);

    if report.keywords.is_empty() {
        let _ = writeln!(output, "## Keywords\nNo keywords detected.\n");
    } else {
        let _ = writeln!(output, "## Keywords\n{}\n", report.keywords.join(", "));
    }

    for category in &report.categories {
        let _ = writeln!(
            output,
            "## {} ({}%, {})",
            category.name,
            category.score,
            category_status_label(category.status)
        );
        for item in &category.items {
            let _ = writeln!(
                output,
                "- [{}] {}: {}",
                check_status_label(item.status),
                item.name,
                item.message
            );
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "## Recommendations");
    if analysis.recommendations.is_empty() {
        let _ = writeln!(output, "{NO_QUICK_WINS}");
    } else {
        for recommendation in &analysis.recommendations {
            let _ = writeln!(
                output,
                "- **{}** ({} priority): {}",
                recommendation.title,
                recommendation.priority.as_str(),
                recommendation.description
            );
        }
    }
    output
}

/// Render a resume listing as a Markdown table.
pub fn render_library_markdown(records: &[&ResumeRecord], summary: &LibrarySummary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# My Resumes\n");
    let _ = writeln!(
        output,
        "- Total resumes: {}\n- Average score: {}\n",
        summary.total_resumes, summary.average_score
    );
    if records.is_empty() {
        let _ = writeln!(output, "No resumes found.");
        return output;
    }
    let _ = writeln!(output, "| ID | File | Score | Uploaded |");
    let _ = writeln!(output, "| --- | --- | --- | --- |");
    for record in records {
        let _ = writeln!(
            output,
            "| {} | {} | {} ({}) | {} |",
            record.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            display_file_name(record),
            record.ats_score,
            ScoreBand::from_score(record.ats_score).as_str(),
            record.upload_date().unwrap_or_else(|| "-".to_string())
        );
    }
    output
}

/// Render any serializable payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Lowercase label for a check status.
pub fn check_status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Passed => "passed",
        CheckStatus::Warning => "warning",
        CheckStatus::Failed => "failed",
    }
}

/// Lowercase label for a category status.
pub fn category_status_label(status: CategoryStatus) -> &'static str {
    match status {
        CategoryStatus::Passed => "passed",
        CategoryStatus::Warning => "warning",
    }
}

/// File name for display, or a placeholder when blank.
pub fn display_file_name(record: &ResumeRecord) -> &str {
    if record.file_name.trim().is_empty() {
        "untitled resume"
    } else {
        &record.file_name
    }
}
