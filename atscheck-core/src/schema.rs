//! OpenAPI component document for the report payloads.

use utoipa::OpenApi;

use crate::analysis::{
    AnalysisReport, CategoryStatus, CheckCategory, CheckItem, CheckStatus, Impact, ScoreBand,
};
use crate::domain::ResumeRecord;
use crate::library::LibrarySummary;
use crate::recommend::{Priority, Recommendation};
use crate::report::ResumeAnalysis;

/// Schema document describing every payload the client emits as JSON.
#[derive(OpenApi)]
#[openapi(
    info(title = "ATS check report", description = "Derived resume analysis payloads."),
    components(schemas(
        ResumeRecord,
        AnalysisReport,
        CheckCategory,
        CheckItem,
        CheckStatus,
        CategoryStatus,
        Impact,
        ScoreBand,
        Recommendation,
        Priority,
        ResumeAnalysis,
        LibrarySummary
    ))
)]
pub struct ReportSchemaDoc;

/// Render the schema document as pretty JSON.
pub fn render_report_schema() -> Result<String, serde_json::Error> {
    ReportSchemaDoc::openapi().to_pretty_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_report_components() {
        let json = render_report_schema().expect("schema");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");
        let schemas = &parsed["components"]["schemas"];
        assert!(schemas.get("AnalysisReport").is_some());
        assert!(schemas.get("Recommendation").is_some());
        assert!(schemas.get("ResumeAnalysis").is_some());
        assert_eq!(parsed["info"]["title"], "ATS check report");
    }
}
