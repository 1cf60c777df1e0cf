#![deny(missing_docs)]
//! ATS check core library.
//!
//! Pure derivation of analysis reports and recommendations from backend
//! resume records, plus the library, session and rendering helpers the
//! client builds on. Nothing in this crate performs I/O.

pub mod analysis;
pub mod domain;
pub mod error;
pub mod library;
pub mod recommend;
pub mod report;
pub mod schema;
pub mod session;

pub use analysis::{
    AnalysisReport, CategoryStatus, CheckCategory, CheckItem, CheckStatus, DEFAULT_FEEDBACK,
    Impact, ScoreBand, build_report, content_structure_score, parse_keywords,
};
pub use domain::ResumeRecord;
pub use error::{AtsCheckError, Result};
pub use library::{
    LibraryQuery, LibrarySummary, ScoreFilter, SortOrder, average_score, query_library,
    search_records, sort_records,
};
pub use recommend::{Priority, Recommendation, recommend};
pub use report::{
    NO_QUICK_WINS, ResumeAnalysis, category_status_label, check_status_label, display_file_name,
    render_analysis_markdown, render_json, render_library_markdown,
};
pub use schema::{ReportSchemaDoc, render_report_schema};
pub use session::{Session, SessionUser, View};
