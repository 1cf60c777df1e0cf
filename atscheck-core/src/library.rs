//! Search, filter and sort helpers for a user's uploaded resumes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analysis::ScoreBand;
use crate::domain::ResumeRecord;
use crate::error::AtsCheckError;

/// Ordering applied to a resume listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recent upload first.
    #[default]
    Newest,
    /// Oldest upload first.
    Oldest,
    /// Highest ATS score first.
    Highest,
    /// Lowest ATS score first.
    Lowest,
    /// File name, A to Z.
    Name,
}

impl FromStr for SortOrder {
    type Err = AtsCheckError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "highest" => Ok(Self::Highest),
            "lowest" => Ok(Self::Lowest),
            "name" => Ok(Self::Name),
            other => Err(AtsCheckError::InvalidArgument(format!(
                "unknown sort order `{other}` (expected newest, oldest, highest, lowest or name)"
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Highest => "highest",
            Self::Lowest => "lowest",
            Self::Name => "name",
        };
        f.write_str(name)
    }
}

/// Score-based listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreFilter {
    /// Every resume.
    #[default]
    All,
    /// Resumes in the high score band.
    HighScore,
    /// Resumes in the low score band.
    NeedsWork,
}

impl ScoreFilter {
    /// Whether a record passes this filter.
    pub fn matches(self, record: &ResumeRecord) -> bool {
        let band = ScoreBand::from_score(record.ats_score);
        match self {
            Self::All => true,
            Self::HighScore => band == ScoreBand::High,
            Self::NeedsWork => band == ScoreBand::Low,
        }
    }
}

impl FromStr for ScoreFilter {
    type Err = AtsCheckError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "high-score" | "high" => Ok(Self::HighScore),
            "needs-work" => Ok(Self::NeedsWork),
            other => Err(AtsCheckError::InvalidArgument(format!(
                "unknown filter `{other}` (expected all, high-score or needs-work)"
            ))),
        }
    }
}

impl fmt::Display for ScoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::HighScore => "high-score",
            Self::NeedsWork => "needs-work",
        };
        f.write_str(name)
    }
}

/// Combined listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    /// Case-insensitive file name fragment; empty matches all.
    pub search: String,
    /// Listing order.
    pub sort: SortOrder,
    /// Score filter.
    pub filter: ScoreFilter,
}

/// Whole-library statistics shown above a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySummary {
    /// Uploaded resumes, before any search or filter.
    pub total_resumes: usize,
    /// Rounded mean ATS score.
    pub average_score: u32,
}

impl LibrarySummary {
    /// Statistics over every record.
    pub fn of(records: &[ResumeRecord]) -> Self {
        Self {
            total_resumes: records.len(),
            average_score: average_score(records),
        }
    }
}

/// Apply search, then filter, then sort.
pub fn query_library<'a>(records: &'a [ResumeRecord], query: &LibraryQuery) -> Vec<&'a ResumeRecord> {
    let mut matches: Vec<&ResumeRecord> = search_records(records, &query.search)
        .into_iter()
        .filter(|record| query.filter.matches(record))
        .collect();
    sort_records(&mut matches, query.sort);
    matches
}

/// Records whose file name contains `query`, ignoring case.
pub fn search_records<'a>(records: &'a [ResumeRecord], query: &str) -> Vec<&'a ResumeRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| needle.is_empty() || record.file_name.to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort. Records without an upload date go last for date orders.
pub fn sort_records(records: &mut [&ResumeRecord], order: SortOrder) {
    match order {
        SortOrder::Newest => records.sort_by(|a, b| dated_last(a, b, |a, b| b.cmp(a))),
        SortOrder::Oldest => records.sort_by(|a, b| dated_last(a, b, |a, b| a.cmp(b))),
        SortOrder::Highest => records.sort_by(|a, b| b.ats_score.cmp(&a.ats_score)),
        SortOrder::Lowest => records.sort_by(|a, b| a.ats_score.cmp(&b.ats_score)),
        SortOrder::Name => {
            records.sort_by_key(|record| record.file_name.to_lowercase());
        }
    }
}

/// Rounded mean ATS score; 0 for an empty library.
pub fn average_score(records: &[ResumeRecord]) -> u32 {
    if records.is_empty() {
        return 0;
    }
    let sum: u64 = records.iter().map(|record| u64::from(record.ats_score)).sum();
    (sum as f64 / records.len() as f64).round() as u32
}

fn dated_last<F>(a: &ResumeRecord, b: &ResumeRecord, compare: F) -> Ordering
where
    F: Fn(&chrono::NaiveDateTime, &chrono::NaiveDateTime) -> Ordering,
{
    match (&a.created_at, &b.created_at) {
        (Some(a), Some(b)) => compare(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str, score: u32, day: Option<u32>) -> ResumeRecord {
        ResumeRecord {
            file_name: name.to_string(),
            ats_score: score,
            created_at: day.and_then(|day| {
                NaiveDate::from_ymd_opt(2025, 3, day).and_then(|date| date.and_hms_opt(12, 0, 0))
            }),
            ..ResumeRecord::default()
        }
    }

    fn library() -> Vec<ResumeRecord> {
        vec![
            record("backend-dev.pdf", 85, Some(2)),
            record("Frontend.docx", 55, Some(9)),
            record("data_engineer.pdf", 70, None),
            record("archive.pdf", 40, Some(1)),
        ]
    }

    fn names(records: &[&ResumeRecord]) -> Vec<String> {
        records.iter().map(|r| r.file_name.clone()).collect()
    }

    #[test]
    fn search_ignores_case() {
        let records = library();
        assert_eq!(
            names(&search_records(&records, "FRONT")),
            vec!["Frontend.docx"]
        );
        assert_eq!(search_records(&records, "  ").len(), 4);
        assert!(search_records(&records, "missing").is_empty());
    }

    #[test]
    fn newest_puts_undated_last() {
        let records = library();
        let mut refs: Vec<&ResumeRecord> = records.iter().collect();
        sort_records(&mut refs, SortOrder::Newest);
        assert_eq!(
            names(&refs),
            vec![
                "Frontend.docx",
                "backend-dev.pdf",
                "archive.pdf",
                "data_engineer.pdf"
            ]
        );

        sort_records(&mut refs, SortOrder::Oldest);
        assert_eq!(names(&refs)[0], "archive.pdf");
        assert_eq!(names(&refs)[3], "data_engineer.pdf");
    }

    #[test]
    fn sorts_by_score_and_name() {
        let records = library();
        let mut refs: Vec<&ResumeRecord> = records.iter().collect();
        sort_records(&mut refs, SortOrder::Highest);
        assert_eq!(names(&refs)[0], "backend-dev.pdf");
        sort_records(&mut refs, SortOrder::Lowest);
        assert_eq!(names(&refs)[0], "archive.pdf");
        sort_records(&mut refs, SortOrder::Name);
        assert_eq!(
            names(&refs),
            vec![
                "archive.pdf",
                "backend-dev.pdf",
                "data_engineer.pdf",
                "Frontend.docx"
            ]
        );
    }

    #[test]
    fn filters_by_score_band() {
        let records = library();
        let high = LibraryQuery {
            filter: ScoreFilter::HighScore,
            ..LibraryQuery::default()
        };
        assert_eq!(names(&query_library(&records, &high)), vec!["backend-dev.pdf"]);

        let needs_work = LibraryQuery {
            filter: ScoreFilter::NeedsWork,
            sort: SortOrder::Lowest,
            ..LibraryQuery::default()
        };
        assert_eq!(
            names(&query_library(&records, &needs_work)),
            vec!["archive.pdf", "Frontend.docx"]
        );
    }

    #[test]
    fn query_combines_search_and_sort() {
        let records = library();
        let query = LibraryQuery {
            search: ".pdf".to_string(),
            sort: SortOrder::Highest,
            filter: ScoreFilter::All,
        };
        assert_eq!(
            names(&query_library(&records, &query)),
            vec!["backend-dev.pdf", "data_engineer.pdf", "archive.pdf"]
        );
    }

    #[test]
    fn average_rounds_and_handles_empty() {
        assert_eq!(average_score(&[]), 0);
        assert_eq!(average_score(&library()), 63);
        let records = vec![record("a", 70, None), record("b", 71, None)];
        assert_eq!(average_score(&records), 71);
    }

    #[test]
    fn summary_covers_whole_library() {
        let records = library();
        let summary = LibrarySummary::of(&records);
        assert_eq!(summary.total_resumes, records.len());
        assert_eq!(summary.average_score, 63);
        assert_eq!(LibrarySummary::of(&[]), LibrarySummary::default());
    }

    #[test]
    fn parses_sort_and_filter_names() {
        assert_eq!("Highest".parse::<SortOrder>().expect("sort"), SortOrder::Highest);
        assert_eq!(
            "needs-work".parse::<ScoreFilter>().expect("filter"),
            ScoreFilter::NeedsWork
        );
        let err = "best".parse::<SortOrder>().unwrap_err();
        assert!(err.to_string().contains("unknown sort order"));
        assert_eq!(SortOrder::Name.to_string(), "name");
        assert_eq!(ScoreFilter::HighScore.to_string(), "high-score");
    }
}
