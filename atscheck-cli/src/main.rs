#![deny(missing_docs)]
//! ATS check command-line interface.
//!
//! Uploads resumes to the checker backend and renders the derived analysis,
//! recommendations and resume library.

mod api;
mod auth;

use api::{DEFAULT_API_URL, ReqwestResumeApi, ResumeApi};
use atscheck_core::{
    LibraryQuery, LibrarySummary, NO_QUICK_WINS, ResumeAnalysis, ResumeRecord, ScoreBand,
    ScoreFilter, Session, SortOrder, View, category_status_label, check_status_label,
    display_file_name, query_library, render_analysis_markdown, render_json,
    render_library_markdown, render_report_schema,
};
use auth::{LoginArgs, RegisterArgs};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "atscheck", version, about = "ATS resume checker CLI")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ConnectionArgs {
    /// Base URL of the checker backend API.
    #[arg(long, global = true, env = "ATSCHECK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Session file to use instead of the default location.
    #[arg(long, global = true)]
    session_path: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Args, Clone)]
struct ListArgs {
    /// Case-insensitive file name fragment.
    #[arg(long, default_value = "")]
    search: String,
    /// Listing order: newest, oldest, highest, lowest or name.
    #[arg(long, default_value_t = SortOrder::Newest)]
    sort: SortOrder,
    /// Score filter: all, high-score or needs-work.
    #[arg(long, default_value_t = ScoreFilter::All)]
    filter: ScoreFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an existing account.
    Login(LoginArgs),
    /// Create an account and log in.
    Register(RegisterArgs),
    /// Forget the stored session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Upload a PDF or DOCX resume and print its analysis.
    Upload {
        /// Resume file to upload.
        file: PathBuf,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// List uploaded resumes.
    List {
        #[command(flatten)]
        query: ListArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Print the analysis of an uploaded resume.
    Show {
        /// Resume ID.
        id: i64,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Delete an uploaded resume.
    Delete {
        /// Resume ID.
        id: i64,
    },
    /// Print the JSON schema of the report payloads.
    Schema {
        /// Write the schema to a file instead of stdout.
        #[arg(long = "report-output")]
        report_output: Option<PathBuf>,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let session_path = auth::session_store_path(cli.connection.session_path.clone())?;

    let api = ReqwestResumeApi::new(&cli.connection.api_url)?;
    run_command(&api, cli.command, &session_path).await
}

#[cfg(test)]
fn main() {}

async fn run_command<A: ResumeApi>(
    api: &A,
    command: Commands,
    session_path: &Path,
) -> CliResult<()> {
    match command {
        Commands::Login(args) => auth::run_login(api, args, session_path).await,
        Commands::Register(args) => auth::run_register(api, args, session_path).await,
        Commands::Upload { file, report } => run_upload(api, &file, &report, session_path).await,
        Commands::List { query, report } => {
            let query = LibraryQuery {
                search: query.search,
                sort: query.sort,
                filter: query.filter,
            };
            run_list(api, &query, &report, session_path).await
        }
        Commands::Show { id, report } => run_show(api, id, &report, session_path).await,
        Commands::Delete { id } => run_delete(api, id, session_path).await,
        Commands::Logout => auth::run_logout(session_path).await,
        Commands::Whoami => auth::run_whoami(session_path).await,
        Commands::Schema { report_output } => run_schema(report_output).await,
    }
}

/// Read the stored session and its bearer token.
async fn authorized_session(session_path: &Path) -> CliResult<(Session, String)> {
    let session = auth::read_session(session_path).await?;
    let token = session.require_token()?.to_string();
    Ok((session, token))
}

async fn run_upload<A: ResumeApi>(
    api: &A,
    file: &Path,
    output: &OutputArgs,
    session_path: &Path,
) -> CliResult<()> {
    let (mut session, token) = authorized_session(session_path).await?;
    let result = api.upload_resume(&token, file).await;
    let record = auth::expire_on_unauthorized(result, &mut session, session_path).await?;
    if let Some(id) = record.id {
        session.navigate(View::Results(id));
        auth::write_session(session_path, &session).await?;
    }
    emit_analysis(&ResumeAnalysis::analyze(record), output).await
}

async fn run_list<A: ResumeApi>(
    api: &A,
    query: &LibraryQuery,
    output: &OutputArgs,
    session_path: &Path,
) -> CliResult<()> {
    let (mut session, token) = authorized_session(session_path).await?;
    let result = api.list_resumes(&token).await;
    let records = auth::expire_on_unauthorized(result, &mut session, session_path).await?;
    session.navigate(View::Dashboard);
    auth::write_session(session_path, &session).await?;

    let summary = LibrarySummary::of(&records);
    let matches = query_library(&records, query);
    emit_library(&matches, &summary, output).await
}

async fn run_show<A: ResumeApi>(
    api: &A,
    id: i64,
    output: &OutputArgs,
    session_path: &Path,
) -> CliResult<()> {
    let (mut session, token) = authorized_session(session_path).await?;
    let result = api.get_resume(&token, id).await;
    let record = auth::expire_on_unauthorized(result, &mut session, session_path).await?;
    session.navigate(View::Results(id));
    auth::write_session(session_path, &session).await?;
    emit_analysis(&ResumeAnalysis::analyze(record), output).await
}

async fn run_delete<A: ResumeApi>(api: &A, id: i64, session_path: &Path) -> CliResult<()> {
    let (mut session, token) = authorized_session(session_path).await?;
    let result = api.delete_resume(&token, id).await;
    let message = auth::expire_on_unauthorized(result, &mut session, session_path).await?;
    session.navigate(View::Dashboard);
    auth::write_session(session_path, &session).await?;
    if message.is_empty() {
        println!("Deleted resume {id}.");
    } else {
        println!("{message}");
    }
    Ok(())
}

async fn run_schema(report_output: Option<PathBuf>) -> CliResult<()> {
    let output = OutputArgs {
        format: OutputFormat::Json,
        report_output,
    };
    let mut contents = render_report_schema()?;
    contents.push('\n');
    emit_output(&output, contents).await
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LibraryListing<'a> {
    #[serde(flatten)]
    summary: &'a LibrarySummary,
    resumes: &'a [&'a ResumeRecord],
}

async fn emit_analysis(analysis: &ResumeAnalysis, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_analysis_text(analysis),
        OutputFormat::Markdown => render_analysis_markdown(analysis),
        OutputFormat::Json => render_json(analysis)?,
    };
    emit_output(output, contents).await
}

async fn emit_library(
    records: &[&ResumeRecord],
    summary: &LibrarySummary,
    output: &OutputArgs,
) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_library_text(records, summary),
        OutputFormat::Markdown => render_library_markdown(records, summary),
        OutputFormat::Json => render_json(&LibraryListing {
            summary,
            resumes: records,
        })?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_analysis_text(analysis: &ResumeAnalysis) -> String {
    let mut output = String::new();
    let report = &analysis.report;
    let _ = writeln!(output, "Resume: {}", display_file_name(&analysis.record));
    if let Some(id) = analysis.record.id {
        let _ = writeln!(output, "ID: {id}");
    }
    if let Some(date) = analysis.record.upload_date() {
        let _ = writeln!(output, "Uploaded: {date}");
    }
    let _ = writeln!(
        output,
        "Score: {}/100 ({})",
        report.overall_score,
        analysis.band().label()
    );
    let _ = writeln!(
        output,
        "Checks passed: {}/{}",
        analysis.passed_count, analysis.total_count
    );
    let _ = writeln!(output, "Feedback: {}", report.feedback);
    if report.keywords.is_empty() {
        let _ = writeln!(output, "Keywords: none detected");
    } else {
        let _ = writeln!(output, "Keywords: {}", report.keywords.join(", "));
    }

    for category in &report.categories {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "{}: {}% ({})",
            category.name,
            category.score,
            category_status_label(category.status)
        );
        for item in &category.items {
            let _ = write!(
                output,
                "  [{}] {}: {}",
                check_status_label(item.status),
                item.name,
                item.message
            );
            match item.impact {
                Some(impact) => {
                    let _ = writeln!(output, " ({} impact)", impact_label(impact));
                }
                None => {
                    let _ = writeln!(output);
                }
            }
        }
    }

    let _ = writeln!(output);
    if analysis.recommendations.is_empty() {
        let _ = writeln!(output, "{NO_QUICK_WINS}");
    } else {
        let _ = writeln!(output, "Recommendations:");
        for recommendation in &analysis.recommendations {
            let _ = writeln!(
                output,
                "  - [{}] {}: {}",
                recommendation.priority.as_str(),
                recommendation.title,
                recommendation.description
            );
        }
    }
    output
}

fn impact_label(impact: atscheck_core::Impact) -> &'static str {
    match impact {
        atscheck_core::Impact::High => "high",
        atscheck_core::Impact::Medium => "medium",
    }
}

fn render_library_text(records: &[&ResumeRecord], summary: &LibrarySummary) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Total resumes: {}  Average score: {}",
        summary.total_resumes, summary.average_score
    );
    if records.is_empty() {
        let _ = writeln!(output, "No resumes found.");
        return output;
    }
    for record in records {
        let id = record
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            output,
            "{id:>5}  {:>3} {:<6}  {:<18}  {}",
            record.ats_score,
            ScoreBand::from_score(record.ats_score).as_str(),
            record.upload_date().unwrap_or_else(|| "-".to_string()),
            display_file_name(record)
        );
    }
    output
}
