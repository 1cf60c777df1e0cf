//! REST client for the ATS checker backend.

use crate::CliResult;
use atscheck_core::ResumeRecord;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Largest resume the backend accepts.
pub(crate) const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Future returned by [`ResumeApi`] methods.
pub(crate) type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = CliResult<T>> + Send + 'a>>;

/// Failure reported by the backend.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ApiError {
    /// The token was missing, expired or rejected.
    Unauthorized,
    /// Any other non-success status.
    Status { status: u16, message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "authentication required; run `login` again"),
            Self::Status { status, message } if message.is_empty() => {
                write!(f, "request failed with status {status}")
            }
            Self::Status { status, message } => write!(f, "{message} (status {status})"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Credentials for `POST /auth/login`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

/// Token and profile returned by login and register.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub(crate) token: String,
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
}

/// Resume file types the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UploadKind {
    Pdf,
    Docx,
}

impl UploadKind {
    fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => PDF_CONTENT_TYPE,
            Self::Docx => DOCX_CONTENT_TYPE,
        }
    }
}

/// Check the file before any bytes are sent.
pub(crate) fn validate_upload_path(path: &Path) -> CliResult<UploadKind> {
    if !path.is_file() {
        return Err(format!("file not found: {}", path.display()).into());
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let kind = match extension.as_str() {
        "pdf" => UploadKind::Pdf,
        "docx" => UploadKind::Docx,
        other => {
            return Err(format!(
                "only PDF and DOCX files are allowed (got extension `{other}`)"
            )
            .into());
        }
    };
    if std::fs::metadata(path)?.len() > MAX_UPLOAD_BYTES {
        return Err("file size must be less than 10MB".into());
    }
    Ok(kind)
}

/// Normalize the API base URL for consistent request paths.
pub(crate) fn normalize_api_url(api_url: &str) -> CliResult<String> {
    let trimmed = api_url.trim();
    if trimmed.is_empty() {
        return Err("api url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Data-access operations used by the CLI commands.
pub(crate) trait ResumeApi {
    fn login<'a>(&'a self, request: &'a LoginRequest) -> ApiFuture<'a, AuthResponse>;

    fn register<'a>(&'a self, request: &'a RegisterRequest) -> ApiFuture<'a, AuthResponse>;

    fn upload_resume<'a>(&'a self, token: &'a str, path: &'a Path) -> ApiFuture<'a, ResumeRecord>;

    fn list_resumes<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Vec<ResumeRecord>>;

    fn get_resume<'a>(&'a self, token: &'a str, id: i64) -> ApiFuture<'a, ResumeRecord>;

    fn delete_resume<'a>(&'a self, token: &'a str, id: i64) -> ApiFuture<'a, String>;
}

/// Reqwest-backed API client.
pub(crate) struct ReqwestResumeApi {
    client: Client,
    base_url: String,
}

impl ReqwestResumeApi {
    /// Build a client for the given base URL.
    pub(crate) fn new(api_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("atscheck-cli").build()?;
        Ok(Self {
            client,
            base_url: normalize_api_url(api_url)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> CliResult<AuthResponse> {
        let url = self.url(path);
        debug!("POST {url}");
        let response = self.client.post(url).json(payload).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<AuthResponse>().await?)
    }

    async fn upload(&self, token: &str, path: &Path) -> CliResult<ResumeRecord> {
        let kind = validate_upload_path(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("resume")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(kind.content_type())?;
        let form = Form::new().part("file", part);
        let url = self.url("/resumes/upload");
        debug!("POST {url}");
        let response = send_authorized(self.client.post(url).multipart(form), token).await?;
        Ok(response.json::<ResumeRecord>().await?)
    }

    async fn list(&self, token: &str) -> CliResult<Vec<ResumeRecord>> {
        let url = self.url("/resumes");
        debug!("GET {url}");
        let response = send_authorized(self.client.get(url), token).await?;
        Ok(response.json::<Vec<ResumeRecord>>().await?)
    }

    async fn get(&self, token: &str, id: i64) -> CliResult<ResumeRecord> {
        let url = self.url(&format!("/resumes/{id}"));
        debug!("GET {url}");
        let response = send_authorized(self.client.get(url), token).await?;
        Ok(response.json::<ResumeRecord>().await?)
    }

    async fn delete(&self, token: &str, id: i64) -> CliResult<String> {
        let url = self.url(&format!("/resumes/{id}"));
        debug!("DELETE {url}");
        let response = send_authorized(self.client.delete(url), token).await?;
        Ok(response.text().await?.trim().to_string())
    }
}

impl ResumeApi for ReqwestResumeApi {
    fn login<'a>(&'a self, request: &'a LoginRequest) -> ApiFuture<'a, AuthResponse> {
        Box::pin(self.post_auth("/auth/login", request))
    }

    fn register<'a>(&'a self, request: &'a RegisterRequest) -> ApiFuture<'a, AuthResponse> {
        Box::pin(self.post_auth("/auth/register", request))
    }

    fn upload_resume<'a>(&'a self, token: &'a str, path: &'a Path) -> ApiFuture<'a, ResumeRecord> {
        Box::pin(self.upload(token, path))
    }

    fn list_resumes<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Vec<ResumeRecord>> {
        Box::pin(self.list(token))
    }

    fn get_resume<'a>(&'a self, token: &'a str, id: i64) -> ApiFuture<'a, ResumeRecord> {
        Box::pin(self.get(token, id))
    }

    fn delete_resume<'a>(&'a self, token: &'a str, id: i64) -> ApiFuture<'a, String> {
        Box::pin(self.delete(token, id))
    }
}

async fn send_authorized(request: RequestBuilder, token: &str) -> CliResult<Response> {
    let response = request.bearer_auth(token).send().await?;
    check_status(response).await
}

/// Map 401 and other failures to [`ApiError`], keeping the backend's message.
async fn check_status(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized.into());
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: message.trim().to_string(),
        }
        .into());
    }
    Ok(response)
}
