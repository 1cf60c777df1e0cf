//! Domain entities for the ATS checker.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Analysis result for one uploaded resume, as returned by the backend.
///
/// Flags and the score are authoritative backend output. Missing or `null`
/// fields decode to their defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    /// Backend identifier, used to fetch or delete the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Original upload file name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    /// Upload timestamp (backend local time, no zone).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<NaiveDateTime>,
    /// Overall ATS score, 0-100.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ats_score: u32,
    /// Whether any contact information was found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_contact_info: bool,
    /// Whether an email address was found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_email: bool,
    /// Whether a phone number was found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_phone: bool,
    /// Whether profile or portfolio links were found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_links: bool,
    /// Whether an experience section was found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_experience: bool,
    /// Whether an education section was found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_education: bool,
    /// Whether a skills section was found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_skills: bool,
    /// Text extracted from the uploaded file, when the backend returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    /// Free-text feedback from the scoring service.
    #[serde(default, deserialize_with = "null_as_default")]
    pub feedback: String,
    /// Keywords as JSON text (an encoded array of strings).
    #[serde(
        default,
        deserialize_with = "keywords_as_json_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub keywords: Option<String>,
}

impl ResumeRecord {
    /// Whether the backend extracted any text from the file.
    pub fn has_extracted_text(&self) -> bool {
        self.extracted_text
            .as_deref()
            .is_some_and(|text| !text.is_empty())
    }

    /// Upload date formatted for display, e.g. `January 3, 2025`.
    pub fn upload_date(&self) -> Option<String> {
        self.created_at
            .map(|created_at| created_at.format("%B %-d, %Y").to_string())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Stored records carry an encoded string while the list endpoints send a
// decoded array; both end up as the same JSON text.
fn keywords_as_json_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}
