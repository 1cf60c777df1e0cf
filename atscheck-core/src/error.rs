//! Error types for the ATS check core.

use std::{error::Error, fmt};

/// Error type for ATS check core operations.
///
/// Report and recommendation derivation never fail; this type covers the
/// session guards, argument parsing and rendering around them.
#[derive(Debug)]
pub enum AtsCheckError {
    /// JSON encoding failed.
    Json(serde_json::Error),
    /// An operation required a logged-in session.
    Unauthenticated,
    /// A caller-supplied value could not be interpreted.
    InvalidArgument(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for AtsCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for AtsCheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AtsCheckError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for the ATS check core.
pub type Result<T> = std::result::Result<T, AtsCheckError>;

#[cfg(test)]
mod tests {
    use super::AtsCheckError;
    use std::error::Error;

    #[test]
    fn unauthenticated_formats_message() {
        assert_eq!(
            format!("{}", AtsCheckError::Unauthenticated),
            "authentication required"
        );
    }

    #[test]
    fn invalid_argument_formats_message() {
        let error = AtsCheckError::InvalidArgument("sort order `best`".to_string());
        assert_eq!(format!("{error}"), "invalid argument: sort order `best`");
    }

    #[test]
    fn from_json_error_maps_variant_and_source() {
        let inner = serde_json::from_str::<Vec<String>>("not-json").unwrap_err();
        let error: AtsCheckError = inner.into();
        assert!(format!("{error}").starts_with("json error:"));
        assert!(error.source().is_some());
        assert!(matches!(error, AtsCheckError::Json(_)));
    }
}
