//! Engine error type.
//!
//! Caller mistakes (bad color text, unknown format, unknown token) come back
//! synchronously from the operation that received them. `IncompleteTheme`
//! means the pipeline itself produced a hole and is only expected in tests.
//! `CorruptPersistedState` is produced by decoding and swallowed by
//! [`ThemeStore::load`](crate::ThemeStore::load).

use std::io;
use std::path::PathBuf;

use ax_color::ParseColorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid color '{input}': {reason}")]
    InvalidColor { input: String, reason: String },

    #[error("theme '{id}' is incomplete, missing tokens: {}", missing.join(", "))]
    IncompleteTheme { id: String, missing: Vec<String> },

    #[error("unsupported export format '{0}' (expected css, scss, json or tailwind)")]
    UnsupportedFormat(String),

    #[error("unsupported mode '{0}' (expected light, dark or both)")]
    UnsupportedMode(String),

    #[error("invalid theme import: {0}")]
    InvalidImport(String),

    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("invalid value '{value}' for token '{token}'")]
    InvalidTokenValue { token: String, value: String },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("preset '{0}' is built in and cannot be changed")]
    ReadOnlyPreset(String),

    #[error("corrupt persisted theme state: {0}")]
    CorruptPersistedState(String),

    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    /// Wrap a color parse failure together with the text that caused it.
    pub fn invalid_color(input: &str, err: &ParseColorError) -> Self {
        Self::InvalidColor {
            input: input.trim().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<ParseColorError> for ThemeError {
    fn from(err: ParseColorError) -> Self {
        let input = match &err {
            ParseColorError::InvalidHex(s) | ParseColorError::Unrecognized(s) => s.clone(),
            ParseColorError::PercentOutOfRange { value, .. } => value.clone(),
            ParseColorError::ChannelOutOfRange { value, .. } => value.to_string(),
            ParseColorError::Empty => String::new(),
        };
        Self::InvalidColor {
            input,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_converts_to_invalid_color() {
        let err: ThemeError = ax_color::Color::parse("#12").unwrap_err().into();
        assert!(matches!(err, ThemeError::InvalidColor { ref input, .. } if input == "#12"));
    }

    #[test]
    fn incomplete_lists_missing_tokens() {
        let err = ThemeError::IncompleteTheme {
            id: "custom".into(),
            missing: vec!["text-default".into(), "nav-bg".into()],
        };
        assert_eq!(
            err.to_string(),
            "theme 'custom' is incomplete, missing tokens: text-default, nav-bg"
        );
    }

    #[test]
    fn storage_error_keeps_source() {
        use std::error::Error as _;
        let err = ThemeError::Storage {
            path: PathBuf::from("/tmp/x.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/tmp/x.json"));
    }
}
