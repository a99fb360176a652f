//! Error types module
//!
//! Every provider operation reports failures through [`ProviderError`]. Each
//! variant belongs to one [`ErrorKind`], so callers can branch on the class of
//! failure (bad configuration, untranslatable preset, missing preset mapping,
//! remote failure, inconsistent remote response) without comparing messages.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for configuration problems
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Class of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Detected while building a provider; never needs a network call.
    Configuration,
    /// A canonical field could not be mapped to a backend value.
    Translation,
    /// A preset map has no identifier for the target provider.
    MappingAbsent,
    /// The backend API or the transport failed.
    Remote,
    /// The backend answered successfully but the answer is structurally incomplete.
    InconsistentResponse,
    /// Provider registration or lookup failed.
    Registry,
    /// The operation was aborted before it completed.
    Cancelled,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Translation => write!(f, "translation"),
            ErrorKind::MappingAbsent => write!(f, "mapping_absent"),
            ErrorKind::Remote => write!(f, "remote"),
            ErrorKind::InconsistentResponse => write!(f, "inconsistent_response"),
            ErrorKind::Registry => write!(f, "registry"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("incomplete configuration for provider '{provider}': {message}")]
    IncompleteConfig { provider: String, message: String },

    #[error("provider '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("provider '{0}' not found")]
    NotFound(String),

    #[error("unsupported container: {0:?}")]
    UnsupportedContainer(String),

    #[error("invalid {field}: {value:?} is not a valid {expected}")]
    InvalidField {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unsupported {field}: {value:?}")]
    Unsupported { field: &'static str, value: String },

    #[error("preset has neither video nor thumbnail settings")]
    MissingEncodeSettings,

    #[error("preset map '{preset}' has no preset for provider '{provider}'")]
    PresetMapNotFound { preset: String, provider: String },

    #[error("{operation}: {source:#}")]
    Remote {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("no video track found in output {output}")]
    NoVideoTrack { output: String },

    #[error("inconsistent response from {operation}: {message}")]
    InconsistentResponse { operation: String, message: String },

    #[error("{0} was cancelled")]
    Cancelled(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    pub fn incomplete_config(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::IncompleteConfig {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn invalid_field(
        field: &'static str,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        ProviderError::InvalidField {
            field,
            value: value.into(),
            expected,
        }
    }

    pub fn unsupported(field: &'static str, value: impl Into<String>) -> Self {
        ProviderError::Unsupported {
            field,
            value: value.into(),
        }
    }

    pub fn remote(operation: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        ProviderError::Remote {
            operation: operation.into(),
            source: source.into(),
        }
    }

    pub fn inconsistent(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::InconsistentResponse {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::IncompleteConfig { .. } => ErrorKind::Configuration,
            ProviderError::AlreadyRegistered(_) | ProviderError::NotFound(_) => {
                ErrorKind::Registry
            }
            ProviderError::UnsupportedContainer(_)
            | ProviderError::InvalidField { .. }
            | ProviderError::Unsupported { .. }
            | ProviderError::MissingEncodeSettings => ErrorKind::Translation,
            ProviderError::PresetMapNotFound { .. } => ErrorKind::MappingAbsent,
            ProviderError::Remote { .. } => ErrorKind::Remote,
            ProviderError::NoVideoTrack { .. } | ProviderError::InconsistentResponse { .. } => {
                ErrorKind::InconsistentResponse
            }
            ProviderError::Cancelled(_) => ErrorKind::Cancelled,
        }
    }

    /// Machine-readable error code (e.g., "UNSUPPORTED_CONTAINER")
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::IncompleteConfig { .. } => "INCOMPLETE_CONFIG",
            ProviderError::AlreadyRegistered(_) => "ALREADY_REGISTERED",
            ProviderError::NotFound(_) => "PROVIDER_NOT_FOUND",
            ProviderError::UnsupportedContainer(_) => "UNSUPPORTED_CONTAINER",
            ProviderError::InvalidField { .. } => "INVALID_FIELD",
            ProviderError::Unsupported { .. } => "UNSUPPORTED_VALUE",
            ProviderError::MissingEncodeSettings => "MISSING_ENCODE_SETTINGS",
            ProviderError::PresetMapNotFound { .. } => "PRESET_MAP_NOT_FOUND",
            ProviderError::Remote { .. } => "REMOTE_ERROR",
            ProviderError::NoVideoTrack { .. } => "NO_VIDEO_TRACK",
            ProviderError::InconsistentResponse { .. } => "INCONSISTENT_RESPONSE",
            ProviderError::Cancelled(_) => "CANCELLED",
        }
    }

    /// Whether a later identical call could succeed. This layer never retries itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Remote | ErrorKind::Cancelled)
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self.kind() {
            ErrorKind::Translation | ErrorKind::MappingAbsent | ErrorKind::Registry => {
                LogLevel::Debug
            }
            ErrorKind::Configuration | ErrorKind::Cancelled => LogLevel::Warn,
            ErrorKind::Remote | ErrorKind::InconsistentResponse => LogLevel::Error,
        }
    }
}

/// Extension trait that tags transport failures with the local operation name.
pub trait RemoteResultExt<T> {
    fn remote(self, operation: impl Into<String>) -> ProviderResult<T>;

    fn with_remote<S, F>(self, operation: F) -> ProviderResult<T>
    where
        S: Into<String>,
        F: FnOnce() -> S;
}

impl<T, E: Into<anyhow::Error>> RemoteResultExt<T> for Result<T, E> {
    fn remote(self, operation: impl Into<String>) -> ProviderResult<T> {
        self.map_err(|e| ProviderError::remote(operation, e))
    }

    fn with_remote<S, F>(self, operation: F) -> ProviderResult<T>
    where
        S: Into<String>,
        F: FnOnce() -> S,
    {
        self.map_err(|e| ProviderError::remote(operation(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_original_message() {
        let result: Result<(), anyhow::Error> = Err(anyhow::anyhow!("connection refused"));
        let err = result.remote("healthcheck").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Remote);
        assert!(err.to_string().contains("healthcheck"));
        assert!(err.to_string().contains("connection refused"));
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_remote_error_includes_context_chain() {
        let result: Result<(), anyhow::Error> =
            Err(anyhow::anyhow!("timed out").context("GET /encoding/encodings"));
        let err = result.with_remote(|| "listing encodings").unwrap_err();

        let message = err.to_string();
        assert!(message.contains("listing encodings"));
        assert!(message.contains("GET /encoding/encodings"));
        assert!(message.contains("timed out"));
    }

    #[test]
    fn test_invalid_field_names_field_value_and_type() {
        let err = ProviderError::invalid_field("video bitrate", "fast", "integer");
        let message = err.to_string();

        assert_eq!(err.kind(), ErrorKind::Translation);
        assert_eq!(err.error_code(), "INVALID_FIELD");
        assert!(message.contains("video bitrate"));
        assert!(message.contains("\"fast\""));
        assert!(message.contains("integer"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            ProviderError::incomplete_config("bitmovin", "missing api_key").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ProviderError::AlreadyRegistered("x".into()).kind(),
            ErrorKind::Registry
        );
        assert_eq!(ProviderError::NotFound("x".into()).kind(), ErrorKind::Registry);
        assert_eq!(
            ProviderError::PresetMapNotFound {
                preset: "720p".into(),
                provider: "mediaconvert".into()
            }
            .kind(),
            ErrorKind::MappingAbsent
        );
        assert_eq!(
            ProviderError::NoVideoTrack {
                output: "a.mp4".into()
            }
            .kind(),
            ErrorKind::InconsistentResponse
        );
        assert_eq!(
            ProviderError::MissingEncodeSettings.kind(),
            ErrorKind::Translation
        );
        assert_eq!(
            ProviderError::Cancelled("x".into()).kind(),
            ErrorKind::Cancelled
        );
    }

    #[test]
    fn test_incomplete_config_message() {
        let err = ProviderError::incomplete_config("mediaconvert", "missing queue");
        assert_eq!(
            err.to_string(),
            "incomplete configuration for provider 'mediaconvert': missing queue"
        );
        assert_eq!(err.log_level(), LogLevel::Warn);
    }
}
