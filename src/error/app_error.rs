use crate::config::ConfigError;
use crate::services::notifications::NotifyError;
use thiserror::Error;

/// Application-wide error type for the command-line surface.
///
/// Delivery failures never reach this type: `notify` logs and swallows them.
/// What remains is bad input, bad configuration and local I/O.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Build outcome could not be read or parsed
    #[error("Failed to read build outcome from {path}")]
    Outcome {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::ValidationError { field, message } => AppError::Validation {
                field,
                reason: message,
            },
            other => AppError::Configuration {
                key: "settings".to_string(),
                source: other.into(),
            },
        }
    }
}

impl From<NotifyError> for AppError {
    fn from(error: NotifyError) -> Self {
        match error {
            NotifyError::MissingSetting { field } => AppError::Validation {
                field: field.to_string(),
                reason: "must be set".to_string(),
            },
            NotifyError::Endpoint { .. } => AppError::Configuration {
                key: "notifier.api_base_url".to_string(),
                source: error.into(),
            },
            other => AppError::Internal {
                source: other.into(),
            },
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
