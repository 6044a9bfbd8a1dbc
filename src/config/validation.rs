//! Configuration validation logic
//!
//! `Settings::validate` runs on every load and only checks values that would
//! make the process misbehave (zero timeouts, malformed URLs, bad log
//! levels). Whether a notification can actually be sent is checked separately
//! by `NotifierSettings::validate_delivery`.

use url::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    CiSettings, HttpSettings, LoggerSettings, NotifierSettings, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for any HTTP timeout
const MAX_TIMEOUT_SECONDS: u64 = 300;

fn validate_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ValidationError {
        field: field.to_string(),
        message: format!("Invalid URL '{}': {}", value, e),
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("URL must use http or https, got '{}'", url.scheme()),
        });
    }

    Ok(url)
}

impl NotifierSettings {
    /// Validate notifier configuration
    ///
    /// # Validation Rules
    /// - API base URL must be an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("notifier.api_base_url", &self.api_base_url)?;
        Ok(())
    }

    /// Check that a notification could be delivered with these settings
    ///
    /// # Validation Rules
    /// - API token must be set
    /// - Room id must be set and must not contain `/`
    /// - Message template must not be empty
    pub fn validate_delivery(&self) -> Result<(), ConfigError> {
        if self.api_token.is_empty() {
            return Err(ConfigError::validation(
                "notifier.api_token",
                "API token is required. Set CHATWORK_NOTIFIER__API_TOKEN or notifier.api_token.",
            ));
        }

        let room_id = self.room_id.trim();
        if room_id.is_empty() {
            return Err(ConfigError::validation(
                "notifier.room_id",
                "Room id is required. Set CHATWORK_NOTIFIER__ROOM_ID, notifier.room_id or --room-id.",
            ));
        }

        if room_id.contains('/') {
            return Err(ConfigError::ValidationError {
                field: "notifier.room_id".to_string(),
                message: format!("Room id '{}' must not contain '/'", room_id),
            });
        }

        if self.message_template.is_empty() {
            return Err(ConfigError::validation(
                "notifier.message_template",
                "Message template cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl HttpSettings {
    /// Validate HTTP client configuration
    ///
    /// # Validation Rules
    /// - Timeouts must be between 1 and 300 seconds
    /// - Connect timeout cannot exceed the request timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::ValidationError {
                field: "http.timeout_seconds".to_string(),
                message: format!(
                    "Request timeout must be between 1 and {} seconds, got {}.",
                    MAX_TIMEOUT_SECONDS, self.timeout_seconds
                ),
            });
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds > self.timeout_seconds {
            return Err(ConfigError::ValidationError {
                field: "http.connect_timeout_seconds".to_string(),
                message: format!(
                    "Connect timeout ({}) cannot exceed request timeout ({}).",
                    self.connect_timeout_seconds, self.timeout_seconds
                ),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::validation(
                "http.user_agent",
                "User-Agent cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl CiSettings {
    /// Validate CI host configuration
    ///
    /// An empty base URL is allowed; `${url}` then renders the bare build path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.is_empty() {
            validate_http_url("ci.base_url", &self.base_url)?;
        }
        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if self.file.enabled {
            self.file.parse_format()?;

            if self.file.path.trim().is_empty() {
                return Err(ConfigError::validation(
                    "logger.file.path",
                    "Log file path cannot be empty when file output is enabled.",
                ));
            }
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all structural settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notifier.validate()?;
        self.http.validate()?;
        self.ci.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiToken;

    fn deliverable() -> NotifierSettings {
        NotifierSettings {
            api_token: ApiToken::new("token"),
            room_id: "12345".to_string(),
            ..NotifierSettings::default()
        }
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_default_settings_are_not_deliverable() {
        let err = Settings::default().notifier.validate_delivery().unwrap_err();
        assert!(err.to_string().contains("notifier.api_token"));
    }

    #[test]
    fn test_validate_delivery_success() {
        assert!(deliverable().validate_delivery().is_ok());
    }

    #[test]
    fn test_validate_delivery_missing_room() {
        let mut notifier = deliverable();
        notifier.room_id = "  ".to_string();
        let err = notifier.validate_delivery().unwrap_err();
        assert!(err.to_string().contains("notifier.room_id"));
    }

    #[test]
    fn test_validate_delivery_room_with_slash() {
        let mut notifier = deliverable();
        notifier.room_id = "1/2".to_string();
        assert!(notifier.validate_delivery().is_err());
    }

    #[test]
    fn test_validate_delivery_empty_template() {
        let mut notifier = deliverable();
        notifier.message_template = String::new();
        assert!(notifier.validate_delivery().is_err());
    }

    #[test]
    fn test_invalid_api_base_url() {
        let mut notifier = deliverable();
        notifier.api_base_url = "ftp://api.chatwork.com/v1".to_string();
        assert!(notifier.validate().is_err());

        notifier.api_base_url = "not a url".to_string();
        assert!(notifier.validate().is_err());
    }

    #[test]
    fn test_http_timeouts() {
        let mut http = HttpSettings::default();
        http.timeout_seconds = 0;
        assert!(http.validate().is_err());

        http.timeout_seconds = 301;
        assert!(http.validate().is_err());

        http.timeout_seconds = 3;
        http.connect_timeout_seconds = 5;
        assert!(http.validate().is_err());

        http.connect_timeout_seconds = 0;
        assert!(http.validate().is_err());

        http.connect_timeout_seconds = 3;
        assert!(http.validate().is_ok());
    }

    #[test]
    fn test_ci_base_url() {
        assert!(CiSettings::default().validate().is_ok());
        assert!(
            CiSettings {
                base_url: "https://ci.example.com/".to_string()
            }
            .validate()
            .is_ok()
        );
        assert!(
            CiSettings {
                base_url: "ci.example.com".to_string()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_logger_validation() {
        let mut logger = LoggerSettings::default();
        logger.level = "verbose".to_string();
        assert!(logger.validate().is_err());

        let mut logger = LoggerSettings::default();
        logger.file.enabled = true;
        logger.file.format = "yaml".to_string();
        assert!(logger.validate().is_err());

        let mut logger = LoggerSettings::default();
        logger.console.enabled = false;
        assert!(logger.validate().is_err());
    }
}
