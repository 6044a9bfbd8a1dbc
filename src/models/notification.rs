//! Notification configuration models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ChatWork API token
///
/// Serializes transparently, but `Debug` and `Display` never reveal the value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token for the request header
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("<unset>")
        } else {
            f.write_str("***")
        }
    }
}

/// Where and how to post a build notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub api_token: ApiToken,
    pub room_id: String,
    pub message_template: String,
}

impl NotificationConfig {
    pub fn new(
        api_token: impl Into<String>,
        room_id: impl Into<String>,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            api_token: ApiToken::new(api_token),
            room_id: room_id.into(),
            message_template: message_template.into(),
        }
    }
}
