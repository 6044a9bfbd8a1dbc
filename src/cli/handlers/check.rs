//! Check command handler
//!
//! Validates that a notification could be sent with the merged configuration.

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::external::ReqwestTransport;
use crate::services::notifications::ChatWorkNotifier;
use crate::services::template::Placeholder;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    /// Create a new check command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate configuration and print a summary
    ///
    /// # Errors
    /// - Missing API token, room id or template
    /// - An HTTP client that cannot be built from `[http]`
    pub async fn execute(&self) -> AppResult<()> {
        for line in self.summary()? {
            println!("{}", line);
        }
        println!("Configuration is ready: notifications can be sent");
        Ok(())
    }

    /// Summary lines for a deliverable configuration
    ///
    /// The API token is never printed.
    pub fn summary(&self) -> AppResult<Vec<String>> {
        let notifier = &self.config.notifier;
        notifier.validate_delivery()?;

        let transport = ReqwestTransport::new(&self.config.http)?;
        let endpoint =
            ChatWorkNotifier::new(Arc::new(transport), &notifier.api_base_url)?.endpoint(&notifier.room_id)?;

        let used: Vec<&str> = Placeholder::ALL
            .iter()
            .map(Placeholder::token)
            .filter(|token| notifier.message_template.contains(token))
            .collect();

        let host = if self.config.ci.base_url.is_empty() {
            "(not set, ${url} renders the build path only)".to_string()
        } else {
            self.config.ci.base_url.clone()
        };

        Ok(vec![
            "✓ Configuration is valid".to_string(),
            format!(
                "✓ Application: {} {}",
                self.config.application.name, self.config.application.version
            ),
            format!("✓ API token: {}", notifier.api_token),
            format!("✓ Room id: {}", notifier.room_id),
            format!("✓ Endpoint: {}", endpoint),
            format!(
                "✓ Template placeholders: {}",
                if used.is_empty() {
                    "none".to_string()
                } else {
                    used.join(", ")
                }
            ),
            format!("✓ CI base URL: {}", host),
            format!(
                "✓ HTTP timeouts: {}s request, {}s connect",
                self.config.http.timeout_seconds, self.config.http.connect_timeout_seconds
            ),
        ])
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
