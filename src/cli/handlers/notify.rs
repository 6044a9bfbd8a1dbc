//! Notify command handler
//!
//! Renders the message for a build and posts it to ChatWork.

use crate::cli::parser::OutcomeArgs;
use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::services::BuildNotifier;

/// Handler for the notify command
pub struct NotifyCommandHandler {
    config: Settings,
}

impl NotifyCommandHandler {
    /// Create a new notify command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Send the notification
    ///
    /// Delivery failures are logged by the notifier and never returned.
    /// Errors from here mean nothing was sent: the build outcome could not
    /// be read or the HTTP client could not be built.
    pub async fn execute(&self, args: &OutcomeArgs) -> AppResult<()> {
        let outcome = args.to_outcome()?;
        let notifier = BuildNotifier::from_settings(&self.config)?;

        notifier.perform(&outcome).await;
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
