//! Render command handler
//!
//! Prints the message `notify` would send, without touching the network.

use crate::cli::parser::OutcomeArgs;
use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::services::template;

/// Handler for the render command
pub struct RenderCommandHandler {
    config: Settings,
}

impl RenderCommandHandler {
    /// Create a new render command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Render the message and print it to stdout
    pub async fn execute(&self, args: &OutcomeArgs) -> AppResult<()> {
        let message = self.render(args)?;
        println!("{}", message);
        Ok(())
    }

    /// Render the configured template for the described build
    pub fn render(&self, args: &OutcomeArgs) -> AppResult<String> {
        let outcome = args.to_outcome()?;
        Ok(template::render(
            &self.config.notifier.message_template,
            &outcome,
            &self.config.ci.base_url,
        ))
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
