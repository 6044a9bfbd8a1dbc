//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{CheckCommandHandler, NotifyCommandHandler, RenderCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns errors from command handlers or validation failures. For
/// `notify` the caller logs them and exits successfully.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Commands::Notify { outcome, .. } => {
            NotifyCommandHandler::new(settings).execute(outcome).await
        }
        Commands::Render { outcome, .. } => {
            RenderCommandHandler::new(settings).execute(outcome).await
        }
        Commands::Check { .. } => CheckCommandHandler::new(settings).execute().await,
    }
}

/// Validate command arguments before execution
fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|msg| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason: msg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::{NotifierArgs, OutcomeArgs};
    use crate::models::ApiToken;
    use clap::Parser;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.notifier.api_token = ApiToken::new("token");
        config.notifier.room_id = "12345".to_string();
        config
    }

    #[tokio::test]
    async fn test_execute_render() {
        let cli = Cli::try_parse_from(["chatwork-notifier", "render", "--project", "demo"]).unwrap();

        let result = execute_command(&cli, create_valid_config()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_check() {
        let cli = Cli::try_parse_from(["chatwork-notifier", "check"]).unwrap();

        assert!(execute_command(&cli, create_valid_config()).await.is_ok());
        assert!(execute_command(&cli, Settings::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_validate_conflicting_args() {
        let cli = Cli {
            command: Commands::Render {
                outcome: OutcomeArgs::default(),
                notifier: NotifierArgs::default(),
            },
            config: None,
            verbose: true,
            quiet: true,
            log_level: None,
        };

        let result = execute_command(&cli, create_valid_config()).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
