//! CLI module for chatwork-notifier
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command execution and validation
//! - Command handlers for notify, render and check

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

// Re-export public types for convenience
pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, LogLevel, NotifierArgs, OutcomeArgs};

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::logger::{LoggerConfig, init_logger};

/// Load and merge configuration from CLI arguments
///
/// 1. Load base configuration from files and environment
/// 2. Merge CLI argument overrides
/// 3. Validate the final configuration
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> AppResult<Settings> {
    let merger = ConfigurationMerger::from_config_path(cli.config.as_deref())?;
    Ok(merger.merge_cli_args(cli)?)
}

/// Initialize logger from settings
///
/// # Errors
/// Returns error if the logger settings are invalid or a global subscriber
/// is already installed
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)
}

/// Initialize a console-only logger when settings could not be loaded
///
/// Honors `--log-level`, `--verbose` and `--quiet` so the failure that
/// prevented loading is still reported at the requested verbosity.
pub fn init_fallback_logger(cli: &Cli) -> anyhow::Result<()> {
    let mut config = LoggerConfig::default();

    if cli.verbose {
        config.level = "debug".to_string();
    } else if cli.quiet {
        config.level = "error".to_string();
    }
    if let Some(level) = cli.log_level {
        config.level = level.into();
    }

    init_logger(config)
}
