//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use std::path::Path;

use super::parser::{Cli, NotifierArgs};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Configuration merger that handles CLI argument integration with file-based configuration
///
/// CLI arguments override configuration file and environment values.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Create a configuration merger by loading configuration from the specified path or default loader
    ///
    /// # Arguments
    /// * `config_path` - Optional path to configuration file. If None, uses default loader behavior
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_config_path(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// Precedence, highest first:
    /// 1. `--log-level`, then `--verbose`/`--quiet`
    /// 2. Command overrides (`--room-id`, `--template`, `--base-url`, `--timeout`)
    /// 3. Configuration file and environment values
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        self.apply_global_overrides(&mut config, cli);
        self.apply_command_overrides(&mut config, cli.command.notifier_args());

        config.validate()?;

        Ok(config)
    }

    /// Apply global CLI argument overrides
    fn apply_global_overrides(&self, config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        // --log-level takes precedence over --verbose/--quiet
        if let Some(level) = cli.log_level {
            config.logger.level = level.into();
        }
    }

    /// Apply command-specific CLI argument overrides
    fn apply_command_overrides(&self, config: &mut Settings, args: &NotifierArgs) {
        if let Some(ref room_id) = args.room_id {
            config.notifier.room_id = room_id.clone();
        }

        if let Some(ref template) = args.template {
            config.notifier.message_template = template.clone();
        }

        if let Some(ref base_url) = args.base_url {
            config.ci.base_url = base_url.clone();
        }

        if let Some(timeout) = args.timeout {
            config.http.timeout_seconds = timeout;
            // Connect timeout is bounded by the request timeout
            config.http.connect_timeout_seconds = config.http.connect_timeout_seconds.min(timeout);
        }
    }

    /// Get the current configuration (useful for inspection)
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use clap::Parser;

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli)
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_merge_verbose_flag() {
        let config = merge(&["chatwork-notifier", "--verbose", "check"]).unwrap();
        assert_eq!(config.logger.level, "debug");
    }

    #[test]
    fn test_merge_quiet_flag() {
        let config = merge(&["chatwork-notifier", "--quiet", "check"]).unwrap();
        assert_eq!(config.logger.level, "error");
    }

    #[test]
    fn test_log_level_overrides_verbose() {
        let config = merge(&["chatwork-notifier", "-v", "--log-level", "warn", "check"]).unwrap();
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_no_flags_keep_base_config() {
        let cli = Cli::try_parse_from(["chatwork-notifier", "check"]).unwrap();
        let mut base = Settings::default();
        base.notifier.room_id = "999".to_string();
        base.notifier.message_template = "${result}".to_string();

        let config = ConfigurationMerger::new(base).merge_cli_args(&cli).unwrap();
        assert_eq!(config.notifier.room_id, "999");
        assert_eq!(config.notifier.message_template, "${result}");
        assert_eq!(config.logger.level, "info");
    }

    #[test]
    fn test_merge_notifier_overrides() {
        let config = merge(&[
            "chatwork-notifier",
            "render",
            "--room-id",
            "12345",
            "--template",
            "${project}",
            "--base-url",
            "https://ci.example.com/",
        ])
        .unwrap();

        assert_eq!(config.notifier.room_id, "12345");
        assert_eq!(config.notifier.message_template, "${project}");
        assert_eq!(config.ci.base_url, "https://ci.example.com/");
    }

    #[test]
    fn test_timeout_override_bounds_connect_timeout() {
        let config = merge(&["chatwork-notifier", "notify", "--timeout", "3"]).unwrap();
        assert_eq!(config.http.timeout_seconds, 3);
        assert_eq!(config.http.connect_timeout_seconds, 3);

        let config = merge(&["chatwork-notifier", "notify", "--timeout", "60"]).unwrap();
        assert_eq!(config.http.timeout_seconds, 60);
        assert_eq!(config.http.connect_timeout_seconds, 5);
    }

    #[test]
    fn test_merged_config_is_validated() {
        let result = merge(&["chatwork-notifier", "render", "--base-url", "ci.example.com"]);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
