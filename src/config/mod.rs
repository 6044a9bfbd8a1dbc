//! Configuration management module for chatwork-notifier
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//!
//! # Configuration Priority (lowest to highest)
//! 1. Built-in defaults
//! 2. `default.toml` - Shared configuration (optional)
//! 3. `local.toml` - Machine-local overrides, typically holding the token
//! 4. `CHATWORK_*` environment variables
//!
//! A single file given by `--config` or `CHATWORK_CONFIG_FILE` replaces
//! steps 2 and 3.

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

// Re-export public types
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, CiSettings, ConsoleSettings, FileSettings, HttpSettings, LoggerSettings,
    NotifierSettings, Settings,
};
