//! Configuration loader for chatwork-notifier
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
pub const CONFIG_DIR_ENV: &str = "CHATWORK_CONFIG_DIR";

/// Environment variable for specific configuration file
pub const CONFIG_FILE_ENV: &str = "CHATWORK_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "CHATWORK";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Shared configuration (optional)
/// 2. `local.toml` - Machine-local overrides (optional)
/// 3. `CHATWORK_*` environment variables (highest priority)
///
/// When a single configuration file is set, it replaces both files and must exist.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`CHATWORK_CONFIG_DIR`)
    /// - Specific configuration file (`CHATWORK_CONFIG_FILE`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `CHATWORK_CONFIG_DIR` and `CHATWORK_CONFIG_FILE`
    /// are set, as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_env = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_env.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "CHATWORK_CONFIG_DIR and CHATWORK_CONFIG_FILE cannot both be set. \
                 Use CHATWORK_CONFIG_DIR for layered configuration or \
                 CHATWORK_CONFIG_FILE for a single configuration file.",
            ));
        }

        let config_dir = config_dir_env
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    /// Create a loader for a single configuration file
    ///
    /// Used for `--config`; environment variables still override its values.
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
        }
    }

    /// Get the configuration directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the single configuration file, if one is set
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the single configuration file does not exist
    /// - configuration parsing fails
    /// - structural validation fails
    ///
    /// A missing API token or room id is not an error here; see
    /// `NotifierSettings::validate_delivery`.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Build the config::Config instance from all sources
    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            self.build_layered_config(builder)?
        };

        // CHATWORK_NOTIFIER__ROOM_ID -> notifier.room_id
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    /// Build layered configuration from the configuration directory
    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    /// Add a file source to the config builder
    ///
    /// # Arguments
    ///
    /// * `builder` - The config builder to add the source to
    /// * `path` - Path to the configuration file
    /// * `required` - Whether the file is required to exist
    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        let name = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!(
                "Configuration path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }

    /// Add environment variable source to the config builder
    ///
    /// Environment variables with prefix `CHATWORK_` are mapped to configuration
    /// keys. Double underscores (`__`) separate nested keys.
    ///
    /// Examples:
    /// - `CHATWORK_NOTIFIER__API_TOKEN` -> `notifier.api_token`
    /// - `CHATWORK_HTTP__TIMEOUT_SECONDS` -> `http.timeout_seconds`
    ///
    /// Values stay strings until deserialization so tokens and room ids that
    /// happen to look numeric are kept verbatim.
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true),
        )
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Global mutex to ensure tests run sequentially to avoid env var conflicts
    pub(crate) static TEST_MUTEX: Mutex<()> = Mutex::new(());

    /// Variables that would leak into `load()` from the surrounding shell
    const OVERRIDE_VARS: &[&str] = &[
        "CHATWORK_NOTIFIER__API_TOKEN",
        "CHATWORK_NOTIFIER__ROOM_ID",
        "CHATWORK_NOTIFIER__MESSAGE_TEMPLATE",
        "CHATWORK_NOTIFIER__API_BASE_URL",
        "CHATWORK_HTTP__TIMEOUT_SECONDS",
        "CHATWORK_HTTP__CONNECT_TIMEOUT_SECONDS",
        "CHATWORK_CI__BASE_URL",
        "CHATWORK_LOGGER__LEVEL",
    ];

    /// Helper to create a temporary config directory with files
    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            let path = temp_dir.path().join(name);
            fs::write(&path, content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Helper to safely set environment variables for a test
    pub(crate) struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        pub(crate) fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        /// A guard with every `CHATWORK_*` variable the loader reads cleared
        pub(crate) fn clean() -> Self {
            let mut env = Self::new();
            env.remove(CONFIG_DIR_ENV);
            env.remove(CONFIG_FILE_ENV);
            for key in OVERRIDE_VARS {
                env.remove(key);
            }
            env
        }

        pub(crate) fn set(&mut self, key: &str, value: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        pub(crate) fn remove(&mut self, key: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // Restore in reverse so the first recorded value wins
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_CONFIG: &str = r#"
[application]
name = "test-notifier"
version = "1.0.0"

[notifier]
room_id = "11111"
message_template = "${project} ${result}"

[http]
timeout_seconds = 20

[logger]
level = "info"

[logger.console]
enabled = true
colored = false
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file().is_none());
    }

    #[test]
    fn test_config_loader_with_config_dir() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set(CONFIG_DIR_ENV, "/custom/config");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("/custom/config"));
    }

    #[test]
    fn test_config_loader_with_config_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_file(), Some(Path::new("/path/to/config.toml")));
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("CHATWORK_CONFIG_DIR"));
                assert!(msg.contains("CHATWORK_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_without_any_files_uses_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_default_toml_only() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.application.name, "test-notifier");
        assert_eq!(settings.notifier.room_id, "11111");
        assert_eq!(settings.notifier.message_template, "${project} ${result}");
        assert_eq!(settings.http.timeout_seconds, 20);
        // Unset values fall back to serde defaults
        assert_eq!(settings.http.connect_timeout_seconds, 5);
        assert!(settings.notifier.api_token.is_empty());
    }

    #[test]
    fn test_load_with_local_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let local_config = r#"
[notifier]
api_token = "local-token"
room_id = "22222"
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("local.toml", local_config),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.notifier.api_token.expose(), "local-token");
        assert_eq!(settings.notifier.room_id, "22222");
        assert_eq!(settings.notifier.message_template, "${project} ${result}");
    }

    #[test]
    fn test_load_with_env_var_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        env.set("CHATWORK_NOTIFIER__API_TOKEN", "0123456789");
        env.set("CHATWORK_NOTIFIER__ROOM_ID", "33333");
        env.set("CHATWORK_HTTP__TIMEOUT_SECONDS", "30");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.notifier.api_token.expose(), "0123456789");
        assert_eq!(settings.notifier.room_id, "33333");
        assert_eq!(settings.http.timeout_seconds, 30);
        assert_eq!(settings.application.name, "test-notifier");
    }

    #[test]
    fn test_load_single_file_mode() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let single_config = r#"
[notifier]
room_id = "44444"

[ci]
base_url = "https://ci.example.com/"
"#;

        let temp_dir = setup_config_dir(&[
            ("single.toml", single_config),
            ("default.toml", DEFAULT_CONFIG),
        ]);

        let loader = ConfigLoader::from_file(temp_dir.path().join("single.toml"));
        let settings = loader.load().expect("Should load settings");

        assert_eq!(settings.notifier.room_id, "44444");
        assert_eq!(settings.ci.base_url, "https://ci.example.com/");
        // default.toml is ignored in single-file mode
        assert_eq!(settings.http.timeout_seconds, 10);
    }

    #[test]
    fn test_load_missing_single_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::from_file("/nonexistent/chatwork.toml");
        match loader.load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("chatwork.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_invalid_structure() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[("bad.toml", "[http]\ntimeout_seconds = 0\n")]);
        let result = ConfigLoader::from_file(temp_dir.path().join("bad.toml")).load();

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[("broken.toml", "[notifier\nroom_id = ")]);
        let result = ConfigLoader::from_file(temp_dir.path().join("broken.toml")).load();

        assert!(result.is_err());
    }
}
