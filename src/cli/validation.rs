//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

/// Longest timeout accepted on the command line, in seconds
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Validate that a file path is accessible (exists and is readable)
fn validate_readable_file(kind: &str, path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("{} file does not exist: '{}'", kind, path_str));
    }

    if !path.is_file() {
        return Err(format!("{} path is not a file: '{}'", kind, path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read {} file '{}': {}", kind.to_lowercase(), path_str, e)),
    }
}

/// Validate that a configuration file path is accessible
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    validate_readable_file("Configuration", path_str)
}

/// Validate that a build outcome file path is accessible
pub fn validate_outcome_file_path(path_str: &str) -> Result<PathBuf, String> {
    validate_readable_file("Outcome", path_str)
}

/// Validate an HTTP timeout in seconds (1-300)
pub fn validate_timeout(timeout_str: &str) -> Result<u64, String> {
    let timeout: u64 = timeout_str.parse().map_err(|_| {
        format!(
            "Timeout must be a whole number of seconds, got: '{}'",
            timeout_str
        )
    })?;

    if timeout == 0 {
        return Err("Timeout must be greater than 0 seconds".to_string());
    }

    if timeout > MAX_TIMEOUT_SECONDS {
        return Err(format!(
            "Timeout cannot exceed {} seconds",
            MAX_TIMEOUT_SECONDS
        ));
    }

    Ok(timeout)
}

/// Validate a ChatWork room id
///
/// Room ids are numeric in practice; only what would break the endpoint
/// path is rejected here.
pub fn validate_room_id(room_str: &str) -> Result<String, String> {
    let room = room_str.trim();

    if room.is_empty() {
        return Err("Room id cannot be empty".to_string());
    }

    if room.contains('/') || room.chars().any(char::is_whitespace) {
        return Err(format!(
            "Room id cannot contain '/' or whitespace, got: '{}'",
            room_str
        ));
    }

    Ok(room.to_string())
}
