//! Build outcome models.
//!
//! A `BuildOutcome` is the read-only snapshot a CI host hands to the notifier
//! once a build has finished.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Enums
// ============================================================================

/// Final status of a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    #[default]
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl BuildResult {
    /// Upper-case name used in rendered messages
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::Failure => "FAILURE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "SUCCESS" => Ok(BuildResult::Success),
            "UNSTABLE" => Ok(BuildResult::Unstable),
            "FAILURE" | "FAILED" => Ok(BuildResult::Failure),
            "NOT_BUILT" => Ok(BuildResult::NotBuilt),
            "ABORTED" => Ok(BuildResult::Aborted),
            _ => Err(format!(
                "Invalid build result '{}'. Valid values are: SUCCESS, UNSTABLE, FAILURE, NOT_BUILT, ABORTED",
                s
            )),
        }
    }
}

// ============================================================================
// Outcome snapshot
// ============================================================================

/// A contributor the host blames for changes in this build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culprit {
    pub full_name: String,
}

impl Culprit {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

/// One commit from the build's change set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub author: String,
    pub message: String,
}

impl ChangeEntry {
    pub fn new(author: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
        }
    }
}

impl FromStr for ChangeEntry {
    type Err = String;

    /// Parses `AUTHOR:MESSAGE`, splitting on the first colon
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((author, message)) if !author.trim().is_empty() => {
                Ok(ChangeEntry::new(author.trim(), message.trim_start()))
            }
            _ => Err(format!(
                "Change entries must look like 'AUTHOR:MESSAGE', got: '{}'",
                s
            )),
        }
    }
}

/// Snapshot of a finished build
///
/// Only the fields a message template can reference are carried. The
/// `build_url` is relative to the CI host's root URL (e.g. `job/demo/42/`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildOutcome {
    #[serde(default)]
    pub result: BuildResult,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub build_number: u64,
    #[serde(default)]
    pub build_url: String,
    #[serde(default)]
    pub culprits: Vec<Culprit>,
    #[serde(default)]
    pub change_entries: Vec<ChangeEntry>,
}

impl BuildOutcome {
    /// Parse an outcome from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
