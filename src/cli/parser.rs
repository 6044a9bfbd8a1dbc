//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::{AppError, AppResult};
use crate::models::{BuildOutcome, BuildResult, ChangeEntry, Culprit};

/// Post CI build results to a ChatWork room
#[derive(Parser, Debug)]
#[command(name = "chatwork-notifier")]
#[command(about = "Post CI build results to a ChatWork room")]
#[command(long_about = "
chatwork-notifier renders a message template for a finished build and posts
it to a ChatWork room. Delivery is best-effort: `notify` logs failures and
always exits 0 so a chat outage never fails the build.

The API token is read from configuration only, never from the command line:
set CHATWORK_NOTIFIER__API_TOKEN or notifier.api_token in config/local.toml.

EXAMPLES:
    # Notify from inside a Jenkins job (JOB_NAME, BUILD_NUMBER, JENKINS_URL)
    chatwork-notifier notify --result FAILURE --build-path job/demo/42/

    # Describe the build in a JSON file
    chatwork-notifier notify --outcome build.json --room-id 12345

    # Preview the message without sending it
    chatwork-notifier render --project demo --number 42 --result SUCCESS

    # Verify configuration before wiring it into a job
    chatwork-notifier --config /etc/chatwork-notifier.toml check
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this TOML file instead of config/default.toml and
    /// config/local.toml. CHATWORK_* environment variables still override it.
    ///
    /// Example: --config /etc/chatwork-notifier.toml
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        value_parser = super::validation::validate_config_file_path
    )]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level. Cannot be used with --quiet.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only. Cannot be used with --verbose.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level override
    ///
    /// Takes precedence over the configuration file and --verbose/--quiet.
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the message for a build and post it to ChatWork
    ///
    /// Never fails the calling job: configuration problems and delivery
    /// errors are logged and the exit code is always 0.
    Notify {
        #[command(flatten)]
        outcome: OutcomeArgs,

        #[command(flatten)]
        notifier: NotifierArgs,
    },

    /// Print the message for a build without sending it
    Render {
        #[command(flatten)]
        outcome: OutcomeArgs,

        #[command(flatten)]
        notifier: NotifierArgs,
    },

    /// Validate configuration and exit
    ///
    /// Returns exit code 0 if a notification could be sent, non-zero otherwise.
    Check {
        #[command(flatten)]
        notifier: NotifierArgs,
    },
}

impl Commands {
    /// Whether failures of this command must not change the exit code
    pub fn is_best_effort(&self) -> bool {
        matches!(self, Commands::Notify { .. })
    }

    /// Notifier overrides given to this command
    pub fn notifier_args(&self) -> &NotifierArgs {
        match self {
            Commands::Notify { notifier, .. }
            | Commands::Render { notifier, .. }
            | Commands::Check { notifier } => notifier,
        }
    }
}

/// The finished build, from a JSON file, flags or CI environment variables
#[derive(Args, Debug, Clone, Default)]
pub struct OutcomeArgs {
    /// JSON file describing the build
    ///
    /// Fields: result, project_name, build_number, build_url, culprits
    /// ([{"full_name": ...}]) and change_entries ([{"author": ..., "message": ...}]).
    /// Flags below override values from the file.
    #[arg(
        long,
        value_name = "FILE",
        value_parser = super::validation::validate_outcome_file_path
    )]
    pub outcome: Option<PathBuf>,

    /// Project (job) name
    #[arg(long, env = "JOB_NAME", value_name = "NAME")]
    pub project: Option<String>,

    /// Build number
    #[arg(long, env = "BUILD_NUMBER", value_name = "N")]
    pub number: Option<u64>,

    /// Build result: SUCCESS, UNSTABLE, FAILURE, NOT_BUILT or ABORTED
    #[arg(long, env = "BUILD_RESULT", value_name = "RESULT")]
    pub result: Option<BuildResult>,

    /// Build page path relative to the CI root URL, e.g. job/demo/42/
    #[arg(long, value_name = "PATH")]
    pub build_path: Option<String>,

    /// Culprit full name (repeatable)
    #[arg(long = "culprit", value_name = "NAME")]
    pub culprits: Vec<String>,

    /// Change entry as AUTHOR:MESSAGE (repeatable)
    #[arg(long = "change", value_name = "AUTHOR:MESSAGE")]
    pub changes: Vec<ChangeEntry>,
}

impl OutcomeArgs {
    /// Assemble the build outcome, reading `--outcome` first if given
    pub fn to_outcome(&self) -> AppResult<BuildOutcome> {
        let mut outcome = match self.outcome {
            Some(ref path) => read_outcome_file(path)?,
            None => BuildOutcome::default(),
        };

        if let Some(ref project) = self.project {
            outcome.project_name = project.clone();
        }
        if let Some(number) = self.number {
            outcome.build_number = number;
        }
        if let Some(result) = self.result {
            outcome.result = result;
        }
        if let Some(ref build_path) = self.build_path {
            outcome.build_url = build_path.clone();
        }
        if !self.culprits.is_empty() {
            outcome.culprits = self.culprits.iter().map(Culprit::new).collect();
        }
        if !self.changes.is_empty() {
            outcome.change_entries = self.changes.clone();
        }

        Ok(outcome)
    }
}

fn read_outcome_file(path: &Path) -> AppResult<BuildOutcome> {
    let to_error = |source: anyhow::Error| AppError::Outcome {
        path: path.display().to_string(),
        source,
    };

    let json = std::fs::read_to_string(path).map_err(|e| to_error(e.into()))?;
    BuildOutcome::from_json(&json).map_err(|e| to_error(e.into()))
}

/// Per-invocation notifier overrides
#[derive(Args, Debug, Clone, Default)]
pub struct NotifierArgs {
    /// ChatWork room id to post to
    #[arg(long, value_name = "ID", value_parser = super::validation::validate_room_id)]
    pub room_id: Option<String>,

    /// Message template, e.g. '${project} #${number} ${result}'
    #[arg(long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Root URL of the CI host, prefixed to the build path for ${url}
    #[arg(long, env = "JENKINS_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds (1-300)
    #[arg(long, value_name = "SECONDS", value_parser = super::validation::validate_timeout)]
    pub timeout: Option<u64>,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Some(ref template) = self.command.notifier_args().template {
            if template.is_empty() {
                return Err("--template cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}
