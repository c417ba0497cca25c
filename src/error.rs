use std::io;
use thiserror::Error;

use crate::config::settings::ConfigError;
use crate::git::failure::{self, FailureKind};

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Command '{command}' failed with exit code {exit_code}:\n{output}")]
    CommandFailed {
        command: String,
        output: String,
        exit_code: i32,
    },

    #[error("Unexpected git output from '{command}':\n{output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("Failed to execute git: {0}")]
    Spawn(String),

    #[error("Git version {0} is too old. Minimum required: 1.8.5")]
    VersionTooOld(String),

    #[error("Invalid git command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl GitError {
    /// Classify a failed command by its output text.
    ///
    /// Returns `None` for errors that did not come from a git process exiting
    /// with a non-zero status.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            GitError::CommandFailed { output, .. } => Some(failure::classify(output)),
            _ => None,
        }
    }

    pub(crate) fn unexpected(command: impl ToString, lines: &[String]) -> Self {
        GitError::UnexpectedOutput {
            command: command.to_string(),
            output: lines.join("\n"),
        }
    }
}

/// Top-level application error used by the binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
