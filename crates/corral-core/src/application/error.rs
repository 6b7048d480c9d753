//! Application layer errors.
//!
//! These errors represent failures while executing generator steps, not
//! configuration mistakes. Configuration errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while a pipeline runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// The target directory already holds files.
    #[error("Project already exists at {}", path.display())]
    TargetOccupied { path: PathBuf },

    /// The external program could not be started at all.
    #[error("failed to start `{program}`: {reason}")]
    CommandSpawn { program: String, reason: String },

    /// The external program ran and exited unsuccessfully.
    #[error("`{command}` {}{}", exit_description(*code), output_suffix(output))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// The external program exceeded its deadline and was killed.
    #[error("`{command}` timed out after {timeout:?}{}", output_suffix(output))]
    CommandTimedOut {
        command: String,
        timeout: Duration,
        output: String,
    },

    /// A step reported an artifact that is not present afterwards.
    #[error("expected artifact {} was not produced", path.display())]
    MissingArtifact { path: PathBuf },

    /// Version control was asked to commit an empty tree.
    #[error("refusing to initialise version control in an empty working tree")]
    EmptyWorkingTree,

    /// Overlay state lock was poisoned.
    #[error("Overlay state is unavailable")]
    OverlayLockError,

    /// The run was cancelled before it finished.
    #[error("Operation cancelled")]
    Cancelled,
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

fn output_suffix(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::TargetOccupied { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different application name".into(),
            ],
            Self::CommandSpawn { program, .. } => vec![
                format!("Ensure `{program}` is installed and on your PATH"),
                "Or point the matching tools.* config key at the executable".into(),
            ],
            Self::CommandFailed { .. } => vec![
                "Check the command output above for details".into(),
                "The target directory was left as-is for inspection".into(),
            ],
            Self::CommandTimedOut { .. } => vec![
                "Raise tools.command_timeout_secs in your config".into(),
                "Check network connectivity if the tool downloads dependencies".into(),
            ],
            Self::MissingArtifact { .. } => vec![
                "The tool exited successfully but did not produce the expected files".into(),
                "Check the installed tool version".into(),
            ],
            Self::EmptyWorkingTree => {
                vec!["No files were generated before version control ran".into()]
            }
            Self::OverlayLockError => vec!["Try again in a moment".into()],
            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "The target directory may be partially populated".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TargetOccupied { .. } => ErrorCategory::Validation,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::OverlayLockError => ErrorCategory::Internal,
            _ => ErrorCategory::Execution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_includes_status_and_output() {
        let err = ApplicationError::CommandFailed {
            command: "dep init".into(),
            code: Some(1),
            output: "no Go files\n".into(),
        };
        assert_eq!(err.to_string(), "`dep init` exited with status 1:\nno Go files");
    }

    #[test]
    fn command_failed_without_output_is_one_line() {
        let err = ApplicationError::CommandFailed {
            command: "git init".into(),
            code: None,
            output: "  ".into(),
        };
        assert_eq!(err.to_string(), "`git init` was terminated by a signal");
    }

    #[test]
    fn sub_second_timeout_is_not_rounded_away() {
        let err = ApplicationError::CommandTimedOut {
            command: "dep init".into(),
            timeout: Duration::from_millis(300),
            output: String::new(),
        };
        assert_eq!(err.to_string(), "`dep init` timed out after 300ms");
    }

    #[test]
    fn occupied_target_is_a_validation_error() {
        let err = ApplicationError::TargetOccupied {
            path: PathBuf::from("hello_world"),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }
}
