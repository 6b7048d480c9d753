//! Unified error handling for Corral Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, PathEscapeError};

/// Root error type for Corral Core operations.
///
/// Nothing in the core retries; every error reaches the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorralError {
    /// Invalid configuration, raised before any step runs.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A filesystem or external command failure during a run.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// A step tried to touch a path outside the application root.
    #[error(transparent)]
    PathEscape(#[from] PathEscapeError),

    /// A named step failed; the target is left partially populated.
    #[error("step '{step}' failed: {cause}")]
    StepFailed {
        step: String,
        cause: Box<CorralError>,
    },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CorralError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::PathEscape(_) => vec![
                "A generator step, or a symlink left by an external tool, pointed outside the application directory".into(),
                "Remove stray symlinks from the target, or rerun with -vv and report the log".into(),
            ],
            Self::StepFailed { cause, .. } => cause.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in Corral".into(),
                "Rerun with -vv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Application(e) => e.category(),
            Self::PathEscape(_) | Self::Internal { .. } => ErrorCategory::Internal,
            Self::StepFailed { cause, .. } => cause.category(),
        }
    }

    /// `true` for errors raised before any step executed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Name of the failing step, if this error came out of a pipeline run.
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::StepFailed { step, .. } => Some(step),
            _ => None,
        }
    }

    /// The error underneath any `StepFailed` wrapping.
    pub fn root_cause(&self) -> &CorralError {
        match self {
            Self::StepFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input; correct it and retry.
    Validation,
    /// A step failed while running.
    Execution,
    /// The user interrupted the run.
    Cancelled,
    /// A bug in corral itself.
    Internal,
}

/// Convenient result type alias.
pub type CorralResult<T> = Result<T, CorralError>;
