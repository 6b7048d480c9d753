// ============================================================================
// domain/error.rs - CONFIGURATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is a configuration error: it is raised before any generator
/// step touches the target directory, so it is always safe to correct the
/// input and retry immediately.
///
/// The `Display` strings of the first three variants are part of the CLI
/// contract and are printed verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Application name
    // ========================================================================
    #[error("you must enter a name for your new application")]
    EmptyName,

    #[error("name {name} is not allowed, try a different application name")]
    ForbiddenName { name: String },

    #[error("name {name} is invalid: {reason}")]
    InvalidName { name: String, reason: String },

    // ========================================================================
    // Enumerated options
    // ========================================================================
    #[error("unknown dialect \"{value}\" expecting one of {}", known.join(", "))]
    UnknownDialect {
        value: String,
        known: Vec<&'static str>,
    },

    #[error("unknown vcs \"{value}\" expecting one of {}", known.join(", "))]
    UnknownVcs {
        value: String,
        known: Vec<&'static str>,
    },

    #[error("unknown docker option \"{value}\" expecting one of {}", known.join(", "))]
    UnknownDocker {
        value: String,
        known: Vec<&'static str>,
    },

    #[error("unknown ci provider \"{value}\" expecting one of {}", known.join(", "))]
    UnknownCiProvider {
        value: String,
        known: Vec<&'static str>,
    },

    #[error("no executable configured for tool '{tool}'")]
    EmptyTool { tool: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyName => vec![
                "Pass the application name as the first argument".into(),
                "Example: corral new hello_world".into(),
            ],
            Self::ForbiddenName { .. } => vec![
                "This name is reserved by the generator itself".into(),
                "Choose a different application name".into(),
            ],
            Self::InvalidName { .. } => vec![
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: hello_world, my-app, shop2".into(),
            ],
            Self::UnknownDialect { known, .. } => vec![
                format!("Supported dialects: {}", known.join(", ")),
                "Use --skip-pop to generate an application without a database".into(),
            ],
            Self::UnknownVcs { known, .. }
            | Self::UnknownDocker { known, .. }
            | Self::UnknownCiProvider { known, .. } => {
                vec![format!("Supported values: {}", known.join(", "))]
            }
            Self::EmptyTool { tool } => vec![
                format!("Set tools.{tool} in your config file"),
                format!("Or export CORRAL_TOOLS__{}", tool.to_ascii_uppercase()),
            ],
        }
    }
}
