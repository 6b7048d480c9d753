//! Domain value objects: Dialect, VcsKind, DockerKind, CiProvider.
//!
//! # Design
//!
//! These are pure value types — `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers. Which generator step a value
//! turns on lives in `application::generators::assembler`.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add it to `ALL` (the order of `ALL` is the order used in error messages)
//! 3. Add the `as_str` arm and the `FromStr` arm here

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Dialect ──────────────────────────────────────────────────────────────────

/// A supported database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    MySql,
    Cockroach,
    Sqlite3,
}

impl Dialect {
    /// Every known dialect, in the order they are listed to users.
    pub const ALL: [Dialect; 4] = [Self::Postgres, Self::MySql, Self::Cockroach, Self::Sqlite3];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Cockroach => "cockroach",
            Self::Sqlite3 => "sqlite3",
        }
    }

    /// Canonical names of every known dialect.
    pub fn known() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }

    /// Parse a `--db-type` value, where `none` (or nothing) means "no database".
    pub fn parse_optional(value: &str) -> Result<Option<Self>, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }

    /// Default TCP port of the database server; `None` for file databases.
    pub const fn default_port(&self) -> Option<u16> {
        match self {
            Self::Postgres => Some(5432),
            Self::MySql => Some(3306),
            Self::Cockroach => Some(26257),
            Self::Sqlite3 => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "cockroach" | "cockroachdb" | "crdb" => Ok(Self::Cockroach),
            "sqlite3" | "sqlite" => Ok(Self::Sqlite3),
            _ => Err(DomainError::UnknownDialect {
                value: s.to_string(),
                known: Self::known(),
            }),
        }
    }
}

// ── VcsKind ──────────────────────────────────────────────────────────────────

/// Version control system to initialise in the new application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Git,
    Bzr,
    None,
}

impl VcsKind {
    pub const ALL: [VcsKind; 3] = [Self::Git, Self::Bzr, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Bzr => "bzr",
            Self::None => "none",
        }
    }

    /// Name of the ignore file this VCS reads.
    pub const fn ignore_file(&self) -> Option<&'static str> {
        match self {
            Self::Git => Some(".gitignore"),
            Self::Bzr => Some(".bzrignore"),
            Self::None => None,
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VcsKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "bzr" => Ok(Self::Bzr),
            "none" | "" => Ok(Self::None),
            _ => Err(DomainError::UnknownVcs {
                value: s.to_string(),
                known: Self::ALL.iter().map(Self::as_str).collect(),
            }),
        }
    }
}

// ── DockerKind ───────────────────────────────────────────────────────────────

/// Flavour of Dockerfile to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockerKind {
    /// Multi-stage build that compiles inside the image.
    #[default]
    Multi,
    /// Single stage, expects a prebuilt binary.
    Standard,
    None,
}

impl DockerKind {
    pub const ALL: [DockerKind; 3] = [Self::Multi, Self::Standard, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Multi => "multi",
            Self::Standard => "standard",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DockerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DockerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "multi" => Ok(Self::Multi),
            "standard" => Ok(Self::Standard),
            "none" | "" => Ok(Self::None),
            _ => Err(DomainError::UnknownDocker {
                value: s.to_string(),
                known: Self::ALL.iter().map(Self::as_str).collect(),
            }),
        }
    }
}

// ── CiProvider ───────────────────────────────────────────────────────────────

/// Hosted CI service to generate a pipeline definition for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CiProvider {
    #[default]
    None,
    Travis,
    GitlabCi,
}

impl CiProvider {
    pub const ALL: [CiProvider; 3] = [Self::None, Self::Travis, Self::GitlabCi];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Travis => "travis",
            Self::GitlabCi => "gitlab-ci",
        }
    }
}

impl fmt::Display for CiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CiProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "travis" | "travis-ci" => Ok(Self::Travis),
            "gitlab-ci" | "gitlab" => Ok(Self::GitlabCi),
            _ => Err(DomainError::UnknownCiProvider {
                value: s.to_string(),
                known: Self::ALL.iter().map(Self::as_str).collect(),
            }),
        }
    }
}
