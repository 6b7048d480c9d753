//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the values `new` derives
//! from it ([`Toolchain`], command timeout, flag defaults).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `CORRAL_<SECTION>__<KEY>`, e.g. `CORRAL_TOOLS__DEP`
//! 3. Config file: `--config <FILE>`, else [`AppConfig::config_path`]
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use corral_core::domain::Toolchain;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "CORRAL";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `corral new` flags.
    pub defaults: Defaults,
    /// External executables and their limits.
    pub tools: ToolsConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub db_type: String,
    pub vcs: String,
    pub docker: String,
    pub ci_provider: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            db_type: "postgres".into(),
            vcs: "git".into(),
            docker: "multi".into(),
            ci_provider: "none".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub dep: String,
    pub git: String,
    pub bzr: String,
    /// Deadline for each external command.
    pub command_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        let tools = Toolchain::default();
        Self {
            dep: tools.dep,
            git: tools.git,
            bzr: tools.bzr,
            command_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to build default config")?;

        Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.corral.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "corral", "corral")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".corral.toml"))
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            dep: self.tools.dep.clone(),
            git: self.tools.git.clone(),
            bzr: self.tools.bzr.clone(),
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.tools.command_timeout_secs)
    }

    /// Value at a dotted key path such as `tools.dep`.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut value = serde_json::to_value(self).ok()?;
        for segment in key.split('.') {
            value = value.get_mut(segment)?.take();
        }
        match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialise config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dialect_is_postgres() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.db_type, "postgres");
        assert_eq!(cfg.command_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn missing_optional_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("nope.toml"), false).unwrap();
        assert_eq!(cfg.tools.git, "git");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\ndb_type = \"sqlite3\"\n\n[tools]\ncommand_timeout_secs = 30\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.db_type, "sqlite3");
        assert_eq!(cfg.defaults.vcs, "git");
        assert_eq!(cfg.tools.command_timeout_secs, 30);
    }

    #[test]
    fn get_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("tools.dep").as_deref(), Some("dep"));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert_eq!(cfg.get("tools.command_timeout_secs").as_deref(), Some("300"));
        assert_eq!(cfg.get("tools"), None);
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let parsed: AppConfig = toml::from_str(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, cfg);
    }
}
