//! Validated configuration for one `new` invocation.
//!
//! Built only through [`NewAppConfig::builder`]; every field is private so a
//! `NewAppConfig` in hand always satisfies its invariants.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::app_name::AppName,
    error::DomainError,
    value_objects::{CiProvider, Dialect, DockerKind, VcsKind},
};

/// Executables the external-command steps invoke.
///
/// Resolved on `PATH` unless an absolute path is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    pub dep: String,
    pub git: String,
    pub bzr: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            dep: "dep".into(),
            git: "git".into(),
            bzr: "bzr".into(),
        }
    }
}

impl Toolchain {
    /// Executable for the given VCS, if it has one.
    pub fn vcs(&self, kind: VcsKind) -> Option<&str> {
        match kind {
            VcsKind::Git => Some(&self.git),
            VcsKind::Bzr => Some(&self.bzr),
            VcsKind::None => None,
        }
    }
}

/// Immutable, validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppConfig {
    name: AppName,
    database: Option<Dialect>,
    api: bool,
    vcs: VcsKind,
    skip_database: bool,
    skip_assets: bool,
    with_dep: bool,
    verbose: bool,
    docker: DockerKind,
    ci: CiProvider,
    toolchain: Toolchain,
}

impl NewAppConfig {
    /// Start building a configuration for the given raw application name.
    pub fn builder(name: impl Into<String>) -> NewAppConfigBuilder {
        NewAppConfigBuilder::new(name)
    }

    pub fn name(&self) -> &AppName {
        &self.name
    }

    /// Dialect of the database step, or `None` when the application has no
    /// database (`--db-type=none` or `--skip-pop`).
    pub fn database(&self) -> Option<Dialect> {
        if self.skip_database {
            None
        } else {
            self.database
        }
    }

    pub fn api(&self) -> bool {
        self.api
    }

    pub fn vcs(&self) -> VcsKind {
        self.vcs
    }

    pub fn skip_database(&self) -> bool {
        self.skip_database
    }

    /// Asset pipeline is skipped explicitly or implied by API mode.
    pub fn skip_assets(&self) -> bool {
        self.skip_assets || self.api
    }

    pub fn with_dep(&self) -> bool {
        self.with_dep
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn docker(&self) -> DockerKind {
        self.docker
    }

    pub fn ci(&self) -> CiProvider {
        self.ci
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Re-check invariants. Idempotent; a built config always passes.
    pub fn validate(&self) -> Result<(), DomainError> {
        AppName::parse(self.name.as_str())?;
        let tools = [
            ("dep", &self.toolchain.dep),
            ("git", &self.toolchain.git),
            ("bzr", &self.toolchain.bzr),
        ];
        if let Some((tool, _)) = tools.iter().find(|(_, exe)| exe.trim().is_empty()) {
            return Err(DomainError::EmptyTool { tool: *tool });
        }
        Ok(())
    }
}

/// Builder collecting raw user input; [`build`](Self::build) validates it.
#[derive(Debug, Clone)]
pub struct NewAppConfigBuilder {
    name: String,
    db_type: String,
    vcs: String,
    docker: String,
    ci: String,
    api: bool,
    skip_database: bool,
    skip_assets: bool,
    with_dep: bool,
    verbose: bool,
    toolchain: Toolchain,
}

impl NewAppConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_type: Dialect::Postgres.as_str().into(),
            vcs: VcsKind::default().as_str().into(),
            docker: DockerKind::default().as_str().into(),
            ci: CiProvider::default().as_str().into(),
            api: false,
            skip_database: false,
            skip_assets: false,
            with_dep: false,
            verbose: false,
            toolchain: Toolchain::default(),
        }
    }

    pub fn db_type(mut self, value: impl Into<String>) -> Self {
        self.db_type = value.into();
        self
    }

    pub fn vcs(mut self, value: impl Into<String>) -> Self {
        self.vcs = value.into();
        self
    }

    pub fn docker(mut self, value: impl Into<String>) -> Self {
        self.docker = value.into();
        self
    }

    pub fn ci_provider(mut self, value: impl Into<String>) -> Self {
        self.ci = value.into();
        self
    }

    pub fn api(mut self, api: bool) -> Self {
        self.api = api;
        self
    }

    pub fn skip_database(mut self, skip: bool) -> Self {
        self.skip_database = skip;
        self
    }

    pub fn skip_assets(mut self, skip: bool) -> Self {
        self.skip_assets = skip;
        self
    }

    pub fn with_dep(mut self, with_dep: bool) -> Self {
        self.with_dep = with_dep;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Validate in a fixed order: name, dialect, VCS, docker, CI provider.
    pub fn build(self) -> Result<NewAppConfig, DomainError> {
        let name = AppName::parse(&self.name)?;
        let database = Dialect::parse_optional(&self.db_type)?;
        let vcs: VcsKind = self.vcs.trim().parse()?;
        let docker: DockerKind = self.docker.trim().parse()?;
        let ci: CiProvider = self.ci.trim().parse()?;

        let config = NewAppConfig {
            name,
            database,
            api: self.api,
            vcs,
            skip_database: self.skip_database,
            skip_assets: self.skip_assets,
            with_dep: self.with_dep,
            verbose: self.verbose,
            docker,
            ci,
            toolchain: self.toolchain,
        };
        config.validate()?;
        Ok(config)
    }
}
