//! Built-in generator steps.

use tracing::debug;

use crate::application::{
    ApplicationError,
    engine::{RunContext, Step},
    generators::templates::RenderedFile,
};
use crate::domain::{DomainValidator, RelativePath, VcsKind};
use crate::error::CorralResult;

pub const VALIDATE_NAME: &str = "validate-name";
pub const CREATE_ROOT: &str = "create-root";
pub const CORE_FILES: &str = "core-files";
pub const WEB_VIEWS: &str = "web-views";
pub const ASSET_PIPELINE: &str = "asset-pipeline";
pub const DATABASE_CONFIG: &str = "database-config";
pub const DOCKER: &str = "docker";
pub const CI: &str = "ci";
pub const DEPENDENCY_VENDORING: &str = "dependency-vendoring";
pub const VCS_INIT: &str = "vcs-init";

/// Re-checks the application name at run time.
#[derive(Debug, Clone)]
pub struct ValidateName {
    name: String,
}

impl ValidateName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Step for ValidateName {
    fn name(&self) -> &'static str {
        VALIDATE_NAME
    }

    fn description(&self) -> String {
        format!("validate application name '{}'", self.name)
    }

    fn run(&self, _ctx: &mut RunContext<'_>) -> CorralResult<()> {
        DomainValidator::validate_name(&self.name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateRoot;

impl Step for CreateRoot {
    fn name(&self) -> &'static str {
        CREATE_ROOT
    }

    fn description(&self) -> String {
        "create the application directory".into()
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> CorralResult<()> {
        ctx.create_root()
    }
}

/// Writes a fixed set of pre-rendered files.
#[derive(Debug, Clone)]
pub struct FileSet {
    name: &'static str,
    summary: &'static str,
    files: Vec<RenderedFile>,
}

impl FileSet {
    pub(crate) fn new(name: &'static str, summary: &'static str, files: Vec<RenderedFile>) -> Self {
        Self {
            name,
            summary,
            files,
        }
    }
}

impl Step for FileSet {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> String {
        format!("{} ({} files)", self.summary, self.files.len())
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> CorralResult<()> {
        for (path, content) in &self.files {
            ctx.write(path, content)?;
        }
        Ok(())
    }
}

/// `dep init`, producing `Gopkg.toml`, `Gopkg.lock` and `vendor/`.
#[derive(Debug, Clone)]
pub struct DependencyVendoring {
    program: String,
}

impl DependencyVendoring {
    pub const OUTPUTS: [&'static str; 3] = ["Gopkg.toml", "Gopkg.lock", "vendor"];

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Step for DependencyVendoring {
    fn name(&self) -> &'static str {
        DEPENDENCY_VENDORING
    }

    fn description(&self) -> String {
        format!("vendor dependencies with `{} init`", self.program)
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> CorralResult<()> {
        ctx.set_env("GO111MODULE", "off");

        let mut cmd = ctx.command(&self.program).arg("init");
        if ctx.verbose() {
            cmd = cmd.arg("-v");
        }
        for output in Self::OUTPUTS {
            cmd = cmd.produces(RelativePath::try_new(output)?);
        }

        let output = ctx.run(cmd)?;
        debug!(bytes = output.combined.len(), "dependency tool finished");
        Ok(())
    }
}

/// Initialises version control and records an initial commit.
///
/// Must run after every file-writing step: an empty tree is refused.
#[derive(Debug, Clone)]
pub struct VcsInit {
    kind: VcsKind,
    program: String,
}

impl VcsInit {
    pub fn new(kind: VcsKind, program: impl Into<String>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    fn metadata_dir(&self) -> Option<&'static str> {
        match self.kind {
            VcsKind::Git => Some(".git"),
            VcsKind::Bzr => Some(".bzr"),
            VcsKind::None => None,
        }
    }
}

impl Step for VcsInit {
    fn name(&self) -> &'static str {
        VCS_INIT
    }

    fn description(&self) -> String {
        format!("initialise {} repository with an initial commit", self.kind)
    }

    fn run(&self, ctx: &mut RunContext<'_>) -> CorralResult<()> {
        if !ctx.has_content() {
            return Err(ApplicationError::EmptyWorkingTree.into());
        }

        if let Some((path, content)) = super::templates::ignore_file(self.kind) {
            ctx.write(path, &content)?;
        }

        let mut init = ctx.command(&self.program).arg("init");
        if let Some(dir) = self.metadata_dir() {
            init = init.produces(RelativePath::try_new(dir)?);
        }
        ctx.run(init)?;

        let add = ctx.command(&self.program).args(["add", "."]);
        ctx.run(add)?;

        let commit = ctx
            .command(&self.program)
            .args(["commit", "-q", "-m", "Initial Commit"]);
        ctx.run(commit)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeOverlay;
    use crate::error::CorralError;

    #[test]
    fn vcs_init_refuses_empty_tree() {
        let overlay = FakeOverlay::new();
        let mut ctx = RunContext::new(&overlay);
        let err = VcsInit::new(VcsKind::Git, "git").run(&mut ctx).unwrap_err();
        assert_eq!(err, CorralError::Application(ApplicationError::EmptyWorkingTree));
        assert!(overlay.commands().is_empty());
    }

    #[test]
    fn vcs_init_runs_init_add_commit() {
        let overlay = FakeOverlay::new();
        let mut ctx = RunContext::new(&overlay);
        ctx.write("main.go", "package main").unwrap();
        VcsInit::new(VcsKind::Git, "git").run(&mut ctx).unwrap();

        assert_eq!(
            overlay.commands(),
            vec!["git init", "git add .", "git commit -q -m Initial Commit"]
        );
        assert!(overlay.files().contains_key(std::path::Path::new(".gitignore")));
    }

    #[test]
    fn dependency_vendoring_adds_verbose_flag_and_env() {
        let overlay = FakeOverlay::new();
        let mut ctx = RunContext::new(&overlay).with_verbose(true);
        DependencyVendoring::new("dep").run(&mut ctx).unwrap();
        assert_eq!(overlay.commands(), vec!["dep init -v"]);
        assert_eq!(ctx.env().get("GO111MODULE").map(String::as_str), Some("off"));
    }

    #[test]
    fn validate_name_rejects_forbidden() {
        let overlay = FakeOverlay::new();
        let mut ctx = RunContext::new(&overlay);
        let err = ValidateName::new("corral").run(&mut ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "name corral is not allowed, try a different application name"
        );
    }
}
