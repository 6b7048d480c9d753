//! Shared state threaded through one pipeline run.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::application::{
    ApplicationError,
    ports::{CommandOutput, CommandSpec, Overlay, RunMode},
};
use crate::domain::RelativePath;
use crate::error::CorralResult;

/// Default deadline for a single external command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Clonable cancellation flag.
///
/// Set from another thread (a Ctrl-C handler); observed between steps and
/// before every overlay operation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once the token has been tripped.
    pub fn check(&self) -> CorralResult<()> {
        if self.is_cancelled() {
            Err(ApplicationError::Cancelled.into())
        } else {
            Ok(())
        }
    }
}

/// What the current step has done so far.
#[derive(Debug, Default)]
pub(crate) struct StepRecord {
    pub(crate) artifacts: Vec<RelativePath>,
    pub(crate) commands: Vec<String>,
}

/// Run-scoped state handed to every [`Step`](super::Step).
///
/// Borrows the overlay for the duration of one run. The helpers record
/// every path and command per step so the runner can verify artifacts
/// afterwards.
pub struct RunContext<'a> {
    overlay: &'a dyn Overlay,
    env: BTreeMap<String, String>,
    cancel: CancellationToken,
    command_timeout: Duration,
    verbose: bool,
    artifacts: Vec<RelativePath>,
    current: StepRecord,
}

impl<'a> RunContext<'a> {
    pub fn new(overlay: &'a dyn Overlay) -> Self {
        Self {
            overlay,
            env: BTreeMap::new(),
            cancel: CancellationToken::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            verbose: false,
            artifacts: Vec::new(),
            current: StepRecord::default(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn root(&self) -> &Path {
        self.overlay.root()
    }

    pub fn mode(&self) -> RunMode {
        self.overlay.mode()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Add a variable visible to every later command in this run.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Every artifact recorded by completed steps, in order.
    pub fn artifacts(&self) -> &[RelativePath] {
        &self.artifacts
    }

    /// `true` once any completed step or the current one produced something
    /// beyond the root itself.
    pub fn has_content(&self) -> bool {
        self.artifacts
            .iter()
            .chain(&self.current.artifacts)
            .any(|p| !p.is_root())
    }

    pub fn create_root(&mut self) -> CorralResult<()> {
        self.cancel.check()?;
        self.overlay.create_root()?;
        self.current.artifacts.push(RelativePath::root());
        Ok(())
    }

    pub fn mkdir(&mut self, path: impl AsRef<Path>) -> CorralResult<RelativePath> {
        self.cancel.check()?;
        let rel = RelativePath::try_new(path)?;
        self.overlay.mkdir(rel.as_path())?;
        self.current.artifacts.push(rel.clone());
        Ok(rel)
    }

    pub fn write(&mut self, path: impl AsRef<Path>, content: &str) -> CorralResult<RelativePath> {
        self.cancel.check()?;
        let rel = RelativePath::try_new(path)?;
        debug!(path = %rel, bytes = content.len(), "write");
        self.overlay.write(rel.as_path(), content)?;
        self.current.artifacts.push(rel.clone());
        Ok(rel)
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> CorralResult<bool> {
        self.cancel.check()?;
        let rel = RelativePath::try_new(path)?;
        self.overlay.exists(rel.as_path())
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> CorralResult<Option<String>> {
        self.cancel.check()?;
        let rel = RelativePath::try_new(path)?;
        self.overlay.read_to_string(rel.as_path())
    }

    /// A command pre-filled with the run's timeout and environment.
    pub fn command(&self, program: impl Into<String>) -> CommandSpec {
        CommandSpec::new(program, self.command_timeout).envs(&self.env)
    }

    /// Run a command; its declared outputs become artifacts of the step.
    pub fn run(&mut self, command: CommandSpec) -> CorralResult<CommandOutput> {
        self.cancel.check()?;
        debug!(command = %command.display(), dir = %command.dir, "run");
        let output = self.overlay.run_command(&command)?;
        self.current.commands.push(command.display());
        self.current.artifacts.extend(command.produces);
        Ok(output)
    }

    pub(crate) fn begin_step(&mut self) {
        self.current = StepRecord::default();
    }

    /// Close the current step, folding its artifacts into the run total.
    pub(crate) fn finish_step(&mut self) -> StepRecord {
        let record = std::mem::take(&mut self.current);
        self.artifacts.extend(record.artifacts.iter().cloned());
        record
    }

    pub(crate) fn overlay(&self) -> &dyn Overlay {
        self.overlay
    }
}
