//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what generator steps need from the outside world.
//! The `corral-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::domain::RelativePath;
use crate::error::CorralResult;

/// Whether a pipeline run touches real storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Simulated: operations are recorded in memory, nothing is executed.
    Dry,
    /// Real: operations hit the filesystem and launch processes.
    Wet,
}

impl RunMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Wet => "wet",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external program invocation, described up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory, relative to the overlay root.
    pub dir: RelativePath,
    /// Extra environment on top of the inherited process environment.
    pub env: BTreeMap<String, String>,
    pub timeout: Duration,
    /// Root-relative paths the program is expected to create.
    pub produces: Vec<RelativePath>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: RelativePath::root(),
            env: BTreeMap::new(),
            timeout,
            produces: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn produces(mut self, path: RelativePath) -> Self {
        self.produces.push(path);
        self
    }

    /// Program and arguments as one shell-like string, for logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Interleaved stdout then stderr, lossily decoded.
    pub combined: String,
    pub code: Option<i32>,
}

/// Port for everything a generator step may do to the target directory.
///
/// Implemented by:
/// - `corral_adapters::RecordingOverlay` (dry run)
/// - `corral_adapters::LocalOverlay` (wet run)
///
/// ## Design Notes
///
/// - Every path is relative to [`root`](Self::root); implementations reject
///   paths that resolve outside it with `CorralError::PathEscape`. A wet
///   overlay checks this on the real filesystem too, so a symlink under the
///   root pointing elsewhere is refused for writes and command directories.
/// - Steps never ask which mode they run in. `mode()` exists for reporting.
/// - A dry overlay never reads the real filesystem: `exists` sees only what
///   earlier operations in the same run recorded.
pub trait Overlay: Send + Sync {
    /// Absolute directory the application is generated into.
    fn root(&self) -> &Path;

    fn mode(&self) -> RunMode;

    /// Create the root directory. Fails if it exists and is not empty.
    fn create_root(&self) -> CorralResult<()>;

    /// Create a directory and all missing parents.
    fn mkdir(&self, path: &Path) -> CorralResult<()>;

    /// Write a file, creating missing parent directories.
    fn write(&self, path: &Path, content: &str) -> CorralResult<()>;

    fn exists(&self, path: &Path) -> CorralResult<bool>;

    /// Contents of a file, or `None` if it does not exist.
    fn read_to_string(&self, path: &Path) -> CorralResult<Option<String>>;

    /// Run an external program. A non-zero exit is an error.
    fn run_command(&self, command: &CommandSpec) -> CorralResult<CommandOutput>;
}
