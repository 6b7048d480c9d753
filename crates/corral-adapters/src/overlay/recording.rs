//! Dry overlay: records every operation in memory.
//!
//! Nothing here reads the real filesystem. `exists` answers only from what
//! earlier operations in the same run recorded, and commands are recorded
//! instead of executed; their declared outputs are marked as present.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use corral_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandSpec, Overlay, RunMode},
    },
    domain::RelativePath,
    error::CorralResult,
};

/// One recorded overlay operation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateRoot,
    Mkdir(PathBuf),
    Write { path: PathBuf, bytes: usize },
    Run { command: String, dir: PathBuf },
}

/// Recording overlay for dry runs and tests.
///
/// Clones share state.
#[derive(Debug, Clone)]
pub struct RecordingOverlay {
    root: PathBuf,
    inner: Arc<RwLock<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    root_created: bool,
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    operations: Vec<Operation>,
}

impl RecordingInner {
    fn add_dir_chain(&mut self, path: &RelativePath) {
        for ancestor in path.ancestors() {
            self.directories.insert(ancestor.into_path_buf());
        }
        if !path.is_root() {
            self.directories.insert(path.as_path().to_path_buf());
        }
    }
}

impl RecordingOverlay {
    /// `root` is only reported, never touched.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inner: Arc::new(RwLock::new(RecordingInner::default())),
        }
    }

    /// Every operation so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.read().map(|i| i.operations.clone()).unwrap_or_default()
    }

    /// Recorded command lines, in order.
    pub fn commands(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::Run { command, .. } => Some(command),
                _ => None,
            })
            .collect()
    }

    /// Recorded file contents, keyed by root-relative path.
    pub fn files(&self) -> BTreeMap<PathBuf, String> {
        self.read().map(|i| i.files.clone()).unwrap_or_default()
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read().ok()?.files.get(path.as_ref()).cloned()
    }

    fn read(&self) -> CorralResult<RwLockReadGuard<'_, RecordingInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::OverlayLockError.into())
    }

    fn write_lock(&self) -> CorralResult<RwLockWriteGuard<'_, RecordingInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::OverlayLockError.into())
    }
}

impl Overlay for RecordingOverlay {
    fn root(&self) -> &Path {
        &self.root
    }

    fn mode(&self) -> RunMode {
        RunMode::Dry
    }

    fn create_root(&self) -> CorralResult<()> {
        let mut inner = self.write_lock()?;
        if !inner.files.is_empty() || !inner.directories.is_empty() {
            return Err(ApplicationError::TargetOccupied {
                path: self.root.clone(),
            }
            .into());
        }
        inner.root_created = true;
        inner.operations.push(Operation::CreateRoot);
        Ok(())
    }

    fn mkdir(&self, path: &Path) -> CorralResult<()> {
        let rel = RelativePath::try_new(path)?;
        let mut inner = self.write_lock()?;
        if inner.files.contains_key(rel.as_path()) {
            return Err(ApplicationError::FilesystemError {
                path: rel.into_path_buf(),
                reason: "a file already exists at this path".into(),
            }
            .into());
        }
        inner.add_dir_chain(&rel);
        inner.operations.push(Operation::Mkdir(rel.into_path_buf()));
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> CorralResult<()> {
        let rel = RelativePath::try_new(path)?;
        if rel.is_root() {
            return Err(ApplicationError::FilesystemError {
                path: rel.into_path_buf(),
                reason: "cannot write to the application root".into(),
            }
            .into());
        }

        let mut inner = self.write_lock()?;
        if inner.directories.contains(rel.as_path()) {
            return Err(ApplicationError::FilesystemError {
                path: rel.into_path_buf(),
                reason: "a directory already exists at this path".into(),
            }
            .into());
        }
        for ancestor in rel.ancestors() {
            inner.directories.insert(ancestor.into_path_buf());
        }
        inner.operations.push(Operation::Write {
            path: rel.as_path().to_path_buf(),
            bytes: content.len(),
        });
        inner.files.insert(rel.into_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> CorralResult<bool> {
        let rel = RelativePath::try_new(path)?;
        let inner = self.read()?;
        if rel.is_root() {
            return Ok(inner.root_created);
        }
        Ok(inner.files.contains_key(rel.as_path()) || inner.directories.contains(rel.as_path()))
    }

    fn read_to_string(&self, path: &Path) -> CorralResult<Option<String>> {
        let rel = RelativePath::try_new(path)?;
        Ok(self.read()?.files.get(rel.as_path()).cloned())
    }

    fn run_command(&self, command: &CommandSpec) -> CorralResult<CommandOutput> {
        let mut inner = self.write_lock()?;
        inner.operations.push(Operation::Run {
            command: command.display(),
            dir: command.dir.as_path().to_path_buf(),
        });
        for produced in &command.produces {
            if !inner.files.contains_key(produced.as_path()) {
                inner.add_dir_chain(produced);
            }
        }
        Ok(CommandOutput {
            combined: String::new(),
            code: Some(0),
        })
    }
}
