//! In-memory overlay for unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::{
    ApplicationError,
    ports::{CommandOutput, CommandSpec, Overlay, RunMode},
};
use crate::domain::RelativePath;
use crate::error::CorralResult;

/// `None` marks a directory.
type Entries = BTreeMap<PathBuf, Option<String>>;

/// Clones share state, so a test can keep a handle after boxing one.
#[derive(Clone)]
pub(crate) struct FakeOverlay {
    root: PathBuf,
    entries: Arc<Mutex<Entries>>,
    commands: Arc<Mutex<Vec<String>>>,
    mode: RunMode,
    honour_produces: bool,
    fail_program: Option<String>,
}

impl FakeOverlay {
    pub(crate) fn new() -> Self {
        Self {
            root: PathBuf::from("/virtual/app"),
            entries: Arc::new(Mutex::new(BTreeMap::new())),
            commands: Arc::new(Mutex::new(Vec::new())),
            mode: RunMode::Dry,
            honour_produces: false,
            fail_program: None,
        }
    }

    pub(crate) fn wet(mut self) -> Self {
        self.mode = RunMode::Wet;
        self
    }

    /// Commands create the paths they declare.
    pub(crate) fn honouring_produces(mut self) -> Self {
        self.honour_produces = true;
        self
    }

    pub(crate) fn failing(mut self, program: &str) -> Self {
        self.fail_program = Some(program.to_string());
        self
    }

    pub(crate) fn files(&self) -> BTreeMap<PathBuf, String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(p, c)| c.clone().map(|c| (p.clone(), c)))
            .collect()
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn key(path: &Path) -> CorralResult<PathBuf> {
        Ok(RelativePath::try_new(path)?.into_path_buf())
    }
}

impl Overlay for FakeOverlay {
    fn root(&self) -> &Path {
        &self.root
    }

    fn mode(&self) -> RunMode {
        self.mode
    }

    fn create_root(&self) -> CorralResult<()> {
        self.entries.lock().unwrap().insert(PathBuf::new(), None);
        Ok(())
    }

    fn mkdir(&self, path: &Path) -> CorralResult<()> {
        let key = Self::key(path)?;
        self.entries.lock().unwrap().insert(key, None);
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> CorralResult<()> {
        let key = Self::key(path)?;
        self.entries
            .lock()
            .unwrap()
            .insert(key, Some(content.to_string()));
        Ok(())
    }

    fn exists(&self, path: &Path) -> CorralResult<bool> {
        let key = Self::key(path)?;
        Ok(self.entries.lock().unwrap().contains_key(&key))
    }

    fn read_to_string(&self, path: &Path) -> CorralResult<Option<String>> {
        let key = Self::key(path)?;
        Ok(self.entries.lock().unwrap().get(&key).cloned().flatten())
    }

    fn run_command(&self, command: &CommandSpec) -> CorralResult<CommandOutput> {
        self.commands.lock().unwrap().push(command.display());
        if self.fail_program.as_deref() == Some(command.program.as_str()) {
            return Err(ApplicationError::CommandFailed {
                command: command.display(),
                code: Some(1),
                output: "boom".into(),
            }
            .into());
        }
        if self.honour_produces {
            let mut entries = self.entries.lock().unwrap();
            for path in &command.produces {
                entries.insert(path.as_path().to_path_buf(), None);
            }
        }
        Ok(CommandOutput::default())
    }
}
