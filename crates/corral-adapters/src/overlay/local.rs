//! Wet overlay: `std::fs` plus the timeout-bounded process launcher.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use corral_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandSpec, Overlay, RunMode},
    },
    domain::{PathEscapeError, RelativePath},
    error::{CorralError, CorralResult},
};
use tracing::{info, instrument};

use crate::process::{OUTPUT_LIMIT_BYTES, ProcessError, run_with_timeout};

/// Production overlay writing below one root directory.
#[derive(Debug, Clone)]
pub struct LocalOverlay {
    root: PathBuf,
    output_limit_bytes: usize,
}

impl LocalOverlay {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_limit_bytes: OUTPUT_LIMIT_BYTES,
        }
    }

    pub fn with_output_limit(mut self, bytes: usize) -> Self {
        self.output_limit_bytes = bytes;
        self
    }

    /// `true` when the root exists and holds at least one entry.
    pub fn root_is_occupied(&self) -> CorralResult<bool> {
        match fs::read_dir(&self.root) {
            Ok(mut entries) => Ok(entries.next().is_some()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            // a plain file in the way counts as occupied
            Err(_) if self.root.exists() => Ok(true),
            Err(e) => Err(map_io_error(&self.root, e, "read directory")),
        }
    }

    /// Delete the root and everything below it. Missing roots are fine.
    pub fn clear_root(&self) -> CorralResult<()> {
        let result = if self.root.is_dir() {
            fs::remove_dir_all(&self.root)
        } else {
            fs::remove_file(&self.root)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error(&self.root, e, "remove")),
        }
    }

    fn resolve(&self, path: &Path) -> CorralResult<PathBuf> {
        Ok(RelativePath::try_new(path)?.under(&self.root))
    }

    /// [`resolve`](Self::resolve) for anything that writes or runs below the
    /// root: the deepest existing ancestor is canonicalized and must stay
    /// inside the canonical root, so a symlink left by an external tool
    /// cannot redirect a later write.
    fn resolve_contained(&self, path: &Path) -> CorralResult<PathBuf> {
        let full = self.resolve(path)?;
        let root = match fs::canonicalize(&self.root) {
            Ok(root) => root,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(full),
            Err(e) => return Err(map_io_error(&self.root, e, "resolve")),
        };
        let escape = || {
            CorralError::PathEscape(PathEscapeError {
                path: path.to_path_buf(),
            })
        };

        for candidate in full.ancestors() {
            let Ok(meta) = fs::symlink_metadata(candidate) else {
                continue;
            };
            return match fs::canonicalize(candidate) {
                Ok(real) if real.starts_with(&root) => Ok(full),
                Ok(_) => Err(escape()),
                // a dangling link would create its target wherever it points
                Err(_) if meta.file_type().is_symlink() => Err(escape()),
                Err(e) => Err(map_io_error(candidate, e, "resolve")),
            };
        }
        Ok(full)
    }
}

impl Overlay for LocalOverlay {
    fn root(&self) -> &Path {
        &self.root
    }

    fn mode(&self) -> RunMode {
        RunMode::Wet
    }

    fn create_root(&self) -> CorralResult<()> {
        if self.root_is_occupied()? {
            return Err(ApplicationError::TargetOccupied {
                path: self.root.clone(),
            }
            .into());
        }
        fs::create_dir_all(&self.root).map_err(|e| map_io_error(&self.root, e, "create directory"))
    }

    fn mkdir(&self, path: &Path) -> CorralResult<()> {
        let full = self.resolve_contained(path)?;
        fs::create_dir_all(&full).map_err(|e| map_io_error(&full, e, "create directory"))
    }

    fn write(&self, path: &Path, content: &str) -> CorralResult<()> {
        let full = self.resolve_contained(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        fs::write(&full, content).map_err(|e| map_io_error(&full, e, "write file"))
    }

    fn exists(&self, path: &Path) -> CorralResult<bool> {
        let full = self.resolve(path)?;
        full.try_exists()
            .map_err(|e| map_io_error(&full, e, "stat"))
    }

    fn read_to_string(&self, path: &Path) -> CorralResult<Option<String>> {
        let full = self.resolve(path)?;
        match fs::read_to_string(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(&full, e, "read file")),
        }
    }

    #[instrument(skip_all, fields(command = %spec.display(), dir = %spec.dir))]
    fn run_command(&self, spec: &CommandSpec) -> CorralResult<CommandOutput> {
        let dir = self.resolve_contained(spec.dir.as_path())?;
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).current_dir(&dir).envs(&spec.env);

        info!("Running external command");
        let output = run_with_timeout(cmd, spec.timeout, self.output_limit_bytes)
            .map_err(|e| map_process_error(spec, e))?;
        let combined = output.combined();

        if output.timed_out {
            return Err(ApplicationError::CommandTimedOut {
                command: spec.display(),
                timeout: spec.timeout,
                output: combined,
            }
            .into());
        }
        if !output.status.success() {
            return Err(ApplicationError::CommandFailed {
                command: spec.display(),
                code: output.status.code(),
                output: combined,
            }
            .into());
        }

        Ok(CommandOutput {
            combined,
            code: output.status.code(),
        })
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CorralError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

fn map_process_error(spec: &CommandSpec, e: ProcessError) -> CorralError {
    match e {
        ProcessError::Spawn(source) => ApplicationError::CommandSpawn {
            program: spec.program.clone(),
            reason: source.to_string(),
        }
        .into(),
        other => CorralError::Internal {
            message: format!("`{}`: {other}", spec.display()),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn create_root_accepts_missing_or_empty_and_refuses_occupied() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = LocalOverlay::new(dir.path().join("coke"));

        overlay.create_root().unwrap();
        overlay.create_root().unwrap();

        overlay.write(Path::new("actions/app.go"), "package actions").unwrap();
        assert!(overlay.root_is_occupied().unwrap());
        assert!(matches!(
            overlay.create_root().unwrap_err(),
            CorralError::Application(ApplicationError::TargetOccupied { .. })
        ));

        overlay.clear_root().unwrap();
        assert!(!overlay.exists(Path::new("")).unwrap());
        overlay.clear_root().unwrap();
    }

    #[test]
    fn read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = LocalOverlay::new(dir.path());
        assert_eq!(overlay.read_to_string(Path::new("nope.txt")).unwrap(), None);
        overlay.write(Path::new("yes.txt"), "hi").unwrap();
        assert_eq!(
            overlay.read_to_string(Path::new("yes.txt")).unwrap().as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn escaping_paths_never_reach_the_disk() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = LocalOverlay::new(dir.path().join("coke"));
        let err = overlay.write(Path::new("../outside.txt"), "x").unwrap_err();
        assert!(matches!(err, CorralError::PathEscape(_)));
        assert!(!dir.path().join("outside.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_cannot_redirect_writes() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        let overlay = LocalOverlay::new(dir.path().join("coke"));
        overlay.create_root().unwrap();
        std::os::unix::fs::symlink(&outside, dir.path().join("coke/vendor")).unwrap();

        let err = overlay.write(Path::new("vendor/pkg/x.go"), "package x").unwrap_err();
        assert!(matches!(err, CorralError::PathEscape(_)));
        let err = overlay.mkdir(Path::new("vendor/pkg")).unwrap_err();
        assert!(matches!(err, CorralError::PathEscape(_)));
        assert_eq!(fs::read_dir(&outside).unwrap().count(), 0);

        std::os::unix::fs::symlink(outside.join("ghost.go"), dir.path().join("coke/ghost.go"))
            .unwrap();
        let err = overlay.write(Path::new("ghost.go"), "package x").unwrap_err();
        assert!(matches!(err, CorralError::PathEscape(_)));
        assert!(!outside.join("ghost.go").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_staying_inside_root_is_followed() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = LocalOverlay::new(dir.path().join("coke"));
        overlay.create_root().unwrap();
        overlay.mkdir(Path::new("real")).unwrap();
        std::os::unix::fs::symlink("real", dir.path().join("coke/alias")).unwrap();

        overlay.write(Path::new("alias/x.go"), "package x").unwrap();
        assert!(dir.path().join("coke/real/x.go").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn command_output_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = LocalOverlay::new(dir.path()).with_output_limit(16);
        let spec = CommandSpec::new("sh", Duration::from_secs(10))
            .arg("-c")
            .arg("printf '%0200d' 0");

        let output = overlay.run_command(&spec).unwrap();
        assert_eq!(output.code, Some(0));
        assert!(output.combined.contains("[output truncated"));
        assert!(output.combined.len() < 200);
    }
}
