use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// A path resolved outside the application root.
///
/// Always fatal: it means a generator step was written incorrectly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("path '{}' escapes the application root", path.display())]
pub struct PathEscapeError {
    pub path: PathBuf,
}

/// A filesystem path guaranteed to stay inside the application root.
///
/// Invariant: never absolute, never climbs above the root. The stored form is
/// lexically normalised (`.` removed, `a/../b` collapsed to `b`), and the root
/// itself is the empty path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// The application root.
    pub fn root() -> Self {
        Self(PathBuf::new())
    }

    /// Fallible constructor.
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self, PathEscapeError> {
        let path = path.as_ref();
        let escape = || PathEscapeError {
            path: path.to_path_buf(),
        };

        let mut normalised = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(segment) => normalised.push(segment),
                Component::ParentDir => {
                    if !normalised.pop() {
                        return Err(escape());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(escape()),
            }
        }

        Ok(Self(normalised))
    }

    /// Join a segment, maintaining the invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, PathEscapeError> {
        let segment = segment.as_ref();
        if segment.is_absolute() {
            return Err(PathEscapeError {
                path: segment.to_path_buf(),
            });
        }
        Self::try_new(self.0.join(segment))
    }

    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Every proper ancestor, outermost first, excluding the root.
    pub fn ancestors(&self) -> Vec<RelativePath> {
        let mut out: Vec<_> = self
            .0
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| Self(p.to_path_buf()))
            .collect();
        out.reverse();
        out
    }

    /// Resolve against an absolute root directory.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            write!(f, "{}", self.0.display())
        }
    }
}
