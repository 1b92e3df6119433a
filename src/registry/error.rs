//! Registry error types.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// RegistryError
// ============================================================================

/// Errors produced while building or querying the asset registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Source path cannot be turned into a packaged name.
    #[error("invalid source path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Two distinct inputs canonicalize to the same packaged name.
    #[error(
        "duplicate asset name `{key}`: packaged from both `{}` and `{}`",
        .first.display(),
        .second.display()
    )]
    Duplicate {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A file and a directory would occupy the same packaged name.
    #[error(
        "asset name `{key}` collides with a directory of the same name (from `{}`)",
        .origin.display()
    )]
    DirConflict { key: String, origin: PathBuf },

    /// Lookup miss. The message echoes the requested name verbatim; the
    /// generated runtime reproduces this string exactly.
    #[error("open {0}: file does not exist")]
    NotFound(String),

    /// Underlying read/write/codec failure for one path.
    #[error("IO error on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more files failed during a bulk restore.
    #[error("{0}")]
    Restore(RestoreFailures),
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// RestoreFailures
// ============================================================================

/// A single failed write during a bulk restore.
#[derive(Debug)]
pub struct RestoreFailure {
    /// Target path that could not be written.
    pub path: PathBuf,
    /// The underlying IO error.
    pub source: std::io::Error,
}

/// Aggregate of every per-file failure from one restore run.
///
/// Restores never abort on the first failure; callers see the full list.
#[derive(Debug, Default)]
pub struct RestoreFailures(Vec<RestoreFailure>);

impl RestoreFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf, source: std::io::Error) {
        self.0.push(RestoreFailure { path, source });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn failures(&self) -> &[RestoreFailure] {
        &self.0
    }

    /// Convert to Result (returns Err if anything failed).
    pub fn into_result(self) -> Result<(), RegistryError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Restore(self))
        }
    }
}

impl FromIterator<RestoreFailure> for RestoreFailures {
    fn from_iter<I: IntoIterator<Item = RestoreFailure>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for RestoreFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "failed to restore {} asset{}:",
            self.0.len(),
            if self.0.len() == 1 { "" } else { "s" }
        )?;
        for (i, failure) in self.0.iter().enumerate() {
            write!(f, "  {}: {}", failure.path.display(), failure.source)?;
            if i + 1 < self.0.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for RestoreFailures {}
