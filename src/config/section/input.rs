//! `[input]` section: what gets packaged.

use serde::Deserialize;
use std::path::PathBuf;

use crate::registry::DuplicatePolicy;

/// Input scanning settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directories to package, relative to the project root.
    pub dirs: Vec<PathBuf>,

    /// Path prefix stripped from packaged names.
    pub prefix: String,

    /// Regex patterns for paths to skip (matched against the
    /// slash-normalized path).
    pub ignore: Vec<String>,

    /// Descend into subdirectories (default: true).
    pub recursive: bool,

    /// What to do when two inputs package under the same name.
    pub duplicates: DuplicateMode,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            prefix: String::new(),
            ignore: Vec::new(),
            recursive: true,
            duplicates: DuplicateMode::Fail,
        }
    }
}

/// Duplicate-name handling, as spelled in bindery.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateMode {
    /// Abort the build (default).
    #[default]
    Fail,
    /// Keep the first occurrence, log the rest.
    Warn,
}

impl From<DuplicateMode> for DuplicatePolicy {
    fn from(mode: DuplicateMode) -> Self {
        match mode {
            DuplicateMode::Fail => DuplicatePolicy::Fail,
            DuplicateMode::Warn => DuplicatePolicy::Warn,
        }
    }
}
