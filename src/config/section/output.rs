//! `[output]` section: where the generated source goes.

use serde::Deserialize;
use std::path::PathBuf;

/// Output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Generated source file, relative to the project root.
    pub file: PathBuf,

    /// Module name recorded in the generated header.
    pub module: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("src/assets.rs"),
            module: "assets".to_string(),
        }
    }
}
