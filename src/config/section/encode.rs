//! `[encode]` section: how payloads are packaged.

use serde::Deserialize;

/// Payload encoding settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Gzip payloads (default: true). Off means stored verbatim.
    pub compress: bool,

    /// Record file permission bits for restore fidelity.
    pub mode: bool,

    /// Record file modification times for restore fidelity.
    pub mtime: bool,

    /// Debug mode: generated code reads assets from their source paths at
    /// runtime instead of embedding the bytes.
    pub debug: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            compress: true,
            mode: false,
            mtime: false,
            debug: false,
        }
    }
}
