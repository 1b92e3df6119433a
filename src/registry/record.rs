//! Asset records: one immutable entry per embedded file.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::codec::Codec;

use super::digest::{ContentDigest, digest};
use super::error::RegistryError;

// ============================================================================
// RecordMeta
// ============================================================================

/// Optional file metadata carried through for restore fidelity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMeta {
    /// Unix permission bits, when preserved.
    pub mode: Option<u32>,
    /// Modification time as seconds since the Unix epoch, when preserved.
    pub mtime: Option<i64>,
}

impl RecordMeta {
    /// No preserved metadata.
    pub fn none() -> Self {
        Self::default()
    }

    /// Capture metadata from disk according to the preservation flags.
    pub fn capture(path: &Path, keep_mode: bool, keep_mtime: bool) -> Result<Self, RegistryError> {
        if !keep_mode && !keep_mtime {
            return Ok(Self::none());
        }

        let metadata = std::fs::metadata(path).map_err(|e| RegistryError::io(path, e))?;

        let mode = if keep_mode {
            file_mode(&metadata)
        } else {
            None
        };

        let mtime = if keep_mtime {
            metadata.modified().ok().map(|time| {
                match time.duration_since(UNIX_EPOCH) {
                    Ok(d) => d.as_secs() as i64,
                    Err(e) => -(e.duration().as_secs() as i64),
                }
            })
        } else {
            None
        };

        Ok(Self { mode, mtime })
    }
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn file_mode(_metadata: &std::fs::Metadata) -> Option<u32> {
    None
}

// ============================================================================
// AssetRecord
// ============================================================================

/// One embedded file: canonical name, encoded payload, digest, metadata.
///
/// Records are constructed once at build time and never mutated afterwards.
#[derive(Debug)]
pub struct AssetRecord {
    /// Canonical asset name, unique within a registry.
    pub key: String,
    /// Original on-disk path (diagnostics, debug-mode emission).
    pub source: PathBuf,
    /// Size of the original content in bytes.
    pub raw_size: u64,
    /// Stored payload: codec output, or the raw bytes for a stored codec.
    pub payload: Vec<u8>,
    /// Whether `payload` went through a compressing codec.
    pub compressed: bool,
    /// blake3 digest of the original (uncompressed) content.
    pub digest: ContentDigest,
    /// Preserved permission bits, if any.
    pub mode: Option<u32>,
    /// Preserved mtime (Unix seconds), if any.
    pub mtime: Option<i64>,
}

impl AssetRecord {
    /// Build a record from raw content: digest, then encode through the codec.
    ///
    /// Pure apart from the codec call, so records can be prepared in parallel
    /// before serialized insertion into a registry.
    pub fn prepare(
        key: String,
        source: PathBuf,
        raw: Vec<u8>,
        meta: RecordMeta,
        codec: &dyn Codec,
    ) -> Result<Self, RegistryError> {
        let content_digest = digest(&raw);
        let raw_size = raw.len() as u64;
        let compressed = !codec.is_stored();
        let payload = if compressed {
            codec
                .encode(&raw)
                .map_err(|e| RegistryError::io(&source, e))?
        } else {
            raw
        };

        Ok(Self {
            key,
            source,
            raw_size,
            payload,
            compressed,
            digest: content_digest,
            mode: meta.mode,
            mtime: meta.mtime,
        })
    }

    /// Stored payload size; 0 means "stored uncompressed".
    pub fn compressed_size(&self) -> u64 {
        if self.compressed {
            self.payload.len() as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Gzip, Stored};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_compressed() {
        let raw = b"// sample file\n".repeat(50);
        let record = AssetRecord::prepare(
            "in/test.asset".to_string(),
            PathBuf::from("testdata/in/test.asset"),
            raw.clone(),
            RecordMeta::none(),
            &Gzip::new(),
        )
        .unwrap();

        assert_eq!(record.raw_size, raw.len() as u64);
        assert!(record.compressed);
        assert_eq!(record.compressed_size(), record.payload.len() as u64);
        assert_eq!(record.digest, digest(&raw));
    }

    #[test]
    fn test_prepare_stored_keeps_bytes_and_reports_zero() {
        let raw = b"plain".to_vec();
        let record = AssetRecord::prepare(
            "plain".to_string(),
            PathBuf::from("plain"),
            raw.clone(),
            RecordMeta::none(),
            &Stored,
        )
        .unwrap();

        assert!(!record.compressed);
        assert_eq!(record.payload, raw);
        assert_eq!(record.compressed_size(), 0);
    }

    #[test]
    fn test_capture_meta_disabled_reads_nothing() {
        // Path does not exist; must not be touched when both flags are off
        let meta = RecordMeta::capture(Path::new("/nonexistent/x"), false, false).unwrap();
        assert!(meta.mode.is_none());
        assert!(meta.mtime.is_none());
    }

    #[test]
    fn test_capture_meta_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file");
        fs::write(&path, "x").unwrap();

        let meta = RecordMeta::capture(&path, false, true).unwrap();
        assert!(meta.mode.is_none());
        let mtime = meta.mtime.unwrap();
        assert!(mtime > 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_meta_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let meta = RecordMeta::capture(&path, true, false).unwrap();
        assert_eq!(meta.mode, Some(0o755));
    }
}
