//! Restore embedded assets back to the filesystem.
//!
//! Restores are per-file atomic: one failed write never corrupts files
//! already written, and every failure is collected and reported together
//! instead of aborting the run.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use rayon::prelude::*;

use super::AssetRegistry;
use super::error::{RegistryError, RestoreFailures};
use super::record::AssetRecord;

/// What a restore run wrote.
#[derive(Debug)]
pub struct RestoredSet {
    /// Every file written, sorted.
    pub files: Vec<PathBuf>,
}

impl RestoredSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Restore assets under `target`, preserving relative structure.
///
/// `names: None` restores every record. Each requested name must resolve:
/// a leaf restores one file, a directory name its whole subtree, and an
/// unknown name fails with `NotFound` before anything is written.
///
/// Writes run in parallel per record; shared ancestor directories are safe
/// because "already exists" counts as success for directory creation.
/// Restoring the same name twice overwrites deterministically.
pub fn restore(
    registry: &AssetRegistry,
    target: &Path,
    names: Option<&[String]>,
) -> Result<RestoredSet, RegistryError> {
    let records: Vec<&AssetRecord> = match names {
        None => registry.records().collect(),
        Some(names) => {
            let mut selected = Vec::new();
            for name in names {
                selected.extend(registry.select(name)?);
            }
            selected.sort_by(|a, b| a.key.cmp(&b.key));
            selected.dedup_by(|a, b| a.key == b.key);
            selected
        }
    };

    let results: Vec<Result<PathBuf, (PathBuf, io::Error)>> = records
        .par_iter()
        .map(|record| {
            let dest = target.join(&record.key);
            match write_record(registry, record, &dest) {
                Ok(()) => Ok(dest),
                Err(e) => Err((dest, e)),
            }
        })
        .collect();

    let mut written = Vec::new();
    let mut failures = RestoreFailures::new();
    for result in results {
        match result {
            Ok(path) => written.push(path),
            Err((path, source)) => failures.push(path, source),
        }
    }
    failures.into_result()?;

    written.sort();
    Ok(RestoredSet { files: written })
}

/// Decode and write a single record, re-applying preserved metadata.
fn write_record(registry: &AssetRegistry, record: &AssetRecord, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let raw = registry.decode_payload(record)?;
    fs::write(dest, &raw)?;

    if let Some(mode) = record.mode {
        set_mode(dest, mode)?;
    }

    if let Some(mtime) = record.mtime {
        let time = if mtime >= 0 {
            UNIX_EPOCH + Duration::from_secs(mtime as u64)
        } else {
            UNIX_EPOCH - Duration::from_secs(mtime.unsigned_abs())
        };
        let file = File::options().write(true).open(dest)?;
        file.set_modified(time)?;
    }

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::codec_for;
    use crate::registry::record::RecordMeta;
    use tempfile::TempDir;

    fn sample_registry() -> AssetRegistry {
        let mut registry = AssetRegistry::new(codec_for(true));
        let entries: &[(&str, &[u8])] = &[
            ("in/a/test.asset", b"// sample file\n"),
            ("in/b/test.asset", b"// sample file\n"),
            ("in/c/test.asset", b"// sample file\n"),
            ("in/file name", b"// Content of \"testdata/in/file name\"\n"),
        ];
        for (key, content) in entries {
            registry
                .insert(
                    key.to_string(),
                    PathBuf::from(format!("testdata/{key}")),
                    content.to_vec(),
                    RecordMeta::none(),
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_restore_all_roundtrip() {
        let registry = sample_registry();
        let target = TempDir::new().unwrap();

        let restored = restore(&registry, target.path(), None).unwrap();
        assert_eq!(restored.len(), 4);

        for record in registry.records() {
            let on_disk = fs::read(target.path().join(&record.key)).unwrap();
            assert_eq!(on_disk, registry.contents(&record.key).unwrap());
        }
    }

    #[test]
    fn test_restore_subtree_by_directory_name() {
        let registry = sample_registry();
        let target = TempDir::new().unwrap();

        let restored =
            restore(&registry, target.path(), Some(&["in/a".to_string()])).unwrap();
        assert_eq!(restored.len(), 1);
        assert!(target.path().join("in/a/test.asset").exists());
        assert!(!target.path().join("in/b/test.asset").exists());
    }

    #[test]
    fn test_restore_unknown_name_fails_before_writing() {
        let registry = sample_registry();
        let target = TempDir::new().unwrap();

        let err = restore(
            &registry,
            target.path(),
            Some(&["in/missing".to_string()]),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "open in/missing: file does not exist");
        assert_eq!(fs::read_dir(target.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_restore_is_idempotent() {
        let registry = sample_registry();
        let target = TempDir::new().unwrap();

        restore(&registry, target.path(), None).unwrap();
        let second = restore(&registry, target.path(), None).unwrap();
        assert_eq!(second.len(), 4);

        let on_disk = fs::read(target.path().join("in/a/test.asset")).unwrap();
        assert_eq!(on_disk, b"// sample file\n");
    }

    #[test]
    fn test_restore_collects_every_failure() {
        let registry = sample_registry();
        let target = TempDir::new().unwrap();

        // A file where the "in" directory must go: every write under "in/"
        // fails, and each failing path is reported.
        fs::write(target.path().join("in"), "roadblock").unwrap();

        let err = restore(&registry, target.path(), None).unwrap_err();
        match err {
            RegistryError::Restore(failures) => {
                assert_eq!(failures.len(), 4);
                let msg = failures.to_string();
                assert!(msg.contains("in/a/test.asset"));
                assert!(msg.contains("in/file name"));
            }
            other => panic!("expected Restore aggregate, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_restore_reapplies_mode_and_mtime() {
        use std::os::unix::fs::PermissionsExt;

        let src = TempDir::new().unwrap();
        let script = src.path().join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let mut registry = AssetRegistry::new(codec_for(false));
        let meta = RecordMeta::capture(&script, true, true).unwrap();
        registry
            .insert(
                "run.sh".to_string(),
                script.clone(),
                fs::read(&script).unwrap(),
                meta,
            )
            .unwrap();

        let target = TempDir::new().unwrap();
        restore(&registry, target.path(), None).unwrap();

        let restored = target.path().join("run.sh");
        let perms = fs::metadata(&restored).unwrap().permissions();
        assert_eq!(perms.mode() & 0o7777, 0o755);

        let record = registry.lookup("run.sh").unwrap();
        let restored_mtime = fs::metadata(&restored)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        assert_eq!(restored_mtime, record.mtime.unwrap());
    }
}
