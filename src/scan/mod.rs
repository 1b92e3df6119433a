//! Input scanning: walk configured directories into the flat file list the
//! registry is built from.
//!
//! Scanning only reads the filesystem and returns data, sorted by packaged
//! name so every downstream stage is deterministic. Duplicate names across
//! merged input directories are NOT resolved here; the registry decides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::config::Config;
use crate::registry::{SourceFile, canonicalize};
use crate::{debug, log};

/// Scan every configured input directory.
///
/// Packaged names are derived from the path *as configured* (project-root
/// relative), so `dirs = ["testdata/in"]` with `prefix = "testdata"` packages
/// `in/...` regardless of where the project root sits on disk. Source paths
/// in the result are absolute, for reading and for debug-mode emission.
pub fn scan_inputs(config: &Config) -> Result<Vec<SourceFile>> {
    let ignore = compile_ignore(&config.input.ignore)?;

    let mut files = Vec::new();
    let mut seen_dirs = FxHashSet::default();
    for configured in &config.input.dirs {
        let resolved = config.resolve_path(configured);
        if !resolved.is_dir() {
            bail!("input directory `{}` does not exist", resolved.display());
        }
        if !seen_dirs.insert(resolved.clone()) {
            log!("warning"; "input directory `{}` listed more than once", resolved.display());
        }
        scan_dir(configured, &resolved, config, &ignore, &mut files)?;
    }

    files.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(files)
}

/// Collect files under one input directory.
fn scan_dir(
    configured: &Path,
    resolved: &Path,
    config: &Config,
    ignore: &[Regex],
    files: &mut Vec<SourceFile>,
) -> Result<()> {
    let mut paths: Vec<PathBuf> = if config.input.recursive {
        WalkDir::new(resolved)
            .skip_hidden(false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path())
            .collect()
    } else {
        std::fs::read_dir(resolved)
            .with_context(|| format!("failed to read `{}`", resolved.display()))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect()
    };
    paths.sort();

    for path in paths {
        let rel = path.strip_prefix(resolved).unwrap_or(&path);
        let display_path = configured.join(rel);
        let display = display_path.to_string_lossy().replace('\\', "/");

        if ignore.iter().any(|pattern| pattern.is_match(&display)) {
            debug!("scan"; "ignored {display}");
            continue;
        }

        let key = canonicalize(&display_path, &config.input.prefix)?;
        files.push(SourceFile {
            source: path,
            key,
        });
    }

    Ok(())
}

/// Compile the configured ignore patterns up front, so a bad regex fails
/// the build before any file is read.
fn compile_ignore(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).with_context(|| format!("invalid ignore pattern `{pattern}`"))
        })
        .collect()
}
