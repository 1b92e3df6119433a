//! Canonical asset naming.
//!
//! Converts OS-specific source paths into the normalized, OS-independent
//! names assets are packaged under: slash-separated, prefix-stripped, no `.`
//! or `..` components. Pure functions; the same input always yields the same
//! name on every platform, so generated code is portable.

use std::path::Path;

use super::error::RegistryError;

/// Convert a source path into its canonical asset name.
///
/// `prefix` is stripped from the front of the slash-normalized path when it
/// matches (whole segments only). Fails on:
/// - non-UTF-8 paths (the name is emitted as a Rust string literal)
/// - `..` components (the name must not escape the input root)
/// - control characters in any segment
/// - paths that normalize to nothing
pub fn canonicalize(path: &Path, prefix: &str) -> Result<String, RegistryError> {
    let raw = path.to_str().ok_or_else(|| invalid(path, "not valid UTF-8"))?;

    // One canonical separator regardless of platform
    let normalized = raw.replace('\\', "/");
    let stripped = strip_prefix(&normalized, &prefix.replace('\\', "/"));

    let mut segments = Vec::new();
    for segment in stripped.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(invalid(path, "escapes the input root")),
            _ => {
                if segment.chars().any(char::is_control) {
                    return Err(invalid(path, "contains control characters"));
                }
                segments.push(segment);
            }
        }
    }

    if segments.is_empty() {
        return Err(invalid(path, "normalizes to an empty asset name"));
    }

    Ok(segments.join("/"))
}

/// Strip `prefix` from the front of `path` at a segment boundary.
fn strip_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() => rest,
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

fn invalid(path: &Path, reason: &str) -> RegistryError {
    RegistryError::InvalidPath {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
