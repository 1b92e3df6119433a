//! Generated-source emission.
//!
//! Serializes a built registry into one standalone `.rs` file: a header with
//! the packaged names, the asset and directory tables, and the runtime API
//! (`asset`, `asset_dir`, `asset_digest`, `asset_info`, `restore_asset`,
//! `restore_assets`). Rendering is template-based: static skeletons with
//! `__PLACEHOLDER__` substitution, dynamic tables written in between.
//!
//! Output is byte-deterministic for a given input set. In embed mode no
//! machine-specific bytes appear at all; in debug mode the absolute source
//! paths are the only ones.

mod escape;
mod template;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::debug;
use crate::registry::{AssetRegistry, digest};

use escape::{byte_string_literal, str_literal};
use template::{NoVars, Template, TemplateVars};

// ============================================================================
// Templates
// ============================================================================

const HEADER: Template<HeaderVars> = Template::new(include_str!("templates/header.tmpl"));
const RUNTIME_EMBED: Template<DecodeVars> =
    Template::new(include_str!("templates/runtime_embed.tmpl"));
const RUNTIME_DEBUG: Template<NoVars> =
    Template::new(include_str!("templates/runtime_debug.tmpl"));

/// Variables for the generated-file header.
struct HeaderVars {
    module: String,
    codec: &'static str,
    assets: String,
}

impl TemplateVars for HeaderVars {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__MODULE__", &self.module)
            .replace("__CODEC__", self.codec)
            .replace("__ASSETS__", &self.assets)
    }
}

/// Variables for the embed-mode runtime.
struct DecodeVars {
    decode_body: &'static str,
}

impl TemplateVars for DecodeVars {
    fn apply(&self, content: &str) -> String {
        content.replace("__DECODE_BODY__", self.decode_body)
    }
}

const DECODE_GZIP: &str = "    let mut decoder = flate2::read::GzDecoder::new(asset.payload);\n    \
     let mut out = Vec::with_capacity(asset.raw_size as usize);\n    \
     std::io::Read::read_to_end(&mut decoder, &mut out)?;\n    \
     Ok(out)";

const DECODE_STORED: &str = "    Ok(asset.payload.to_vec())";

// ============================================================================
// Emission
// ============================================================================

/// How the registry is rendered.
pub struct EmitOptions {
    /// Module name recorded in the header.
    pub module: String,
    /// Debug mode: read source files at runtime instead of embedding bytes.
    pub debug: bool,
}

impl EmitOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            module: config.output.module.clone(),
            debug: config.encode.debug,
        }
    }
}

/// Render the whole generated source file.
pub fn emit_source(registry: &AssetRegistry, options: &EmitOptions) -> String {
    let mut out = String::new();

    out.push_str(&HEADER.render(&HeaderVars {
        module: options.module.clone(),
        codec: if options.debug {
            "none (debug)"
        } else {
            registry.codec().name()
        },
        assets: render_asset_list(registry),
    }));
    out.push('\n');

    if options.debug {
        out.push_str(&RUNTIME_DEBUG.render(&NoVars));
    } else {
        out.push_str(&RUNTIME_EMBED.render(&DecodeVars {
            decode_body: if registry.codec().is_stored() {
                DECODE_STORED
            } else {
                DECODE_GZIP
            },
        }));
    }
    out.push('\n');

    if options.debug {
        out.push_str(&render_debug_table(registry));
    } else {
        out.push_str(&render_embed_table(registry));
    }
    out.push('\n');
    out.push_str(&render_dir_table(registry));

    out
}

/// Emit into the configured output file, creating parent directories.
pub fn write_generated(registry: &AssetRegistry, config: &Config) -> Result<PathBuf> {
    let source = emit_source(registry, &EmitOptions::from_config(config));
    let dest = config.resolve_path(&config.output.file);

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    std::fs::write(&dest, &source)
        .with_context(|| format!("failed to write `{}`", dest.display()))?;
    debug!(
        "emit";
        "{} ({} bytes, digest {})",
        dest.display(),
        source.len(),
        digest(source.as_bytes())
    );

    Ok(dest)
}

/// The `// assets:` comment block, one packaged name per line.
fn render_asset_list(registry: &AssetRegistry) -> String {
    if registry.is_empty() {
        return "//   (none)".to_string();
    }
    registry
        .records()
        .map(|record| format!("//   {}", record.key))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The `ASSETS` table for embed mode: payload bytes inline.
fn render_embed_table(registry: &AssetRegistry) -> String {
    let mut out = String::from("static ASSETS: &[Asset] = &[\n");
    for record in registry.records() {
        out.push_str(&format!(
            "    Asset {{\n        name: {},\n        payload: {},\n        \
             raw_size: {},\n        digest: {},\n        mode: 0o{:o},\n        \
             mtime: {},\n    }},\n",
            str_literal(&record.key),
            byte_string_literal(&record.payload),
            record.raw_size,
            str_literal(&record.digest.to_hex()),
            record.mode.unwrap_or(0),
            record.mtime.unwrap_or(0),
        ));
    }
    out.push_str("];\n");
    out
}

/// The `ASSETS` table for debug mode: absolute source paths, no bytes.
fn render_debug_table(registry: &AssetRegistry) -> String {
    let mut out = String::from("static ASSETS: &[Asset] = &[\n");
    for record in registry.records() {
        out.push_str(&format!(
            "    Asset {{\n        name: {},\n        path: {},\n        \
             digest: {},\n        mode: 0o{:o},\n        mtime: {},\n    }},\n",
            str_literal(&record.key),
            str_literal(&record.source.to_string_lossy()),
            str_literal(&record.digest.to_hex()),
            record.mode.unwrap_or(0),
            record.mtime.unwrap_or(0),
        ));
    }
    out.push_str("];\n");
    out
}

/// The `DIRS` table: every directory with its sorted immediate children.
fn render_dir_table(registry: &AssetRegistry) -> String {
    let mut out = String::from("static DIRS: &[(&str, &[&str])] = &[\n");
    for (dir, children) in registry.directories() {
        let rendered: Vec<String> = children.iter().map(|child| str_literal(child)).collect();
        out.push_str(&format!(
            "    ({}, &[{}]),\n",
            str_literal(dir),
            rendered.join(", "),
        ));
    }
    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::codec_for;
    use crate::registry::{BuildOptions, RecordMeta};
    use crate::scan::scan_inputs;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn sample_registry(compress: bool) -> AssetRegistry {
        let mut registry = AssetRegistry::new(codec_for(compress));
        for name in ["in/a/test.asset", "in/b/test.asset"] {
            registry
                .insert(
                    name.to_string(),
                    PathBuf::from(format!("testdata/{name}")),
                    b"// sample file\n".to_vec(),
                    RecordMeta::none(),
                )
                .unwrap();
        }
        registry
    }

    fn options(debug: bool) -> EmitOptions {
        EmitOptions {
            module: "assets".to_string(),
            debug,
        }
    }

    /// Stage the fixture tree under `root/testdata` and build a registry
    /// the way the generate command does.
    fn build_from_disk(root: &Path, debug: bool) -> (AssetRegistry, EmitOptions) {
        for sub in ["a", "b", "c"] {
            let dir = root.join("testdata/in").join(sub);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("test.asset"), "// sample file\n").unwrap();
        }
        fs::write(
            root.join("testdata/in/file name"),
            "// Content of \"testdata/in/file name\"\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.root = root.to_path_buf();
        config.input.dirs = vec![PathBuf::from("testdata/in")];
        config.input.prefix = "testdata".to_string();
        config.encode.debug = debug;

        let files = scan_inputs(&config).unwrap();
        let registry = AssetRegistry::from_files(files, BuildOptions::default()).unwrap();
        (registry, EmitOptions::from_config(&config))
    }

    #[test]
    fn test_emit_embed_contains_tables_and_runtime() {
        let registry = sample_registry(false);
        let source = emit_source(&registry, &options(false));

        assert!(source.starts_with("// Code generated by bindery. DO NOT EDIT."));
        assert!(source.contains("//   in/a/test.asset"));
        assert!(source.contains(r#"name: "in/a/test.asset""#));
        assert!(source.contains(r#"payload: b"// sample file\n""#));
        assert!(source.contains("pub fn asset(name: &str)"));
        assert!(source.contains("file does not exist"));
        assert!(source.contains(r#"("in", &["a", "b"]),"#));
        // Stored codec: no decompression in the generated runtime
        assert!(!source.contains("GzDecoder"));
    }

    #[test]
    fn test_emit_gzip_runtime_decodes() {
        let registry = sample_registry(true);
        let source = emit_source(&registry, &options(false));
        assert!(source.contains("// codec: gzip"));
        assert!(source.contains("flate2::read::GzDecoder"));
        // Payload is the gzip stream, not the raw content
        assert!(source.contains(r#"payload: b"\x1f\x8b"#));
    }

    #[test]
    fn test_emit_is_deterministic() {
        let first = emit_source(&sample_registry(true), &options(false));
        let second = emit_source(&sample_registry(true), &options(false));
        assert_eq!(first, second);
    }

    #[test]
    fn test_emit_debug_reads_from_source_paths() {
        let registry = sample_registry(false);
        let source = emit_source(&registry, &options(true));
        assert!(source.contains("// codec: none (debug)"));
        assert!(source.contains(r#"path: "testdata/in/a/test.asset""#));
        assert!(source.contains("fs::read(asset.path)"));
        assert!(!source.contains("payload:"));
    }

    #[test]
    fn test_embed_output_is_location_independent() {
        // Same tree staged at two different absolute roots: embed output is
        // byte-identical outright.
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let (registry_a, options_a) = build_from_disk(first.path(), false);
        let (registry_b, options_b) = build_from_disk(second.path(), false);

        assert_eq!(
            emit_source(&registry_a, &options_a),
            emit_source(&registry_b, &options_b)
        );
    }

    #[test]
    fn test_debug_output_matches_after_prefix_substitution() {
        // Debug output embeds absolute source paths; substituting each root
        // with a placeholder token must make the two generations identical.
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let (registry_a, options_a) = build_from_disk(first.path(), true);
        let (registry_b, options_b) = build_from_disk(second.path(), true);

        let source_a = emit_source(&registry_a, &options_a)
            .replace(&first.path().to_string_lossy().to_string(), "PATH_PREFIX_PLACEHOLDER");
        let source_b = emit_source(&registry_b, &options_b)
            .replace(&second.path().to_string_lossy().to_string(), "PATH_PREFIX_PLACEHOLDER");

        assert!(source_a.contains("PATH_PREFIX_PLACEHOLDER"));
        assert_eq!(source_a, source_b);
    }

    #[test]
    fn test_write_generated_creates_parents() {
        let dir = TempDir::new().unwrap();
        let (registry, _) = build_from_disk(dir.path(), false);

        let mut config = Config::default();
        config.root = dir.path().to_path_buf();
        config.output.file = PathBuf::from("src/generated/assets.rs");

        let dest = write_generated(&registry, &config).unwrap();
        assert_eq!(dest, dir.path().join("src/generated/assets.rs"));
        let written = fs::read_to_string(&dest).unwrap();
        assert!(written.contains("DO NOT EDIT"));
    }
}
