//! List command: print the packaged asset tree, or one directory of it.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::cli::{ListArgs, ListFormat};
use crate::codec::codec_for;
use crate::config::Config;
use crate::registry::{AssetRegistry, BuildOptions};
use crate::scan::scan_inputs;

/// One asset in `--format json` output.
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    size: u64,
    digest: String,
}

/// Execute list command
pub fn run(args: &ListArgs, config: &Config) -> Result<()> {
    let files = scan_inputs(config)?;

    // Listing never needs encoded payloads; store them verbatim.
    let registry = AssetRegistry::from_files(
        files,
        BuildOptions {
            codec: codec_for(false),
            keep_mode: false,
            keep_mtime: false,
            duplicates: config.input.duplicates.into(),
        },
    )?;

    let start = args.prefix.as_deref().unwrap_or("");
    match args.format {
        ListFormat::Json => print_json(&registry, start)?,
        ListFormat::Tree => print_tree(&registry, start)?,
    }
    Ok(())
}

/// Every asset under `start` as a JSON array, in key order.
fn print_json(registry: &AssetRegistry, start: &str) -> Result<()> {
    let entries: Vec<ListEntry> = registry
        .select(start)?
        .into_iter()
        .map(|record| ListEntry {
            name: &record.key,
            size: record.raw_size,
            digest: record.digest.to_hex(),
        })
        .collect();

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &entries)?;
    writeln!(stdout)?;
    Ok(())
}

/// Indented tree of `start` and everything below it.
fn print_tree(registry: &AssetRegistry, start: &str) -> Result<()> {
    // Validate up front: a leaf or unknown name is not listable
    registry.children(start)?;

    let mut stdout = std::io::stdout().lock();
    if !start.is_empty() {
        writeln!(stdout, "{start}/")?;
    }
    print_subtree(registry, start, usize::from(!start.is_empty()), &mut stdout)?;
    Ok(())
}

fn print_subtree(
    registry: &AssetRegistry,
    dir: &str,
    depth: usize,
    out: &mut impl Write,
) -> Result<()> {
    for child in registry.children(dir).unwrap_or_default() {
        let full = if dir.is_empty() {
            child.to_string()
        } else {
            format!("{dir}/{child}")
        };
        let indent = "  ".repeat(depth);
        match registry.lookup(&full) {
            Ok(record) => writeln!(out, "{indent}{child} ({} bytes)", record.raw_size)?,
            Err(_) => {
                writeln!(out, "{indent}{child}/")?;
                print_subtree(registry, &full, depth + 1, out)?;
            }
        }
    }
    Ok(())
}
