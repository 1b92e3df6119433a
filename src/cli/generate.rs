//! Generate command: scan inputs, build the registry, emit the source file.
//!
//! Pipeline phases:
//! - **Scan** - walk configured input directories into the flat file list
//! - **Build** - parallel read/digest/encode, serialized insertion
//! - **Emit** - render the asset tables and runtime into the output file

use anyhow::Result;

use crate::codec::codec_for;
use crate::config::Config;
use crate::emit;
use crate::log;
use crate::logger::{ProgressCounter, plural_count};
use crate::registry::{AssetRegistry, BuildOptions, SourceFile};
use crate::scan::scan_inputs;

/// Execute generate command
pub fn run(config: &Config) -> Result<()> {
    let files = scan_inputs(config)?;
    log!("scan"; "found {}", plural_count(files.len(), "file"));

    let registry = build_registry(files, config)?;

    let dest = emit::write_generated(&registry, config)?;
    log!(
        "generate";
        "packaged {} into {}",
        plural_count(registry.len(), "asset"),
        dest.display()
    );
    Ok(())
}

/// Build the registry the way the generate command encodes it.
///
/// Debug builds skip compression entirely: the generated code reads source
/// files at runtime, so encoded payloads would never be used.
pub fn build_registry(files: Vec<SourceFile>, config: &Config) -> Result<AssetRegistry> {
    let options = BuildOptions {
        codec: codec_for(config.encode.compress && !config.encode.debug),
        keep_mode: config.encode.mode,
        keep_mtime: config.encode.mtime,
        duplicates: config.input.duplicates.into(),
    };

    let progress = ProgressCounter::new("generate", files.len());
    let registry = AssetRegistry::from_files_with(files, options, Some(&progress));
    progress.finish();
    Ok(registry?)
}
