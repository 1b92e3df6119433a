//! Extract command: restore packaged assets to a directory.

use anyhow::Result;

use crate::cli::ExtractArgs;
use crate::codec::codec_for;
use crate::config::Config;
use crate::log;
use crate::logger::plural_count;
use crate::registry::{AssetRegistry, BuildOptions, restore};
use crate::scan::scan_inputs;

/// Execute extract command
pub fn run(args: &ExtractArgs, config: &Config) -> Result<()> {
    let files = scan_inputs(config)?;

    // Payloads are decoded straight back out; skip the encode round-trip.
    let registry = AssetRegistry::from_files(
        files,
        BuildOptions {
            codec: codec_for(false),
            keep_mode: config.encode.mode,
            keep_mtime: config.encode.mtime,
            duplicates: config.input.duplicates.into(),
        },
    )?;

    let names = (!args.name.is_empty()).then_some(args.name.as_slice());
    let restored = restore(&registry, &args.target, names)?;

    log!(
        "extract";
        "restored {} into {}",
        plural_count(restored.len(), "file"),
        args.target.display()
    );
    Ok(())
}
