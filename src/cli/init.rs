//! Init command: write a starter bindery.toml.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::log;

/// Starter configuration written by `bindery init`.
const CONFIG_TEMPLATE: &str = r#"# bindery configuration
# https://github.com/bindery-rs/bindery

[input]
# Directories to package, relative to this file
dirs = ["assets"]
# Path prefix stripped from packaged names
prefix = ""
# Regex patterns for paths to skip
ignore = []
# What to do when two inputs package under the same name: "fail" or "warn"
duplicates = "fail"

[output]
# Generated source file
file = "src/assets.rs"
# Module name recorded in the generated header
module = "assets"

[encode]
# Gzip payloads
compress = true
# Record permission bits / modification times for restores
mode = false
mtime = false
"#;

/// Create a bindery.toml in the target directory.
///
/// Refuses to overwrite an existing config.
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };
    fs::create_dir_all(&target)?;

    let config_path = target.join("bindery.toml");
    if config_path.exists() {
        log!("error"; "`{}` already exists", config_path.display());
        std::process::exit(1);
    }

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    log!("init"; "wrote {}", config_path.display());
    Ok(())
}
