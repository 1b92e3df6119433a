//! Project configuration management for `bindery.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                            |
//! |------------|----------------------------------------------------|
//! | `[input]`  | Directories to package, prefix, ignores, duplicates |
//! | `[output]` | Generated file path and module name                 |
//! | `[encode]` | Compression, metadata preservation, debug mode      |
//!
//! The config file is found by walking upward from the current directory;
//! its parent directory becomes the project root, and relative paths in the
//! config resolve against it. CLI flags override file settings.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{DuplicateMode, EncodeConfig, InputConfig, OutputConfig};

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};
use crate::log;

/// Root configuration structure representing bindery.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Input scanning settings
    #[serde(default)]
    pub input: InputConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Payload encoding settings
    #[serde(default)]
    pub encode: EncodeConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing file is fine
    /// when the command can run from flags alone (`generate DIR...`) or does
    /// not need one (`init`); defaults apply in that case.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) if !cli.is_init() => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
                config.config_path = path;
                config
            }
            _ => {
                let mut config = Self::default();
                config.root = cwd;
                config.config_path = config.root.join(&cli.config);
                config
            }
        };

        config.apply_cli(cli);
        config.validate(cli)?;
        Ok(config)
    }

    /// Parse a config file, warning about unknown keys.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let deserializer = toml::Deserializer::new(&text);
        let mut unknown = Vec::new();
        let config: Config = serde_ignored::deserialize(deserializer, |key| {
            unknown.push(key.to_string());
        })?;

        for key in unknown {
            log!("warning"; "unknown config key `{}` in {}", key, path.display());
        }

        Ok(config)
    }

    /// Apply command-specific CLI overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Commands::Generate { args } = &cli.command {
            if !args.dirs.is_empty() {
                self.input.dirs = args.dirs.clone();
                // Flag-driven runs resolve DIR arguments against cwd, not
                // against wherever a config file was found.
                if let Ok(cwd) = std::env::current_dir() {
                    self.root = cwd;
                }
            }
            if let Some(prefix) = &args.prefix {
                self.input.prefix = prefix.clone();
            }
            self.input.ignore.extend(args.ignore.iter().cloned());
            if let Some(output) = &args.output {
                self.output.file = output.clone();
            }
            if args.no_compress {
                self.encode.compress = false;
            }
            if args.debug {
                self.encode.debug = true;
            }
            if args.keep_mode {
                self.encode.mode = true;
            }
            if args.keep_mtime {
                self.encode.mtime = true;
            }
        }
    }

    /// Reject configurations the commands cannot run with.
    fn validate(&self, cli: &Cli) -> Result<(), ConfigError> {
        if cli.is_init() {
            return Ok(());
        }
        if self.input.dirs.is_empty() {
            return Err(ConfigError::Validation(
                "no input directories; pass DIR arguments or set [input].dirs in bindery.toml"
                    .to_string(),
            ));
        }
        if self.output.module.is_empty() {
            return Err(ConfigError::Validation(
                "[output].module must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a configured path against the project root, expanding `~`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        if expanded.is_absolute() {
            expanded
        } else {
            self.root.join(expanded)
        }
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Config {
        let deserializer = toml::Deserializer::new(text);
        serde_ignored::deserialize(deserializer, |_| {}).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse("");
        assert!(config.input.dirs.is_empty());
        assert!(config.input.recursive);
        assert_eq!(config.input.duplicates, DuplicateMode::Fail);
        assert!(config.encode.compress);
        assert!(!config.encode.debug);
        assert_eq!(config.output.file, PathBuf::from("src/assets.rs"));
        assert_eq!(config.output.module, "assets");
    }

    #[test]
    fn test_parse_sections() {
        let config = parse(
            r#"
[input]
dirs = ["testdata/in"]
prefix = "testdata"
ignore = ["\\.swp$"]
duplicates = "warn"

[output]
file = "src/embedded.rs"
module = "embedded"

[encode]
compress = false
mode = true
"#,
        );
        assert_eq!(config.input.dirs, vec![PathBuf::from("testdata/in")]);
        assert_eq!(config.input.prefix, "testdata");
        assert_eq!(config.input.ignore, vec!["\\.swp$".to_string()]);
        assert_eq!(config.input.duplicates, DuplicateMode::Warn);
        assert_eq!(config.output.file, PathBuf::from("src/embedded.rs"));
        assert!(!config.encode.compress);
        assert!(config.encode.mode);
        assert!(!config.encode.mtime);
    }

    #[test]
    fn test_unknown_keys_are_collected_not_fatal() {
        let deserializer = toml::Deserializer::new("[input]\ntypo_key = 1\n");
        let mut unknown = Vec::new();
        let _config: Config = serde_ignored::deserialize(deserializer, |key| {
            unknown.push(key.to_string());
        })
        .unwrap();
        assert_eq!(unknown, vec!["input.typo_key".to_string()]);
    }

    #[test]
    fn test_resolve_path() {
        let mut config = Config::default();
        config.root = PathBuf::from("/project");
        assert_eq!(
            config.resolve_path(Path::new("testdata/in")),
            PathBuf::from("/project/testdata/in")
        );
        assert_eq!(
            config.resolve_path(Path::new("/abs/in")),
            PathBuf::from("/abs/in")
        );
    }
}
