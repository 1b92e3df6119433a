//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Bindery asset embedding CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: bindery.toml)
    #[arg(short = 'C', long, default_value = "bindery.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the init subcommand was invoked (config file may not exist yet)
    pub fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a starter bindery.toml
    #[command(visible_alias = "i")]
    Init {
        /// Project directory (default: current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        path: Option<PathBuf>,
    },

    /// Generate the embedded-asset source file
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// List packaged assets
    #[command(visible_alias = "l")]
    List {
        #[command(flatten)]
        args: ListArgs,
    },

    /// Restore packaged assets to a directory
    #[command(visible_alias = "x")]
    Extract {
        #[command(flatten)]
        args: ExtractArgs,
    },
}

/// Generate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Input directories to package (overrides [input].dirs)
    #[arg(value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub dirs: Vec<PathBuf>,

    /// Output file for the generated source (overrides [output].file)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Path prefix stripped from packaged names (overrides [input].prefix)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Regex of paths to skip; repeatable (adds to [input].ignore)
    #[arg(short, long, value_name = "REGEX")]
    pub ignore: Vec<String>,

    /// Store payloads uncompressed
    #[arg(long)]
    pub no_compress: bool,

    /// Generate code that reads assets from disk instead of embedding them
    #[arg(short, long)]
    pub debug: bool,

    /// Record file permission bits so restores can re-apply them
    #[arg(long)]
    pub keep_mode: bool,

    /// Record file modification times so restores can re-apply them
    #[arg(long)]
    pub keep_mtime: bool,
}

/// List command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Directory name to list (immediate children); omit for the full tree
    #[arg(value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tree")]
    pub format: ListFormat,
}

/// Output formats for the list command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Indented tree with sizes
    Tree,
    /// JSON array with name, size, and digest per asset
    Json,
}

/// Extract command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Target directory to restore into
    #[arg(value_name = "TARGET", value_hint = clap::ValueHint::DirPath)]
    pub target: PathBuf,

    /// Asset or directory names to restore; repeatable (default: everything)
    #[arg(short, long, value_name = "NAME")]
    pub name: Vec<String>,
}
