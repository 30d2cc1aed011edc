//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::application::{ErrorPolicy, SortOrder};

/// Render labeled trees and directory hierarchies with box-drawing characters
#[derive(Parser, Debug)]
#[command(name = "boxtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print directory trees
    Dir(DirArgs),

    /// Print a sample tree with nested and multi-line labels
    Demo,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Flags for `boxtree dir`; unset flags fall back to the loaded settings.
#[derive(Args, Debug, Default)]
pub struct DirArgs {
    /// Directories to list
    #[arg(default_value = ".", value_hint = ValueHint::DirPath)]
    pub paths: Vec<PathBuf>,

    /// Include hidden entries
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Descend at most N levels
    #[arg(short = 'L', long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// List directories before files
    #[arg(long)]
    pub dirs_first: bool,

    /// Entry order within a directory
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Follow symbolic links
    #[arg(short = 'l', long)]
    pub follow_links: bool,

    /// Append '/' to directory names
    #[arg(short = 'F', long)]
    pub classify: bool,

    /// Leave out entries whose name matches PATTERN (regex, repeatable)
    #[arg(short = 'I', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Reaction to unreadable entries
    #[arg(long, value_enum)]
    pub on_error: Option<ErrorPolicy>,

    /// Omit the "N directories, M files" footer
    #[arg(long)]
    pub noreport: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings for a directory
    Show {
        /// Directory whose .boxtree.toml is layered in
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Print the global config file location
    Path,

    /// Print a commented config template
    Template,
}
