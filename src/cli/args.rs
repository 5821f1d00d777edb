// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use crate::config::Role;
use crate::scaffold::Flavor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cfglayer - Layered configuration with generated typed accessors
///
/// Merges a base document with the override for the active server role and
/// generates Rust accessor structs for the result.
#[derive(Parser, Debug)]
#[command(name = "cfglayer")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Layered configuration with generated typed accessors", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to run (defaults to build if not specified)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show what would be done without writing any file
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Disable all interactive prompts
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format for machine-readable output
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to the cfglayer settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Output format for CI and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output (default)
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate the accessor file (default command)
    Build(BuildArgs),

    /// Print the resolved configuration
    Show(ShowArgs),

    /// Look up one value by dotted path
    Get(GetArgs),

    /// Write starter configuration documents
    Scaffold(ScaffoldArgs),

    /// Print version information
    Version,
}

/// Arguments for the build command.
#[derive(Parser, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Directory holding the configuration documents
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Where to write the generated accessor
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Role to resolve (overrides CFGLAYER_SERVER_ROLE)
    #[arg(short, long, value_enum)]
    pub role: Option<Role>,

    /// Name of the root accessor type
    #[arg(long)]
    pub root_type: Option<String>,
}

/// Arguments for the show command.
#[derive(Parser, Debug, Default, Clone)]
pub struct ShowArgs {
    /// Directory holding the configuration documents
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Role to resolve (overrides CFGLAYER_SERVER_ROLE)
    #[arg(short, long, value_enum)]
    pub role: Option<Role>,
}

/// Arguments for the get command.
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// Dotted path of the value, e.g. db.port
    pub path: String,

    /// Directory holding the configuration documents
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Role to resolve (overrides CFGLAYER_SERVER_ROLE)
    #[arg(short, long, value_enum)]
    pub role: Option<Role>,
}

/// Arguments for the scaffold command.
#[derive(Parser, Debug, Default, Clone)]
pub struct ScaffoldArgs {
    /// Directory to write the starter documents into
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Sections to include in the base document
    #[arg(short, long = "flavor", value_enum)]
    pub flavors: Vec<Flavor>,

    /// Create the directory if it does not exist
    #[arg(long)]
    pub create: bool,
}

impl Cli {
    /// Get the effective command, defaulting to Build if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Build(BuildArgs::default()))
    }

    /// Whether prompts may be shown.
    pub fn is_interactive(&self) -> bool {
        !self.non_interactive
    }
}
