//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Scan components and scripts and write the template catalog
//! - `compile`: Merge translation catalogs with the template and write JSON
//! - `init`: Initialize a vgettext configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Compile(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Files or glob patterns to scan instead of the input directory
    pub files: Vec<String>,

    /// Directory scanned for sources (overrides config file)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Template catalog to write (overrides config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CompileCommand {
    /// Template catalog to merge from (overrides config file)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory holding the `<lang>.po` files (overrides config file)
    #[arg(long)]
    pub locales_dir: Option<PathBuf>,

    /// Directory the JSON files are written to (overrides config file)
    #[arg(long)]
    pub json_dir: Option<PathBuf>,

    /// Languages to compile
    /// Can be specified multiple times: -l de -l fr
    #[arg(short = 'l', long = "language")]
    pub languages: Vec<String>,

    /// JSON output: single, multiple, both or none
    #[arg(long)]
    pub json_output_type: Option<String>,

    /// Start from the template instead of keeping existing translations
    #[arg(long)]
    pub no_join_existing: bool,

    /// Leave fuzzy translations out of the JSON output
    #[arg(long)]
    pub no_fuzzy_in_json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable strings into a template catalog (.pot)
    Extract(ExtractCommand),
    /// Update PO files from the template and write JSON translations
    Compile(CompileCommand),
    /// Initialize a new .vgettextrc.json configuration file
    Init,
}
