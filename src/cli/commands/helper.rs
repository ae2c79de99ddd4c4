use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::{CommandKind, CommandResult, CommandSummary};
use crate::config::{CONFIG_FILE_NAME, Config, load_config};

/// Load the project configuration starting at the working directory.
///
/// The returned verbose flag combines the CLI flag with the config file's.
pub fn load_project_config(verbose: bool) -> Result<(Config, bool)> {
    let result = load_config(Path::new("."))?;
    let verbose = verbose || result.config.verbose;

    if verbose && !result.from_file {
        eprintln!(
            "{} No {} found, using default configuration",
            "info:".bold().cyan(),
            CONFIG_FILE_NAME
        );
    }

    Ok((result.config, verbose))
}

pub fn finish(kind: CommandKind, summary: CommandSummary) -> CommandResult {
    let error_count = match &summary {
        CommandSummary::Extract(_) => 0,
        CommandSummary::Compile(summary) => summary.failed_count(),
        CommandSummary::Init(summary) => usize::from(summary.error.is_some()),
    };

    CommandResult {
        kind,
        summary,
        error_count,
    }
}
