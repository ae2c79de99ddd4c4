use std::path::PathBuf;

use anyhow::Result;

use super::super::args::ExtractCommand;
use super::{CommandKind, CommandResult, CommandSummary, helper};
use crate::core::extract::{HtmlRenderer, SourceInput, extract as extract_catalog};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let (config, verbose) = helper::load_project_config(cmd.common.verbose)?;
    let config = config.extract;

    let input = if cmd.files.is_empty() {
        SourceInput::Directory(cmd.input.unwrap_or_else(|| PathBuf::from(&config.input)))
    } else {
        SourceInput::Files(cmd.files)
    };
    let output = cmd.output.unwrap_or_else(|| PathBuf::from(&config.output));

    let summary = extract_catalog(&config, &input, &output, &HtmlRenderer, verbose)?;
    Ok(helper::finish(
        CommandKind::Extract,
        CommandSummary::Extract(summary),
    ))
}
