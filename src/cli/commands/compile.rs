use std::path::Path;

use anyhow::Result;

use super::super::args::CompileCommand;
use super::{CommandKind, CommandResult, CommandSummary, helper};
use crate::config::{CompileConfig, JsonOutputType};
use crate::core::compile::{CompileTargets, compile as compile_catalogs};

pub fn compile(cmd: CompileCommand) -> Result<CommandResult> {
    let (config, verbose) = helper::load_project_config(cmd.common.verbose)?;
    let config = apply_overrides(config.compile, &cmd);
    config.validate()?;

    let targets = CompileTargets::from_config(&config, Path::new("."));
    let summary = compile_catalogs(&config, &targets, verbose)?;
    Ok(helper::finish(
        CommandKind::Compile,
        CommandSummary::Compile(summary),
    ))
}

/// CLI > config file > defaults.
fn apply_overrides(mut config: CompileConfig, cmd: &CompileCommand) -> CompileConfig {
    if let Some(template) = &cmd.template {
        config.template = template.to_string_lossy().into_owned();
    }
    if let Some(dir) = &cmd.locales_dir {
        config.locales_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(dir) = &cmd.json_dir {
        config.json_dir = dir.to_string_lossy().into_owned();
    }
    if !cmd.languages.is_empty() {
        config.languages = cmd.languages.clone();
    }
    if let Some(output_type) = &cmd.json_output_type {
        config.json_output_type = JsonOutputType::parse_lossy(output_type);
    }
    if cmd.no_join_existing {
        config.join_existing = false;
    }
    if cmd.no_fuzzy_in_json {
        config.fuzzy_strings_in_json = false;
    }
    config
}
