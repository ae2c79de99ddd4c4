use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::config::CompileConfig;
use crate::core::compile::merge::{deep_merge, merge_language};
use crate::core::parsers::po::save_catalog;
use crate::utils::normalize_path;

/// File name of the combined JSON output.
pub const COMBINED_JSON_FILE: &str = "translations.json";

/// Resolved locations and languages for one compile run.
#[derive(Debug, Clone)]
pub struct CompileTargets {
    pub template: PathBuf,
    pub locales_dir: PathBuf,
    pub json_dir: PathBuf,
    pub languages: Vec<String>,
}

impl CompileTargets {
    /// Resolve the configured paths against `root`.
    pub fn from_config(config: &CompileConfig, root: &Path) -> Self {
        Self {
            template: root.join(&config.template),
            locales_dir: root.join(&config.locales_dir),
            json_dir: root.join(&config.json_dir),
            languages: config.effective_languages(),
        }
    }
}

/// What happened to one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOutcome {
    pub language: String,
    pub po_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub messages: usize,
    pub translated: usize,
    pub seeded: bool,
    /// Set when the language could not be compiled; other languages still are.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    pub languages: Vec<LanguageOutcome>,
    pub combined_json: Option<PathBuf>,
}

impl CompileSummary {
    pub fn failed_count(&self) -> usize {
        self.languages.iter().filter(|l| l.error.is_some()).count()
    }
}

/// Merge every target language with the template, rewrite its PO file and
/// emit the JSON projections selected by `config.json_output_type`.
///
/// Missing output directories abort before anything is written. A failing
/// language is recorded in the summary and the remaining languages proceed.
pub fn compile(
    config: &CompileConfig,
    targets: &CompileTargets,
    verbose: bool,
) -> Result<CompileSummary> {
    if !targets.locales_dir.is_dir() {
        bail!(
            "Locales output directory {} not found.",
            normalize_path(&targets.locales_dir)
        );
    }
    if !targets.json_dir.is_dir() {
        bail!(
            "Locales JSON output directory {} not found.",
            normalize_path(&targets.json_dir)
        );
    }

    let output_type = config.json_output_type;
    let mut summary = CompileSummary::default();
    let mut combined = Value::Object(Map::new());

    for language in &targets.languages {
        let po_path = targets.locales_dir.join(format!("{}.po", language));
        let outcome = match compile_language(config, targets, language, verbose) {
            Ok((outcome, json)) => {
                if output_type.writes_combined() {
                    combined = deep_merge(combined, wrap_language(language, json));
                }
                outcome
            }
            Err(e) => {
                eprintln!(
                    "{} Couldn't write output files for language {}: {:#}",
                    "error:".bold().red(),
                    language,
                    e
                );
                LanguageOutcome {
                    language: language.clone(),
                    po_path,
                    json_path: None,
                    messages: 0,
                    translated: 0,
                    seeded: false,
                    error: Some(format!("{:#}", e)),
                }
            }
        };
        summary.languages.push(outcome);
    }

    if output_type.writes_combined() {
        let path = targets.json_dir.join(COMBINED_JSON_FILE);
        write_json(&path, &combined)?;
        if verbose {
            eprintln!(
                "{} Wrote combined translations to {}",
                "info:".bold().cyan(),
                path.display()
            );
        }
        summary.combined_json = Some(path);
    }

    Ok(summary)
}

fn compile_language(
    config: &CompileConfig,
    targets: &CompileTargets,
    language: &str,
    verbose: bool,
) -> Result<(LanguageOutcome, Value)> {
    let merged = merge_language(
        language,
        &targets.template,
        &targets.locales_dir,
        config,
        verbose,
    )?;
    save_catalog(&merged.catalog, &merged.output_path)?;

    let json_path = if config.json_output_type.writes_per_language() {
        let path = targets.json_dir.join(format!("{}.json", language));
        write_json(&path, &wrap_language(language, merged.json.clone()))?;
        Some(path)
    } else {
        None
    };

    let outcome = LanguageOutcome {
        language: merged.language,
        po_path: merged.output_path,
        json_path,
        messages: merged.catalog.len(),
        translated: merged
            .catalog
            .entries()
            .filter(|e| e.is_translated())
            .count(),
        seeded: merged.seeded,
        error: None,
    };
    Ok((outcome, merged.json))
}

fn wrap_language(language: &str, json: Value) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert(language.to_string(), json);
    Value::Object(wrapped)
}

/// Tab-indented JSON with a trailing newline.
pub fn to_json_string(value: &Value) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON output")?;
    let mut content = String::from_utf8(buffer).context("JSON output is not valid UTF-8")?;
    content.push('\n');
    Ok(content)
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let content = to_json_string(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
