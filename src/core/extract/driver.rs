//! Extraction pipeline: files in, template catalog out.
//!
//! Code files are parsed as a whole and must be valid. Component files are
//! decomposed and located into candidates; template candidates are parsed
//! tolerantly since attribute values are expressions or `v-for` clauses
//! rather than whole programs.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use regex::Regex;

use crate::config::ExtractConfig;
use crate::core::catalog::{Catalog, CatalogHeaders};
use crate::core::extract::call_collector::CallCollector;
use crate::core::extract::decompose::decompose_file;
use crate::core::extract::locator::{CandidateOrigin, ExtractionCandidate, locate_candidates};
use crate::core::extract::patterns::CallPatterns;
use crate::core::extract::render::FragmentRenderer;
use crate::core::file_scanner::{expand_patterns, scan_directory};
use crate::core::parsers::po::save_catalog;
use crate::core::parsers::script::{ScriptSyntax, parse_script_source};
use crate::utils::{count_line_breaks, normalize_path};

static V_FOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\([^)]*\)|[^\s()]+)\s+(?:in|of)\s+([\s\S]+)$").unwrap()
});

/// Where the files to extract from come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    /// Explicit file paths or glob patterns.
    Files(Vec<String>),
    /// Every file below a directory with an allowed extension.
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub output: PathBuf,
    pub files_scanned: usize,
    pub messages: usize,
    pub contexts: usize,
    pub plurals: usize,
    pub skipped_candidates: usize,
}

/// Accumulates messages from many files into one catalog.
pub struct Extractor<'a> {
    config: &'a ExtractConfig,
    renderer: &'a dyn FragmentRenderer,
    patterns: CallPatterns,
    catalog: Catalog,
    skipped_candidates: usize,
    verbose: bool,
}

impl<'a> Extractor<'a> {
    pub fn new(
        config: &'a ExtractConfig,
        renderer: &'a dyn FragmentRenderer,
        verbose: bool,
    ) -> Result<Self> {
        Ok(Self {
            config,
            renderer,
            patterns: CallPatterns::compile(config)?,
            catalog: Catalog::new(CatalogHeaders::template()),
            skipped_candidates: 0,
            verbose,
        })
    }

    /// Extract from one file according to its extension. Other files are ignored.
    ///
    /// An extension listed both as code and as template is read as code.
    pub fn extract_file(&mut self, path: &Path) -> Result<()> {
        if self.config.is_code_file(path) {
            let code = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let syntax = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(ScriptSyntax::from_extension)
                .unwrap_or_default();
            self.extract_code(code, &normalize_path(path), 1, syntax)?;
        } else if self.config.is_template_file(path) {
            let decomposition = decompose_file(path, self.verbose)?;
            for candidate in locate_candidates(&decomposition, self.config, self.renderer) {
                match candidate.origin {
                    CandidateOrigin::Script => self.extract_code(
                        candidate.code,
                        &candidate.filename,
                        candidate.line,
                        candidate.syntax,
                    )?,
                    CandidateOrigin::Template => self.extract_template_candidate(&candidate),
                }
            }
        }
        Ok(())
    }

    /// Extract from script code that must parse.
    pub fn extract_code(
        &mut self,
        code: String,
        filename: &str,
        start_line: usize,
        syntax: ScriptSyntax,
    ) -> Result<()> {
        let parsed = parse_script_source(code, filename, syntax)?;
        let messages = CallCollector::new(&parsed, filename, start_line, &self.patterns)
            .collect(&parsed.module);
        for message in messages {
            self.catalog
                .add_occurrence(&message.key, message.reference, message.comments);
        }
        Ok(())
    }

    /// Extract from a template snippet, trying it as a statement, then as an
    /// expression, then as the iterable of a `v-for` clause.
    fn extract_template_candidate(&mut self, candidate: &ExtractionCandidate) {
        let code = candidate.code.as_str();
        let mut attempts = vec![
            (code.to_string(), candidate.line),
            (format!("({})", code), candidate.line),
        ];
        if let Some(iterable) = V_FOR_REGEX.captures(code).and_then(|caps| caps.get(1)) {
            let line = candidate.line + count_line_breaks(&code[..iterable.start()]);
            attempts.push((iterable.as_str().to_string(), line));
        }

        for (code, line) in attempts {
            let Ok(parsed) = parse_script_source(code, &candidate.filename, candidate.syntax)
            else {
                continue;
            };
            let messages = CallCollector::new(&parsed, &candidate.filename, line, &self.patterns)
                .collect(&parsed.module);
            for message in messages {
                self.catalog
                    .add_occurrence(&message.key, message.reference, message.comments);
            }
            return;
        }

        self.skipped_candidates += 1;
        if self.verbose {
            eprintln!(
                "{} {}:{}: could not parse template expression `{}`",
                "warning:".bold().yellow(),
                candidate.filename,
                candidate.line,
                code.trim()
            );
        }
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }
}

/// Run a full extraction and write the template catalog to `output`.
///
/// The input directory and the output's parent directory must exist. Any
/// file that cannot be read or any code file that cannot be parsed aborts
/// the run without writing output.
pub fn extract(
    config: &ExtractConfig,
    input: &SourceInput,
    output: &Path,
    renderer: &dyn FragmentRenderer,
    verbose: bool,
) -> Result<ExtractSummary> {
    if let SourceInput::Directory(dir) = input
        && !dir.is_dir()
    {
        bail!("Input directory {} not found.", dir.display());
    }
    let output_dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if !output_dir.is_dir() {
        bail!("Output directory {} not found.", output_dir.display());
    }

    let scan = match input {
        SourceInput::Files(patterns) => expand_patterns(patterns, verbose),
        SourceInput::Directory(dir) => scan_directory(
            dir,
            |path| config.is_template_file(path) || config.is_code_file(path),
            verbose,
        ),
    };

    let mut extractor = Extractor::new(config, renderer, verbose)?;
    for file in &scan.files {
        extractor.extract_file(file)?;
    }
    let skipped_candidates = extractor.skipped_candidates;
    let catalog = extractor.into_catalog();

    save_catalog(&catalog, output)?;

    let summary = ExtractSummary {
        output: output.to_path_buf(),
        files_scanned: scan.files.len(),
        messages: catalog.len(),
        contexts: catalog
            .contexts()
            .keys()
            .filter(|context| !context.is_empty())
            .count(),
        plurals: catalog.entries().filter(|e| e.plural.is_some()).count(),
        skipped_candidates,
    };

    if verbose {
        eprintln!(
            "{} {} files scanned, {} messages ({} contexts, {} plurals), {} template expressions skipped",
            "info:".bold().cyan(),
            summary.files_scanned,
            summary.messages,
            summary.contexts,
            summary.plurals,
            summary.skipped_candidates
        );
    }

    Ok(summary)
}
