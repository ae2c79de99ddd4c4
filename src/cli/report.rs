//! Report formatting and printing utilities.
//!
//! Separate from core logic to allow vgettext to be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary};
use crate::core::{
    compile::{CompileSummary, LanguageOutcome},
    extract::ExtractSummary,
};
use crate::utils::normalize_path;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    match &result.summary {
        CommandSummary::Extract(summary) => {
            print_extract_to(summary, &mut stdout);
            print_skipped_warning_to(summary.skipped_candidates, verbose, &mut stderr);
        }
        CommandSummary::Compile(summary) => print_compile_to(summary, &mut stdout),
        CommandSummary::Init(summary) => print_init_to(summary, &mut stdout, &mut stderr),
    }
}

/// Print the extraction result line.
pub fn print_extract_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} {} from {} {} into {}",
            summary.messages,
            plural(summary.messages, "message", "messages"),
            summary.files_scanned,
            plural(summary.files_scanned, "file", "files"),
            normalize_path(&summary.output)
        )
        .green()
    );
}

/// Print a warning about template expressions that could not be parsed.
pub fn print_skipped_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} template expression(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print one aligned line per language followed by a summary line.
pub fn print_compile_to<W: Write>(summary: &CompileSummary, writer: &mut W) {
    let name_width = summary
        .languages
        .iter()
        .map(|l| UnicodeWidthStr::width(l.language.as_str()))
        .max()
        .unwrap_or(0);

    for outcome in &summary.languages {
        print_language(outcome, name_width, writer);
    }

    if let Some(path) = &summary.combined_json {
        let _ = writeln!(
            writer,
            "  {} {}",
            "-->".blue(),
            normalize_path(path)
        );
    }

    let total = summary.languages.len();
    let failed = summary.failed_count();
    if failed == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Compiled {} {}",
                total,
                plural(total, "language", "languages")
            )
            .green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "Compiled {} of {} {}",
                total - failed,
                total,
                plural(total, "language", "languages")
            )
            .red()
        );
    }
}

fn print_language<W: Write>(outcome: &LanguageOutcome, name_width: usize, writer: &mut W) {
    let padding = name_width.saturating_sub(UnicodeWidthStr::width(outcome.language.as_str()));
    let name = format!("{}{}", outcome.language, " ".repeat(padding));

    match &outcome.error {
        Some(error) => {
            let _ = writeln!(writer, "  {} {} {}", FAILURE_MARK.red(), name.bold(), error);
        }
        None => {
            let created = if outcome.seeded { " (created)" } else { "" };
            let _ = writeln!(
                writer,
                "  {} {} {}/{} translated  {}{}",
                SUCCESS_MARK.green(),
                name.bold(),
                outcome.translated,
                outcome.messages,
                normalize_path(&outcome.po_path),
                created.dimmed()
            );
        }
    }
}

pub fn print_init_to<W: Write, E: Write>(summary: &InitSummary, writer: &mut W, errors: &mut E) {
    match &summary.error {
        Some(error) => {
            let _ = writeln!(errors, "{} {}", "error:".bold().red(), error);
        }
        None => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", normalize_path(&summary.path)).green()
            );
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
