use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::glob;
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (`*`, `?` or `[`).
/// Patterns without wildcards are treated as literal file paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Matching files in sorted path order.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Walk `root` and collect every file accepted by `accept`.
pub fn scan_directory(root: &Path, accept: impl Fn(&Path) -> bool, verbose: bool) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && accept(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    ScanResult {
        files,
        skipped_count,
    }
}

/// Expand file paths and glob patterns, keeping the given order and dropping
/// duplicates. Literal paths are kept even if they do not exist so that the
/// caller reports them.
pub fn expand_patterns(patterns: &[String], verbose: bool) -> ScanResult {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();
    let mut skipped_count = 0;

    for pattern in patterns {
        let mut matches: Vec<PathBuf> = if is_glob_pattern(pattern) {
            match glob(pattern) {
                Ok(entries) => entries
                    .filter_map(|entry| match entry {
                        Ok(path) => Some(path),
                        Err(e) => {
                            skipped_count += 1;
                            if verbose {
                                eprintln!(
                                    "{} Cannot access path: {}",
                                    "warning:".bold().yellow(),
                                    e
                                );
                            }
                            None
                        }
                    })
                    .filter(|path| path.is_file())
                    .collect(),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid glob pattern '{}': {}",
                            "warning:".bold().yellow(),
                            pattern,
                            e
                        );
                    }
                    Vec::new()
                }
            }
        } else {
            vec![PathBuf::from(pattern)]
        };

        matches.sort();
        for path in matches {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}
