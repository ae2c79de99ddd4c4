use std::path::PathBuf;

use crate::core::{compile::CompileSummary, extract::ExtractSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Extract,
    Compile,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Compile(CompileSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    /// Set when the file could not be created.
    pub error: Option<String>,
}

/// Result of running vgettext commands
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    /// Languages that failed to compile, or a failed init.
    /// A non-zero count maps to exit status 1.
    pub error_count: usize,
}
