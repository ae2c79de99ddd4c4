//! Compilation: template plus translation catalogs to refreshed PO files
//! and runtime JSON.

pub mod merge;
pub mod projection;
pub mod writer;

pub use merge::{MergedCatalog, deep_merge, merge_language};
pub use projection::{NO_CONTEXT_KEY, project_json};
pub use writer::{
    COMBINED_JSON_FILE, CompileSummary, CompileTargets, LanguageOutcome, compile, to_json_string,
};
