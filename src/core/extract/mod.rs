//! Extraction: source files to the canonical template catalog.
//!
//! Components are split by the decomposer, the locator turns their templates
//! into script candidates, and the call collector finds translation calls in
//! every candidate using the compiled call patterns. The driver ties these
//! together and writes the POT file.

pub mod call_collector;
pub mod decompose;
pub mod driver;
pub mod locator;
pub mod patterns;
pub mod render;

pub use call_collector::{CallCollector, ExtractedMessage};
pub use decompose::{Decomposition, ScriptRegion, decompose_file, decompose_source};
pub use driver::{ExtractSummary, Extractor, SourceInput, extract};
pub use locator::{CandidateOrigin, ExtractionCandidate, StringLocator, locate_candidates};
pub use patterns::{CallPattern, CallPatterns, CallShape};
pub use render::{FragmentRenderer, HtmlRenderer};
