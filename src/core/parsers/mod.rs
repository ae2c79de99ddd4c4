//! Parsers for the file types the tool reads and writes.
//!
//! - `markup`: component templates (tolerant HTML parser)
//! - `script`: JavaScript/TypeScript sources (uses swc for AST generation)
//! - `po`: PO/POT catalogs (uses polib)

pub mod markup;
pub mod po;
pub mod script;
