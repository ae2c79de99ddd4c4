//! vgettext - gettext extraction and compilation for Vue projects
//!
//! vgettext is a CLI tool and library that extracts translatable strings from
//! Vue single-file components and JavaScript sources into a gettext template
//! catalog (`.pot`), then merges per-language catalogs (`.po`) with that
//! template and projects them to JSON for runtime use.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`extract`, `compile`, `init`)
//! - `config`: Configuration file loading and parsing
//! - `core`: Catalog model, parsers, extraction and compilation pipelines
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
