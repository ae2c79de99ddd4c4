//! Rendering of whole-element translation blocks.
//!
//! The msgid of a `<translate>` block or `v-translate` element is its inner
//! content rendered to static markup and normalized, so interpolations and
//! inline tags survive in the catalog exactly as translators must reproduce
//! them.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::parsers::markup::{Node, ToHtml};

static SCOPE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s*data-v-[a-zA-Z0-9]{8,}=".*?""#).unwrap());
static AFTER_TAG_WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+").unwrap());
static BEFORE_TAG_WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+<").unwrap());

/// Turns a markup fragment into static markup text.
pub trait FragmentRenderer {
    fn render(&self, fragment: &[Node]) -> Result<String>;
}

/// Serializes fragments as static HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl FragmentRenderer for HtmlRenderer {
    fn render(&self, fragment: &[Node]) -> Result<String> {
        let mut out = String::new();
        for node in fragment {
            node.write_html(&mut out);
        }
        Ok(out)
    }
}

/// Normalize rendered markup into a msgid.
///
/// Removes component scoping attributes (`data-v-xxxxxxxx=""`), drops
/// whitespace next to tag boundaries and trims the result.
pub fn normalize_rendered(html: &str) -> String {
    let html = SCOPE_MARKER_REGEX.replace_all(html, "");
    let html = AFTER_TAG_WHITESPACE_REGEX.replace_all(&html, ">");
    let html = BEFORE_TAG_WHITESPACE_REGEX.replace_all(&html, "<");
    html.trim().to_string()
}
