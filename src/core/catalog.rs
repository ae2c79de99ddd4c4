//! Catalog data model shared by extraction and compilation.
//!
//! A catalog is a two-level, insertion-ordered map `context -> text -> entry`
//! plus the header metadata of the PO file it came from. Absent contexts are
//! stored under the empty string.
//!
//! The serde shape of [`MessageEntry`] is the tree form used by the merge
//! engine: `{msgctxt?, msgid, msgid_plural?, msgstr, comments?}`.

use std::fmt;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flag marking a translation as needing review.
pub const FUZZY_FLAG: &str = "fuzzy";

pub type ContextMap = IndexMap<String, IndexMap<String, MessageEntry>>;

/// Identity of a translatable message as found in source code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub context: Option<String>,
    pub text: String,
    pub plural: Option<String>,
}

impl MessageKey {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            context: None,
            text: text.into(),
            plural: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    /// Bucket name of this key inside a [`Catalog`].
    pub fn context_bucket(&self) -> &str {
        self.context.as_deref().unwrap_or("")
    }
}

/// `path:line` location of an occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceReference {
    pub filename: String,
    pub line: usize,
}

impl SourceReference {
    pub fn new(filename: impl Into<String>, line: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }

    /// Parse a `path:line` reference as written in PO files.
    pub fn parse(reference: &str) -> Option<Self> {
        let (filename, line) = reference.rsplit_once(':')?;
        let line = line.parse().ok()?;
        if filename.is_empty() {
            return None;
        }
        Some(Self::new(filename, line))
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryComments {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<SourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extracted: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flag: Vec<String>,
}

impl EntryComments {
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty() && self.extracted.is_empty() && self.flag.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    #[serde(rename = "msgctxt", default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(rename = "msgid")]
    pub text: String,
    #[serde(
        rename = "msgid_plural",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub plural: Option<String>,
    #[serde(rename = "msgstr", default)]
    pub translations: Vec<String>,
    #[serde(default, skip_serializing_if = "EntryComments::is_empty")]
    pub comments: EntryComments,
}

impl MessageEntry {
    /// Untranslated entry for `key`.
    pub fn from_key(key: &MessageKey) -> Self {
        let forms = if key.plural.is_some() { 2 } else { 1 };
        Self {
            context: key.context_bucket().to_string(),
            text: key.text.clone(),
            plural: key.plural.clone(),
            translations: vec![String::new(); forms],
            comments: EntryComments::default(),
        }
    }

    pub fn is_fuzzy(&self) -> bool {
        self.comments.flag.iter().any(|flag| flag == FUZZY_FLAG)
    }

    pub fn is_translated(&self) -> bool {
        !self.translations.is_empty() && self.translations.iter().all(|t| !t.is_empty())
    }

    fn add_reference(&mut self, reference: SourceReference) {
        if !self.comments.reference.contains(&reference) {
            self.comments.reference.push(reference);
        }
    }

    fn add_comment(&mut self, comment: String) {
        if !comment.is_empty() && !self.comments.extracted.contains(&comment) {
            self.comments.extracted.push(comment);
        }
    }
}

/// Header metadata of a PO/POT file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogHeaders {
    pub project_id_version: String,
    pub pot_creation_date: String,
    pub po_revision_date: String,
    pub last_translator: String,
    pub language_team: String,
    pub mime_version: String,
    pub content_type: String,
    pub content_transfer_encoding: String,
    pub language: String,
    /// Number of plural forms; only meaningful with a non-empty `plural_expr`.
    pub nplurals: usize,
    pub plural_expr: String,
}

impl CatalogHeaders {
    /// Headers written on freshly extracted templates.
    pub fn template() -> Self {
        Self {
            mime_version: "1.0".to_string(),
            content_type: "text/plain; charset=UTF-8".to_string(),
            content_transfer_encoding: "8bit".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub headers: CatalogHeaders,
    contexts: ContextMap,
}

impl Catalog {
    pub fn new(headers: CatalogHeaders) -> Self {
        Self {
            headers,
            contexts: ContextMap::new(),
        }
    }

    /// Record one occurrence of `key` at `reference`.
    ///
    /// The first occurrence creates the entry; later ones only add references
    /// and comments. A plural text is attached to the entry when it has none yet.
    /// Keys with an empty text are ignored.
    pub fn add_occurrence(
        &mut self,
        key: &MessageKey,
        reference: SourceReference,
        comments: impl IntoIterator<Item = String>,
    ) {
        if key.text.is_empty() {
            return;
        }

        let entry = self
            .contexts
            .entry(key.context_bucket().to_string())
            .or_default()
            .entry(key.text.clone())
            .or_insert_with(|| MessageEntry::from_key(key));

        if entry.plural.is_none()
            && let Some(plural) = &key.plural
        {
            entry.plural = Some(plural.clone());
            entry.translations.resize(2, String::new());
        }

        entry.add_reference(reference);
        for comment in comments {
            entry.add_comment(comment);
        }
    }

    /// Insert or replace an entry under its own context and text.
    pub fn insert(&mut self, entry: MessageEntry) {
        self.contexts
            .entry(entry.context.clone())
            .or_default()
            .insert(entry.text.clone(), entry);
    }

    pub fn get(&self, context: &str, text: &str) -> Option<&MessageEntry> {
        self.contexts.get(context)?.get(text)
    }

    pub fn contexts(&self) -> &ContextMap {
        &self.contexts
    }

    pub fn entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.contexts.values().flat_map(|bucket| bucket.values())
    }

    pub fn len(&self) -> usize {
        self.contexts.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the entries into the generic tree form.
    pub fn to_tree(&self) -> Result<Value> {
        serde_json::to_value(&self.contexts).context("Failed to convert catalog to tree form")
    }

    /// Rebuild a catalog from the tree form produced by [`Catalog::to_tree`].
    pub fn from_tree(headers: CatalogHeaders, tree: Value) -> Result<Self> {
        let mut contexts: ContextMap =
            serde_json::from_value(tree).context("Malformed catalog tree")?;
        for bucket in contexts.values_mut() {
            bucket.shift_remove("");
        }
        Ok(Self { headers, contexts })
    }
}
