//! Recognized call shapes and their spellings.
//!
//! Every call keyword (`gettext`, `pgettext`, `ngettext`, `npgettext`) is
//! compiled into a [`CallPattern`]: the callee spellings that invoke it and
//! the argument positions holding the message text, plural text and context.

use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::{ExtractConfig, KeywordSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    Text,
    ContextText,
    TextPlural,
    ContextTextPlural,
}

impl CallShape {
    pub const ALL: [CallShape; 4] = [
        CallShape::Text,
        CallShape::ContextText,
        CallShape::TextPlural,
        CallShape::ContextTextPlural,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            CallShape::Text => "gettext",
            CallShape::ContextText => "pgettext",
            CallShape::TextPlural => "ngettext",
            CallShape::ContextTextPlural => "npgettext",
        }
    }

    /// Standard gettext signature of the keyword.
    pub fn default_positions(self) -> ArgumentPositions {
        match self {
            CallShape::Text => ArgumentPositions::new(0, None, None),
            CallShape::ContextText => ArgumentPositions::new(1, None, Some(0)),
            CallShape::TextPlural => ArgumentPositions::new(0, Some(1), None),
            CallShape::ContextTextPlural => ArgumentPositions::new(1, Some(2), Some(0)),
        }
    }

    pub fn has_plural(self) -> bool {
        matches!(self, CallShape::TextPlural | CallShape::ContextTextPlural)
    }

    pub fn has_context(self) -> bool {
        matches!(self, CallShape::ContextText | CallShape::ContextTextPlural)
    }

    fn spec(self, config: &ExtractConfig) -> &KeywordSpec {
        let specs = &config.keyword_spec;
        match self {
            CallShape::Text => &specs.gettext,
            CallShape::ContextText => &specs.pgettext,
            CallShape::TextPlural => &specs.ngettext,
            CallShape::ContextTextPlural => &specs.npgettext,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentPositions {
    pub text: usize,
    pub plural: Option<usize>,
    pub context: Option<usize>,
}

impl ArgumentPositions {
    pub fn new(text: usize, plural: Option<usize>, context: Option<usize>) -> Self {
        Self {
            text,
            plural,
            context,
        }
    }

    fn resolve(shape: CallShape, spec: &KeywordSpec) -> Self {
        let defaults = shape.default_positions();
        Self {
            text: spec.text.unwrap_or(defaults.text),
            plural: defaults.plural.map(|p| spec.text_plural.unwrap_or(p)),
            context: defaults.context.map(|c| spec.context.unwrap_or(c)),
        }
    }

    /// Place already-quoted argument values at their positions.
    ///
    /// Unused slots are filled with `undefined`; plural calls get a trailing
    /// count of `2`.
    pub fn arrange(&self, text: String, plural: Option<String>, context: Option<String>) -> String {
        let mut slots: Vec<Option<String>> = Vec::new();
        let mut place = |index: usize, value: String| {
            if slots.len() <= index {
                slots.resize(index + 1, None);
            }
            slots[index] = Some(value);
        };

        place(self.text, text);
        let has_plural = self.plural.is_some() && plural.is_some();
        if let (Some(index), Some(value)) = (self.plural, plural) {
            place(index, value);
        }
        if let (Some(index), Some(value)) = (self.context, context) {
            place(index, value);
        }

        let mut args: Vec<String> = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| "undefined".to_string()))
            .collect();
        if has_plural {
            args.push("2".to_string());
        }
        args.join(", ")
    }
}

/// One segment of a callee expression: `this` or a property/identifier name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalleeSegment {
    This,
    Name(String),
}

/// A callee spelling such as `$gettext` or `[this].$gettext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalleeSpelling {
    segments: Vec<CalleeSegment>,
}

impl CalleeSpelling {
    pub fn parse(spelling: &str) -> Self {
        let segments = spelling
            .split('.')
            .map(|segment| match segment {
                "[this]" => CalleeSegment::This,
                name => CalleeSegment::Name(name.to_string()),
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, segments: &[CalleeSegment]) -> bool {
        self.segments == segments
    }
}

impl fmt::Display for CalleeSpelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|segment| match segment {
                CalleeSegment::This => "[this]",
                CalleeSegment::Name(name) => name.as_str(),
            })
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

#[derive(Debug, Clone)]
pub struct CallPattern {
    pub shape: CallShape,
    pub spellings: Vec<CalleeSpelling>,
    pub arguments: ArgumentPositions,
}

/// All call patterns derived from a configuration, plus the extraction
/// comment matcher.
#[derive(Debug, Clone)]
pub struct CallPatterns {
    patterns: Vec<CallPattern>,
    comment_marker: Regex,
}

impl CallPatterns {
    pub fn compile(config: &ExtractConfig) -> Result<Self> {
        let patterns = CallShape::ALL
            .iter()
            .map(|&shape| {
                let spec = shape.spec(config);
                CallPattern {
                    shape,
                    spellings: spellings_for(shape, spec, config.underscore_alias),
                    arguments: ArgumentPositions::resolve(shape, spec),
                }
            })
            .collect();

        let marker = format!(r"(?i)^\s*\${}:\s*(.*)", regex::escape(&config.comment_keyword));
        let comment_marker = Regex::new(&marker)
            .with_context(|| format!("Invalid comment keyword: {}", config.comment_keyword))?;

        Ok(Self {
            patterns,
            comment_marker,
        })
    }

    /// Pattern invoked by the given callee, if any.
    pub fn find(&self, callee: &[CalleeSegment]) -> Option<&CallPattern> {
        self.patterns.iter().find(|pattern| {
            pattern
                .spellings
                .iter()
                .any(|spelling| spelling.matches(callee))
        })
    }

    pub fn get(&self, shape: CallShape) -> Option<&CallPattern> {
        self.patterns.iter().find(|pattern| pattern.shape == shape)
    }

    /// Text of an extraction comment, or `None` if the comment carries no marker.
    pub fn extraction_comment(&self, comment: &str) -> Option<String> {
        self.comment_marker
            .captures(comment)
            .and_then(|caps| caps.get(1))
            .map(|text| text.as_str().trim_end().to_string())
    }
}

fn spellings_for(shape: CallShape, spec: &KeywordSpec, underscore_alias: bool) -> Vec<CalleeSpelling> {
    let keyword = shape.keyword();
    let mut names = vec![format!("${}", keyword)];
    for alias in &spec.aliases {
        if alias != keyword {
            names.push(format!("${}", alias));
        }
    }
    if underscore_alias && shape == CallShape::Text {
        names.push("_".to_string());
    }

    let mut spellings: Vec<CalleeSpelling> = Vec::new();
    for name in names {
        for spelling in [name.clone(), format!("[this].{}", name)] {
            let spelling = CalleeSpelling::parse(&spelling);
            if !spellings.contains(&spelling) {
                spellings.push(spelling);
            }
        }
    }
    spellings
}
