//! Finds the places in a component that may contain translatable strings.
//!
//! The locator never decides what is translatable. It turns interpolations,
//! bound attributes and whole-element translation blocks into script snippets
//! ([`ExtractionCandidate`]s) which the driver then parses for calls. Blocks
//! are turned into synthesized calls such as `$pgettext('menu', 'Open')`.

use crate::config::ExtractConfig;
use crate::core::extract::decompose::Decomposition;
use crate::core::extract::patterns::CallShape;
use crate::core::extract::render::{FragmentRenderer, normalize_rendered};
use crate::core::parsers::markup::{Element, Node, Text, is_dynamic_attribute};
use crate::core::parsers::script::ScriptSyntax;
use crate::utils::count_line_breaks;

/// Where a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// The component's script block; must parse as a program.
    Script,
    /// A template expression or synthesized block call.
    Template,
}

/// A snippet of script code to scan for translation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCandidate {
    pub filename: String,
    pub code: String,
    /// File line on which `code` starts.
    pub line: usize,
    pub syntax: ScriptSyntax,
    pub origin: CandidateOrigin,
}

/// Role of an attribute in translation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TranslationAttribute {
    Directive,
    Plural,
    Count,
    Context,
    Comment,
}

/// Translation metadata collected from an element's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockAttributes {
    pub plural: Option<String>,
    pub count: bool,
    pub context: Option<String>,
    pub comment: Option<String>,
}

impl BlockAttributes {
    /// Synthesize the call that a translation block stands for.
    ///
    /// A plural call needs both the plural text and the count flag.
    pub fn synthesize_call(&self, text: &str, comment_keyword: &str) -> String {
        let plural = self.plural.as_deref().filter(|_| self.count);
        let shape = match (plural.is_some(), self.context.is_some()) {
            (true, true) => CallShape::ContextTextPlural,
            (true, false) => CallShape::TextPlural,
            (false, true) => CallShape::ContextText,
            (false, false) => CallShape::Text,
        };

        let arguments = shape.default_positions().arrange(
            quote(text),
            plural.map(quote),
            self.context.as_deref().map(quote),
        );
        let call = format!("${}({})", shape.keyword(), arguments);

        match &self.comment {
            Some(comment) => format!(
                "/*${}: {}*/ {}",
                comment_keyword,
                comment.replace("*/", "* /"),
                call
            ),
            None => call,
        }
    }
}

/// Single-quoted string literal decoding back to `value`.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// How the locator treats a node.
enum NodeKind<'n> {
    Text(&'n Text),
    TranslateBlock(&'n Element),
    Element(&'n Element),
    Ignored,
}

pub struct StringLocator<'a> {
    config: &'a ExtractConfig,
    renderer: &'a dyn FragmentRenderer,
    filename: &'a str,
    candidates: Vec<ExtractionCandidate>,
}

impl<'a> StringLocator<'a> {
    pub fn new(
        config: &'a ExtractConfig,
        renderer: &'a dyn FragmentRenderer,
        filename: &'a str,
    ) -> Self {
        Self {
            config,
            renderer,
            filename,
            candidates: Vec::new(),
        }
    }

    /// Candidates of a template tree, in document order.
    pub fn locate(mut self, nodes: &[Node]) -> Vec<ExtractionCandidate> {
        self.walk(nodes);
        self.candidates
    }

    fn walk(&mut self, nodes: &[Node]) {
        for node in nodes {
            match self.classify(node) {
                NodeKind::Text(text) => self.visit_text(text),
                NodeKind::TranslateBlock(element) => self.visit_translate_block(element),
                NodeKind::Element(element) => self.visit_element(element),
                NodeKind::Ignored => {}
            }
        }
    }

    fn classify<'n>(&self, node: &'n Node) -> NodeKind<'n> {
        match node {
            Node::Text(text) => NodeKind::Text(text),
            Node::Element(element) if element.name == self.config.translate_tag => {
                NodeKind::TranslateBlock(element)
            }
            Node::Element(element) => NodeKind::Element(element),
            Node::Comment(_) => NodeKind::Ignored,
        }
    }

    fn push(&mut self, code: String, line: usize) {
        if code.trim().is_empty() {
            return;
        }
        self.candidates.push(ExtractionCandidate {
            filename: self.filename.to_string(),
            code,
            line,
            syntax: ScriptSyntax::Ecmascript,
            origin: CandidateOrigin::Template,
        });
    }

    /// Every `start ... end` interpolation becomes a candidate.
    fn visit_text(&mut self, text: &Text) {
        let start_delim = self.config.start_delim.as_str();
        let end_delim = self.config.end_delim.as_str();
        let mut rest = text.value.as_str();
        let mut line = text.start.line;

        while let Some(open) = rest.find(start_delim) {
            let inner_start = open + start_delim.len();
            let Some(close) = rest[inner_start..].find(end_delim) else {
                break;
            };
            let inner = &rest[inner_start..inner_start + close];

            line += count_line_breaks(&rest[..inner_start]);
            self.push(inner.to_string(), line);
            line += count_line_breaks(inner);

            rest = &rest[inner_start + close + end_delim.len()..];
        }
    }

    /// The translate tag is a block of its own; its children are not walked.
    fn visit_translate_block(&mut self, element: &Element) {
        let (attributes, _) = self.collect_attributes(element);
        self.push_block(element, &attributes);
    }

    fn visit_element(&mut self, element: &Element) {
        let (attributes, has_directive) = self.collect_attributes(element);

        for attr in &element.attrs {
            let normalized = normalize_attribute_name(&attr.name);
            if self.attribute_role(&normalized).is_none() && is_dynamic_attribute(&attr.name) {
                self.push(attr.value.clone(), attr.start.line);
            }
        }

        if has_directive {
            self.push_block(element, &attributes);
        }
        self.walk(&element.children);
    }

    fn collect_attributes(&self, element: &Element) -> (BlockAttributes, bool) {
        let mut attributes = BlockAttributes::default();
        let mut has_directive = false;

        for attr in &element.attrs {
            let Some(role) = self.attribute_role(&normalize_attribute_name(&attr.name)) else {
                continue;
            };
            let value = attr.value.clone();
            match role {
                TranslationAttribute::Directive => has_directive = true,
                TranslationAttribute::Plural => attributes.plural = Some(value),
                TranslationAttribute::Count => attributes.count = !value.is_empty(),
                TranslationAttribute::Context => attributes.context = Some(value),
                TranslationAttribute::Comment => attributes.comment = Some(value),
            }
        }
        (attributes, has_directive)
    }

    fn attribute_role(&self, normalized: &str) -> Option<TranslationAttribute> {
        let names = &self.config.attributes;
        if normalized == self.config.directive_name {
            Some(TranslationAttribute::Directive)
        } else if normalized == names.plural {
            Some(TranslationAttribute::Plural)
        } else if normalized == names.n {
            Some(TranslationAttribute::Count)
        } else if normalized == names.context {
            Some(TranslationAttribute::Context)
        } else if normalized == names.comment {
            Some(TranslationAttribute::Comment)
        } else {
            None
        }
    }

    fn push_block(&mut self, element: &Element, attributes: &BlockAttributes) {
        // A render failure leaves the text empty; `$gettext('')` is ignored downstream.
        let text = self
            .renderer
            .render(&element.children)
            .map(|html| normalize_rendered(&html))
            .unwrap_or_default();
        let code = attributes.synthesize_call(&text, &self.config.comment_keyword);
        self.push(code, element.start.line);
    }
}

/// `v-bind:t-context` and `:t-context` both become `t-context`.
fn normalize_attribute_name(name: &str) -> String {
    name.replacen("v-bind", "", 1).replacen(':', "", 1)
}

/// All candidates of a decomposed component: the script region first, then
/// the template's candidates in document order.
pub fn locate_candidates(
    decomposition: &Decomposition,
    config: &ExtractConfig,
    renderer: &dyn FragmentRenderer,
) -> Vec<ExtractionCandidate> {
    let mut candidates = Vec::new();

    if let Some(script) = &decomposition.script
        && !script.code.trim().is_empty()
    {
        candidates.push(ExtractionCandidate {
            filename: decomposition.filename.clone(),
            code: script.code.clone(),
            line: script.start_line,
            syntax: script.syntax,
            origin: CandidateOrigin::Script,
        });
    }

    if let Some(template) = &decomposition.template {
        let locator = StringLocator::new(config, renderer, &decomposition.resolved_filename);
        candidates.extend(locator.locate(template));
    }

    candidates
}
