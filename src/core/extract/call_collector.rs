//! Collects translation calls from a parsed script.
//!
//! Walks the module once, matches every call's callee against the compiled
//! [`CallPatterns`] and reads the message arguments when they are string
//! literals. Extraction comments are attached by line: comments on the same
//! line before the call, on the comment lines directly above it, and on the
//! same line after it.

use swc_common::{BytePos, SourceMap, comments::Comment};
use swc_ecma_ast::{BinaryOp, CallExpr, Callee, Expr, Lit, MemberProp, Module};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::catalog::{MessageKey, SourceReference};
use crate::core::extract::patterns::{CallPattern, CallPatterns, CalleeSegment};
use crate::core::parsers::script::ParsedScript;

/// How many comment lines above a call are considered.
const MAX_COMMENT_CHAIN_LINES: usize = 10;

/// One recognized translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub key: MessageKey,
    pub reference: SourceReference,
    pub comments: Vec<String>,
}

#[derive(Debug)]
struct LocatedComment {
    lo: BytePos,
    hi: BytePos,
    start_line: usize,
    end_line: usize,
    own_line: bool,
    text: String,
}

pub struct CallCollector<'a> {
    filename: &'a str,
    /// Added to snippet-relative lines to get file lines.
    line_offset: usize,
    source_map: &'a SourceMap,
    patterns: &'a CallPatterns,
    comments: Vec<LocatedComment>,
    messages: Vec<ExtractedMessage>,
}

impl<'a> CallCollector<'a> {
    /// `start_line` is the file line on which the parsed code begins.
    pub fn new(
        parsed: &'a ParsedScript,
        filename: &'a str,
        start_line: usize,
        patterns: &'a CallPatterns,
    ) -> Self {
        let source_map: &SourceMap = &parsed.source_map;
        let comments = parsed
            .comments
            .all()
            .into_iter()
            .map(|comment| locate_comment(source_map, comment))
            .collect();

        Self {
            filename,
            line_offset: start_line.saturating_sub(1),
            source_map,
            patterns,
            comments,
            messages: Vec::new(),
        }
    }

    pub fn collect(mut self, module: &Module) -> Vec<ExtractedMessage> {
        module.visit_with(&mut self);
        self.messages
    }

    fn collect_call(&mut self, node: &CallExpr, pattern: &CallPattern) {
        let argument = |index: usize| {
            node.args
                .get(index)
                .filter(|arg| arg.spread.is_none())
                .and_then(|arg| string_value(&arg.expr))
        };

        let Some(text) = argument(pattern.arguments.text) else {
            return;
        };
        if text.is_empty() {
            return;
        }

        let mut key = MessageKey::new(text);
        if let Some(index) = pattern.arguments.context {
            let Some(context) = argument(index) else {
                return;
            };
            key = key.with_context(context);
        }
        if let Some(index) = pattern.arguments.plural {
            let Some(plural) = argument(index) else {
                return;
            };
            key = key.with_plural(plural);
        }

        let start = self.source_map.lookup_char_pos(node.span.lo);
        let end_line = self.source_map.lookup_char_pos(node.span.hi).line;
        let comments = self.attached_comments(node.span.lo, node.span.hi, start.line, end_line);

        self.messages.push(ExtractedMessage {
            key,
            reference: SourceReference::new(self.filename, start.line + self.line_offset),
            comments,
        });
    }

    fn attached_comments(
        &self,
        lo: BytePos,
        hi: BytePos,
        start_line: usize,
        end_line: usize,
    ) -> Vec<String> {
        let mut attached: Vec<&LocatedComment> = self
            .comments
            .iter()
            .filter(|c| {
                (c.hi <= lo && c.end_line == start_line) || (c.lo >= hi && c.start_line == end_line)
            })
            .collect();

        let mut target = start_line.saturating_sub(1);
        for _ in 0..MAX_COMMENT_CHAIN_LINES {
            let above: Vec<&LocatedComment> = self
                .comments
                .iter()
                .filter(|c| c.hi <= lo && c.own_line && c.end_line == target)
                .collect();
            let Some(top) = above.iter().map(|c| c.start_line).min() else {
                break;
            };
            attached.extend(above);
            target = top.saturating_sub(1);
        }

        attached.sort_by_key(|c| c.lo);
        attached.dedup_by_key(|c| c.lo);
        attached
            .into_iter()
            .filter_map(|c| self.patterns.extraction_comment(&c.text))
            .collect()
    }
}

impl Visit for CallCollector<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Some(segments) = callee_segments(callee)
            && let Some(pattern) = self.patterns.find(&segments).cloned()
        {
            self.collect_call(node, &pattern);
        }

        node.visit_children_with(self);
    }
}

fn locate_comment(source_map: &SourceMap, comment: &Comment) -> LocatedComment {
    let start = source_map.lookup_char_pos(comment.span.lo);
    let end_line = source_map.lookup_char_pos(comment.span.hi).line;
    let own_line = start
        .file
        .get_line(start.line - 1)
        .is_some_and(|line| line.chars().take(start.col.0).all(char::is_whitespace));

    LocatedComment {
        lo: comment.span.lo,
        hi: comment.span.hi,
        start_line: start.line,
        end_line,
        own_line,
        text: comment.text.to_string(),
    }
}

/// Callee as a chain of `this`/name segments; `None` for computed members
/// and anything that is not a plain identifier or member chain.
fn callee_segments(expr: &Expr) -> Option<Vec<CalleeSegment>> {
    match expr {
        Expr::Ident(ident) => Some(vec![CalleeSegment::Name(ident.sym.to_string())]),
        Expr::This(_) => Some(vec![CalleeSegment::This]),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let mut segments = callee_segments(&member.obj)?;
            segments.push(CalleeSegment::Name(prop.sym.to_string()));
            Some(segments)
        }
        Expr::Paren(paren) => callee_segments(&paren.expr),
        _ => None,
    }
}

/// Static string value of a literal, a substitution-free template literal,
/// or a `+` concatenation of those.
fn string_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .iter()
            .map(|quasi| quasi.cooked.as_ref().and_then(|s| s.as_str()))
            .collect::<Option<Vec<&str>>>()
            .map(|parts| parts.concat()),
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            Some(string_value(&bin.left)? + string_value(&bin.right)?.as_str())
        }
        Expr::Paren(paren) => string_value(&paren.expr),
        _ => None,
    }
}
