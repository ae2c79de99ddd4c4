use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, GLOBALS, Globals, SourceMap, Spanned,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments copied out of `SingleThreadedComments` so they outlive the parser.
#[derive(Debug, Clone)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Must be called before `SingleThreadedComments` is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// All comments, each once, in source order.
    pub fn all(&self) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self
            .leading
            .values()
            .chain(self.trailing.values())
            .flatten()
            .collect();
        comments.sort_by_key(|comment| comment.span.lo);
        comments.dedup_by_key(|comment| comment.span.lo);
        comments
    }
}

/// Script dialect used to parse a piece of code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptSyntax {
    /// JavaScript with JSX enabled.
    #[default]
    Ecmascript,
    Typescript,
    Tsx,
}

impl ScriptSyntax {
    pub fn from_extension(extension: &str) -> Self {
        match extension.trim_start_matches('.') {
            "ts" | "mts" | "cts" => Self::Typescript,
            "tsx" => Self::Tsx,
            _ => Self::Ecmascript,
        }
    }

    /// Dialect of a component `<script lang="...">` block.
    pub fn from_lang(lang: Option<&str>) -> Self {
        lang.map(Self::from_extension).unwrap_or_default()
    }

    fn to_swc(self) -> Syntax {
        match self {
            Self::Ecmascript => Syntax::Es(EsSyntax {
                jsx: true,
                ..Default::default()
            }),
            Self::Typescript => Syntax::Typescript(TsSyntax::default()),
            Self::Tsx => Syntax::Typescript(TsSyntax {
                tsx: true,
                ..Default::default()
            }),
        }
    }
}

pub struct ParsedScript {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
}

/// Parse script source code into a module.
///
/// Every call gets its own `SourceMap`, so line lookups are relative to `code`.
pub fn parse_script_source(
    code: String,
    file_path: &str,
    syntax: ScriptSyntax,
) -> Result<ParsedScript> {
    let source_map: Arc<SourceMap> = Arc::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax.to_swc(),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser.parse_module().map_err(|e| {
            let line = source_map.lookup_char_pos(e.span().lo).line;
            anyhow!(
                "Failed to parse {} at line {}: {:?}",
                file_path,
                line,
                e.kind()
            )
        })?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedScript {
            module,
            source_map: source_map.clone(),
            comments: extracted_comments,
        })
    })
}
