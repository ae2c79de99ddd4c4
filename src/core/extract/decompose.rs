//! Splits a component file into its script region and template tree.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::parsers::markup::{Element, Node, parse_markup};
use crate::core::parsers::script::ScriptSyntax;
use crate::utils::normalize_path;

/// Contents of the component's `<script>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRegion {
    pub code: String,
    /// Line of the component file on which `code` starts.
    pub start_line: usize,
    pub syntax: ScriptSyntax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub filename: String,
    pub script: Option<ScriptRegion>,
    /// Child nodes of the `<template>` block.
    pub template: Option<Vec<Node>>,
    /// File the template nodes came from: the component itself, or the file
    /// named by the template's `src` attribute.
    pub resolved_filename: String,
}

impl Decomposition {
    fn empty(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            script: None,
            template: None,
            resolved_filename: filename.to_string(),
        }
    }
}

pub fn decompose_file(path: &Path, verbose: bool) -> Result<Decomposition> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decompose_source(&source, &normalize_path(path), verbose))
}

/// Decompose component source. A document that cannot be parsed yields an
/// empty decomposition.
pub fn decompose_source(source: &str, filename: &str, verbose: bool) -> Decomposition {
    let nodes = match parse_markup(source) {
        Ok(nodes) => nodes,
        Err(e) => {
            if verbose {
                eprintln!(
                    "{} Skipping {}: {}",
                    "warning:".bold().yellow(),
                    filename,
                    e
                );
            }
            return Decomposition::empty(filename);
        }
    };

    let mut decomposition = Decomposition::empty(filename);
    decomposition.script = top_level(&nodes, "script").map(script_region);

    if let Some(template) = top_level(&nodes, "template") {
        let external = template
            .attr("src")
            .filter(|src| !src.value.is_empty())
            .and_then(|src| load_external_template(filename, &src.value, verbose));

        match external {
            Some((nodes, resolved)) => {
                decomposition.template = Some(nodes);
                decomposition.resolved_filename = resolved;
            }
            None => decomposition.template = Some(template.children.clone()),
        }
    }

    decomposition
}

fn top_level<'n>(nodes: &'n [Node], name: &str) -> Option<&'n Element> {
    nodes.iter().find_map(|node| match node {
        Node::Element(element) if element.name == name => Some(element),
        _ => None,
    })
}

fn script_region(script: &Element) -> ScriptRegion {
    let lang = script.attr("lang").map(|attr| attr.value.as_str());
    let (code, start_line) = match script.raw_text() {
        Some(text) => (text.value.clone(), text.start.line),
        None => (String::new(), script.start.line),
    };
    ScriptRegion {
        code,
        start_line,
        syntax: ScriptSyntax::from_lang(lang),
    }
}

fn load_external_template(filename: &str, src: &str, verbose: bool) -> Option<(Vec<Node>, String)> {
    let base = Path::new(filename).parent().unwrap_or(Path::new(""));
    let path = base.join(src);

    let loaded = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read template {}", path.display()))
        .and_then(|source| parse_markup(&source));

    match loaded {
        Ok(nodes) => Some((nodes, normalize_path(&path))),
        Err(e) => {
            if verbose {
                eprintln!(
                    "{} {} (using inline template of {})",
                    "warning:".bold().yellow(),
                    e,
                    filename
                );
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_decompose_component() {
        let source = r#"<template>
  <p>{{ $gettext('Hi') }}</p>
</template>

<script lang="ts">
export default {}
</script>

<style>
p { color: red; }
</style>
"#;
        let decomposition = decompose_source(source, "src/App.vue", false);

        let script = decomposition.script.unwrap();
        assert_eq!(script.code, "\nexport default {}\n");
        assert_eq!(script.start_line, 5);
        assert_eq!(script.syntax, ScriptSyntax::Typescript);

        let template = decomposition.template.unwrap();
        assert_eq!(template.len(), 3);
        assert_eq!(decomposition.resolved_filename, "src/App.vue");
    }

    #[test]
    fn test_missing_sections() {
        let decomposition = decompose_source("<div>no sections</div>", "a.vue", false);
        assert_eq!(decomposition.script, None);
        assert_eq!(decomposition.template, None);
    }

    #[test]
    fn test_unparsable_component_is_empty() {
        let decomposition = decompose_source("<template><p", "a.vue", false);
        assert_eq!(decomposition, Decomposition::empty("a.vue"));
    }

    #[test]
    fn test_external_template() {
        let dir = tempdir().unwrap();
        let components = dir.path().join("components");
        fs::create_dir_all(&components).unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(
            dir.path().join("templates").join("card.html"),
            "<div>\n<translate>External</translate>\n</div>",
        )
        .unwrap();
        let component = components.join("Card.vue");
        fs::write(
            &component,
            "<template src=\"../templates/card.html\"><p>inline</p></template>",
        )
        .unwrap();

        let decomposition = decompose_file(&component, false).unwrap();
        assert_eq!(
            decomposition.resolved_filename,
            normalize_path(&dir.path().join("templates").join("card.html"))
        );
        assert_eq!(decomposition.filename, normalize_path(&component));
        match &decomposition.template.unwrap()[0] {
            Node::Element(element) => assert_eq!(element.name, "div"),
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_external_template_falls_back_to_inline() {
        let decomposition = decompose_source(
            "<template src=\"./missing.html\"><p>inline</p></template>",
            "does/not/exist/Card.vue",
            false,
        );
        assert_eq!(decomposition.resolved_filename, "does/not/exist/Card.vue");
        assert_eq!(decomposition.template.unwrap().len(), 1);
    }
}
