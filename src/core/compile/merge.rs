//! Reconciles a language's translation catalog with the template catalog.
//!
//! The merge works on the generic tree form of both catalogs:
//!
//! 1. provenance (`comments.reference`, `comments.extracted`) is stripped from
//!    every translation entry, since the template owns it;
//! 2. the translation tree is deep-merged over the template tree, so
//!    translations, flags and plural forms win while the template supplies
//!    fresh references and comments;
//! 3. everything not present in the template is pruned.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

use crate::config::CompileConfig;
use crate::core::catalog::Catalog;
use crate::core::compile::projection::project_json;
use crate::core::parsers::po::load_catalog;
use crate::utils::normalize_path;

/// Outcome of merging one language, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCatalog {
    pub language: String,
    pub output_path: PathBuf,
    pub catalog: Catalog,
    /// JSON projection of `catalog`.
    pub json: Value,
    /// The translation catalog did not exist and was created from the template.
    pub seeded: bool,
}

/// Merge `<locales_dir>/<language>.po` with the template at `template_path`.
///
/// A missing or unreadable translation file is replaced by a copy of the
/// template first. Nothing is written besides that copy.
pub fn merge_language(
    language: &str,
    template_path: &Path,
    locales_dir: &Path,
    config: &CompileConfig,
    verbose: bool,
) -> Result<MergedCatalog> {
    let template = load_catalog(template_path).with_context(|| {
        format!(
            "Template catalog {} not found. Cannot compile PO files.",
            normalize_path(template_path)
        )
    })?;

    let output_path = locales_dir.join(format!("{}.po", language));
    let (translation, seeded) = match load_catalog(&output_path) {
        Ok(catalog) => (catalog, false),
        Err(_) => {
            if verbose {
                eprintln!(
                    "{} PO file for language \"{}\" not found in {}: creating it from the template",
                    "warning:".bold().yellow(),
                    language,
                    locales_dir.display()
                );
            }
            fs::copy(template_path, &output_path).with_context(|| {
                format!("Failed to create {} from template", output_path.display())
            })?;
            (load_catalog(&output_path)?, true)
        }
    };

    let canonical = template.to_tree()?;
    let merged = if config.join_existing {
        let mut existing = translation.to_tree()?;
        strip_provenance(&mut existing);
        let mut merged = deep_merge(canonical.clone(), existing);
        prune_to(&mut merged, &canonical);
        merged
    } else {
        canonical
    };

    let mut headers = translation.headers;
    if headers.language.is_empty() {
        headers.language = language.to_string();
    }

    let json = project_json(&merged, config.fuzzy_strings_in_json);
    let catalog = Catalog::from_tree(headers, merged)?;

    Ok(MergedCatalog {
        language: language.to_string(),
        output_path,
        catalog,
        json,
        seeded,
    })
}

/// Merge `right` into `left`.
///
/// Objects are merged key by key (keys only in `right` are appended), arrays
/// and scalars from `right` replace those in `left`.
pub fn deep_merge(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Object(mut left), Value::Object(right)) => {
            for (key, value) in right {
                let merged = match left.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                left.insert(key, merged);
            }
            Value::Object(left)
        }
        (_, right) => right,
    }
}

/// Remove `comments.reference` and `comments.extracted` from every entry of
/// a catalog tree.
pub fn strip_provenance(tree: &mut Value) {
    let Some(contexts) = tree.as_object_mut() else {
        return;
    };
    for entry in contexts
        .values_mut()
        .filter_map(Value::as_object_mut)
        .flat_map(|bucket| bucket.values_mut())
    {
        if let Some(comments) = entry.get_mut("comments").and_then(Value::as_object_mut) {
            comments.remove("reference");
            comments.remove("extracted");
        }
    }
}

/// Drop contexts and entries of `tree` that `canonical` does not have.
pub fn prune_to(tree: &mut Value, canonical: &Value) {
    let Some(contexts) = tree.as_object_mut() else {
        return;
    };
    contexts.retain(|context, _| canonical.get(context).is_some());
    for (context, bucket) in contexts.iter_mut() {
        if let (Some(bucket), Some(known)) = (bucket.as_object_mut(), canonical.get(context)) {
            bucket.retain(|text, _| known.get(text).is_some());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::core::catalog::{CatalogHeaders, MessageKey, SourceReference};
    use crate::core::parsers::po::save_catalog;

    const DE_PO: &str = r#"msgid ""
msgstr ""
"Language: de\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"

#. stale comment
#: src/Old.vue:99
msgid "Hello"
msgstr "Hallo"

#, fuzzy
msgctxt "menu"
msgid "Open"
msgstr "Öffnen"

msgid "Removed"
msgstr "Entfernt"
"#;

    fn template() -> Catalog {
        let mut catalog = Catalog::new(CatalogHeaders::template());
        catalog.add_occurrence(
            &MessageKey::new("Hello"),
            SourceReference::new("src/App.vue", 3),
            ["greeting".to_string()],
        );
        catalog.add_occurrence(
            &MessageKey::new("Open").with_context("menu"),
            SourceReference::new("src/Menu.vue", 8),
            [],
        );
        catalog.add_occurrence(
            &MessageKey::new("New"),
            SourceReference::new("src/App.vue", 9),
            [],
        );
        catalog
    }

    fn setup(po: Option<&str>) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("messages.pot");
        save_catalog(&template(), &template_path).unwrap();
        if let Some(po) = po {
            fs::write(dir.path().join("de.po"), po).unwrap();
        }
        (dir, template_path)
    }

    #[test]
    fn test_merge_preserves_translations_and_refreshes_provenance() {
        let (dir, template_path) = setup(Some(DE_PO));
        let merged = merge_language(
            "de",
            &template_path,
            dir.path(),
            &CompileConfig::default(),
            false,
        )
        .unwrap();

        let hello = merged.catalog.get("", "Hello").unwrap();
        assert_eq!(hello.translations, vec!["Hallo"]);
        assert_eq!(
            hello.comments.reference,
            vec![SourceReference::new("src/App.vue", 3)]
        );
        assert_eq!(hello.comments.extracted, vec!["greeting"]);

        let open = merged.catalog.get("menu", "Open").unwrap();
        assert_eq!(open.translations, vec!["Öffnen"]);
        assert!(open.is_fuzzy());

        assert_eq!(merged.catalog.get("", "New").unwrap().translations, vec![""]);
        assert!(merged.catalog.get("", "Removed").is_none());
        assert_eq!(merged.catalog.len(), 3);
        assert_eq!(merged.catalog.headers.language, "de");
        assert!(!merged.seeded);
        assert_eq!(merged.output_path, dir.path().join("de.po"));
    }

    #[test]
    fn test_merge_without_join_uses_template() {
        let (dir, template_path) = setup(Some(DE_PO));
        let config = CompileConfig {
            join_existing: false,
            ..Default::default()
        };
        let merged = merge_language("de", &template_path, dir.path(), &config, false).unwrap();

        assert_eq!(merged.catalog.get("", "Hello").unwrap().translations, vec![""]);
        assert_eq!(merged.catalog.headers.language, "de");
    }

    #[test]
    fn test_missing_translation_is_seeded_from_template() {
        let (dir, template_path) = setup(None);
        let merged = merge_language(
            "fr",
            &template_path,
            dir.path(),
            &CompileConfig::default(),
            false,
        )
        .unwrap();

        assert!(merged.seeded);
        assert!(dir.path().join("fr.po").exists());
        assert_eq!(merged.catalog.len(), 3);
        assert_eq!(merged.catalog.headers.language, "fr");
    }

    #[test]
    fn test_missing_template_fails() {
        let dir = tempdir().unwrap();
        let err = merge_language(
            "de",
            &dir.path().join("missing.pot"),
            dir.path(),
            &CompileConfig::default(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cannot compile PO files"));
    }

    #[test]
    fn test_deep_merge_rules() {
        let left = json!({
            "a": {"x": 1, "list": [1, 2, 3], "nested": {"keep": true}},
            "b": "left"
        });
        let right = json!({
            "a": {"x": 2, "list": [9], "nested": {"add": 1}},
            "b": {"now": "object"},
            "c": null
        });
        assert_eq!(
            deep_merge(left, right),
            json!({
                "a": {"x": 2, "list": [9], "nested": {"keep": true, "add": 1}},
                "b": {"now": "object"},
                "c": null
            })
        );
    }

    #[test]
    fn test_strip_and_prune() {
        let mut tree = json!({
            "": {
                "a": {"msgid": "a", "comments": {"reference": ["x:1"], "extracted": ["c"], "flag": ["fuzzy"]}},
                "gone": {"msgid": "gone"}
            },
            "old": {"b": {"msgid": "b"}}
        });
        strip_provenance(&mut tree);
        prune_to(&mut tree, &json!({"": {"a": {}}}));
        assert_eq!(
            tree,
            json!({"": {"a": {"msgid": "a", "comments": {"flag": ["fuzzy"]}}}})
        );
    }
}
