//! JSON projection of a merged catalog tree, as consumed at runtime.

use serde_json::{Map, Value};

use crate::core::catalog::FUZZY_FLAG;

/// Key that replaces the empty context in JSON output.
pub const NO_CONTEXT_KEY: &str = "$$NOCONTEXT";

/// Project a catalog tree to its runtime JSON form.
///
/// The empty context is renamed to [`NO_CONTEXT_KEY`], the header entry and
/// every `comments` object are removed, and fuzzy entries are dropped unless
/// `include_fuzzy` is set.
pub fn project_json(tree: &Value, include_fuzzy: bool) -> Value {
    let Some(contexts) = tree.as_object() else {
        return Value::Object(Map::new());
    };

    let mut projected = Map::new();
    for (context, bucket) in contexts {
        let Some(bucket) = bucket.as_object() else {
            continue;
        };
        let mut entries = Map::new();
        for (text, entry) in bucket {
            if text.is_empty() || (!include_fuzzy && is_fuzzy(entry)) {
                continue;
            }
            let mut entry = entry.clone();
            if let Some(fields) = entry.as_object_mut() {
                fields.remove("comments");
            }
            entries.insert(text.clone(), entry);
        }

        let key = if context.is_empty() {
            NO_CONTEXT_KEY.to_string()
        } else {
            context.clone()
        };
        projected.insert(key, Value::Object(entries));
    }
    Value::Object(projected)
}

fn is_fuzzy(entry: &Value) -> bool {
    entry
        .pointer("/comments/flag")
        .and_then(Value::as_array)
        .is_some_and(|flags| flags.iter().any(|f| f.as_str() == Some(FUZZY_FLAG)))
}
