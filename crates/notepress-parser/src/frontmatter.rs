//! Front-matter extraction and the metadata accessor: ---\nYAML\n---

use notepress_core::Metadata;
use regex::Regex;
use std::sync::LazyLock;

/// Matches YAML frontmatter: --- ... ---
static FRONTMATTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---\s*\n([\s\S]*?)\n---\s*(\n|$)").unwrap());

/// Extract YAML front-matter from content.
///
/// Returns the raw front-matter value (delimiters excluded) and the remaining
/// content. Content without a leading front-matter block comes back whole.
pub fn extract(content: &str) -> (Option<String>, &str) {
    if let Some(caps) = FRONTMATTER_PATTERN.captures(content) {
        let value = caps.get(1).unwrap().as_str().to_string();
        let rest = &content[caps.get(0).unwrap().end()..];
        (Some(value), rest)
    } else {
        (None, content)
    }
}

/// Decode a document's front-matter into a flat string map.
///
/// Scalars are stringified, sequences joined with `", "`, everything else
/// flattens to the empty string. Documents without front-matter, or with
/// front-matter that is not a YAML mapping, decode to an empty map.
pub fn metadata(content: &str) -> Metadata {
    let (Some(raw), _) = extract(content) else {
        return Metadata::new();
    };

    let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(&raw) else {
        return Metadata::new();
    };

    let Some(mapping) = value.as_mapping() else {
        return Metadata::new();
    };

    mapping
        .iter()
        .filter_map(|(k, v)| Some((k.as_str()?.to_string(), flatten(v))))
        .collect()
}

/// Extract a named key's value from a document's front-matter.
///
/// Returns the empty string when the key or the front-matter block is absent;
/// callers decide whether emptiness is a validation failure.
pub fn get_value(content: &str, key: &str) -> String {
    metadata(content).remove(key).unwrap_or_default()
}

fn flatten(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(flatten)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}
