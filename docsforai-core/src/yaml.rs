//! Tolerant YAML loading.
//!
//! Framework configs routinely carry application-specific tags
//! (`!!python/name:...`, `!ENV [...]`, `!relative`). They are parsed as opaque
//! values and the tag is dropped; nothing is resolved or executed.

use serde_json::{Map, Number, Value as Json};
use serde_yaml::Value as Yaml;

/// Parses YAML, strips every tag, and returns the document as JSON.
/// An empty document yields `Null`.
pub fn from_str_lenient(text: &str) -> Result<Json, serde_yaml::Error> {
    let yaml: Yaml = serde_yaml::from_str(text)?;
    Ok(to_json(yaml))
}

fn key_string(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "null".to_string(),
        Yaml::Tagged(t) => key_string(t.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn to_json(value: Yaml) -> Json {
    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Json::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
        }
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(items) => Json::Array(items.into_iter().map(to_json).collect()),
        Yaml::Mapping(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(key_string(k), to_json(v));
            }
            Json::Object(out)
        }
        Yaml::Tagged(tagged) => to_json(tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_become_plain_values() {
        let text = r#"
site_name: Demo
markdown_extensions:
  - pymdownx.emoji:
      emoji_index: !!python/name:material.extensions.emoji.twemoji
extra:
  token: !ENV [DOCS_TOKEN, "none"]
"#;
        let json = from_str_lenient(text).unwrap();
        assert_eq!(json["site_name"], "Demo");
        let emoji = &json["markdown_extensions"][0]["pymdownx.emoji"]["emoji_index"];
        assert!(emoji.is_null() || emoji == "");
        assert_eq!(json["extra"]["token"][1], "none");
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let json = from_str_lenient("200: ok\ntrue: yes\n").unwrap();
        assert_eq!(json["200"], "ok");
        assert_eq!(json["true"], "yes");
    }
}
