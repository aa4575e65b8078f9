//! OpenAPI / Swagger: each definition rendered as one Markdown reference page.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use super::support::{invalid_config, missing, parse_structured, rel_path};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};

const STEMS: &[&str] = &["openapi", "swagger", "api"];
const EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
const METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch", "trace"];

pub struct OpenApiAdapter;

/// Definition files at the root or in `docs/`, in a fixed order.
fn definitions(docs_path: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in [docs_path.to_path_buf(), docs_path.join("docs")] {
        for stem in STEMS {
            for ext in EXTENSIONS {
                let path = dir.join(format!("{stem}.{ext}"));
                if path.is_file() {
                    found.push(path);
                }
            }
        }
    }
    found
}

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

fn schema_summary(schema: &Value) -> String {
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        return format!("`{}`", reference.rsplit('/').next().unwrap_or(reference));
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("array") => {
            let items = schema.get("items").map(schema_summary).unwrap_or_default();
            format!("array of {items}")
        }
        Some(ty) => format!("`{ty}`"),
        None => String::new(),
    }
}

/// Renders servers, endpoints, parameters, request bodies and responses.
fn render_definition(spec: &Value) -> String {
    let info = spec.get("info").cloned().unwrap_or(Value::Null);
    let title = match text(&info, "title") {
        "" => "API Documentation",
        t => t,
    };
    let mut out = format!("# {title}\n");
    let version = text(&info, "version");
    if !version.is_empty() {
        out.push_str(&format!("\nVersion: {version}\n"));
    }
    let description = text(&info, "description");
    if !description.is_empty() {
        out.push_str(&format!("\n{description}\n"));
    }

    if let Some(servers) = spec.get("servers").and_then(Value::as_array) {
        out.push_str("\n## Servers\n\n");
        for server in servers {
            let url = text(server, "url");
            match text(server, "description") {
                "" => out.push_str(&format!("- {url}\n")),
                d => out.push_str(&format!("- {url}: {d}\n")),
            }
        }
    } else if let Some(host) = spec.get("host").and_then(Value::as_str) {
        out.push_str(&format!("\n## Servers\n\n- {host}{}\n", text(spec, "basePath")));
    }

    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        return out;
    };
    out.push_str("\n## Endpoints\n");
    for (path, item) in paths {
        out.push_str(&format!("\n### `{path}`\n"));
        for method in METHODS {
            let Some(op) = item.get(*method) else {
                continue;
            };
            out.push_str(&format!("\n#### {}\n", method.to_uppercase()));
            for key in ["summary", "description"] {
                let t = text(op, key);
                if !t.is_empty() {
                    out.push_str(&format!("\n{t}\n"));
                }
            }
            if let Some(params) = op.get("parameters").and_then(Value::as_array) {
                out.push_str("\nParameters:\n\n");
                for param in params {
                    let required = if param.get("required").and_then(Value::as_bool) == Some(true) {
                        ", required"
                    } else {
                        ""
                    };
                    out.push_str(&format!(
                        "- `{}` ({}{required}) {}\n",
                        text(param, "name"),
                        text(param, "in"),
                        text(param, "description")
                    ));
                }
            }
            if let Some(body) = op.get("requestBody") {
                out.push_str("\nRequest body:\n\n");
                let d = text(body, "description");
                if !d.is_empty() {
                    out.push_str(&format!("{d}\n"));
                }
                if let Some(content) = body.get("content").and_then(Value::as_object) {
                    for (media, entry) in content {
                        let schema = entry.get("schema").map(schema_summary).unwrap_or_default();
                        out.push_str(&format!("- {media} {schema}\n"));
                    }
                }
            }
            if let Some(responses) = op.get("responses").and_then(Value::as_object) {
                out.push_str("\nResponses:\n\n");
                for (status, response) in responses {
                    out.push_str(&format!("- {status}: {}\n", text(response, "description")));
                }
            }
        }
    }
    out
}

impl Adapter for OpenApiAdapter {
    fn framework(&self) -> Framework {
        Framework::OpenApi
    }

    fn parse(&self, docs_path: &Path, _ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::OpenApi;
        let files = definitions(docs_path);
        if files.is_empty() {
            return Err(missing(fw, "openapi.yaml, swagger.json or api.yaml"));
        }

        let mut outcome = ParseOutcome::default();
        for path in files {
            info!(definition = %path.display(), "Rendering API definition");
            let spec = parse_structured(fw, docs_path, &path)?;
            if !spec.is_object() {
                return Err(invalid_config(fw, docs_path, &path, "expected a mapping"));
            }
            let rel = rel_path(docs_path, &path);
            let filename = rel_path(docs_path, &path.with_extension("md"));
            let content = render_definition(&spec);
            let title = content.lines().next().unwrap_or("").trim_start_matches("# ").to_string();
            outcome.push(
                DocumentRecord::new(fw.as_str(), filename, content)
                    .with_title(title)
                    .with_meta("source", rel),
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definition_lists_every_operation() {
        let spec = json!({
            "openapi": "3.0.0",
            "info": {"title": "Pets", "version": "1.0"},
            "servers": [{"url": "https://api.example.com", "description": "prod"}],
            "paths": {
                "/pets": {
                    "get": {
                        "summary": "List pets",
                        "parameters": [{"name": "limit", "in": "query", "required": false}],
                        "responses": {"200": {"description": "ok"}}
                    },
                    "post": {
                        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}},
                        "responses": {"201": {"description": "created"}}
                    }
                }
            }
        });
        let md = render_definition(&spec);
        assert!(md.starts_with("# Pets\n"));
        assert!(md.contains("- https://api.example.com: prod"));
        assert!(md.contains("#### GET"));
        assert!(md.contains("- `limit` (query) "));
        assert!(md.contains("- application/json `Pet`"));
        assert!(md.contains("- 201: created"));
    }
}
