//! Jupyter notebook (nbformat 4 JSON) → Markdown.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConversionFailure;

#[derive(Debug, Deserialize)]
struct Notebook {
    cells: Vec<Cell>,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: MultiLine,
    #[serde(default)]
    outputs: Vec<Value>,
}

/// nbformat allows text as a single string or a list of lines.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum MultiLine {
    #[default]
    Empty,
    Text(String),
    Lines(Vec<String>),
}

impl MultiLine {
    fn joined(&self) -> String {
        match self {
            MultiLine::Empty => String::new(),
            MultiLine::Text(s) => s.clone(),
            MultiLine::Lines(lines) => lines.concat(),
        }
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Array(lines) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

/// Converted notebook plus the kernel language, when declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedNotebook {
    pub markdown: String,
    pub language: Option<String>,
}

pub fn notebook_to_markdown(json: &str) -> Result<ConvertedNotebook, ConversionFailure> {
    let notebook: Notebook =
        serde_json::from_str(json).map_err(|e| ConversionFailure(format!("invalid notebook: {e}")))?;

    let language = notebook
        .metadata
        .pointer("/kernelspec/language")
        .or_else(|| notebook.metadata.pointer("/language_info/name"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let fence = language.as_deref().unwrap_or("");

    let mut blocks: Vec<String> = Vec::new();
    for cell in &notebook.cells {
        let source = cell.source.joined();
        let source = source.trim_end();
        match cell.cell_type.as_str() {
            "markdown" => {
                if !source.trim().is_empty() {
                    blocks.push(source.to_string());
                }
            }
            "code" => {
                if !source.trim().is_empty() {
                    blocks.push(format!("```{fence}\n{source}\n```"));
                }
                for output in &cell.outputs {
                    if let Some(text) = output_text(output) {
                        blocks.push(format!("```\n{}\n```", text.trim_end()));
                    }
                }
            }
            _ => {
                if !source.trim().is_empty() {
                    blocks.push(source.to_string());
                }
            }
        }
    }

    if blocks.is_empty() {
        return Err(ConversionFailure("notebook has no content".into()));
    }
    Ok(ConvertedNotebook {
        markdown: blocks.join("\n\n") + "\n",
        language,
    })
}

fn output_text(output: &Value) -> Option<String> {
    let text = match output.get("output_type").and_then(Value::as_str) {
        Some("stream") => output.get("text").map(value_text),
        Some("execute_result") | Some("display_data") => {
            output.pointer("/data/text~1plain").map(value_text)
        }
        Some("error") => {
            let name = output.get("ename").and_then(Value::as_str).unwrap_or("Error");
            let value = output.get("evalue").and_then(Value::as_str).unwrap_or("");
            Some(format!("{name}: {value}"))
        }
        _ => None,
    }?;
    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_markdown_code_and_stream_output() {
        let nb = r##"{
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": ["# Analysis\n", "Intro text"]},
                {"cell_type": "code", "metadata": {}, "source": "print('hi')",
                 "outputs": [{"output_type": "stream", "name": "stdout", "text": ["hi\n"]}]}
            ],
            "metadata": {"kernelspec": {"language": "python", "name": "python3"}},
            "nbformat": 4, "nbformat_minor": 5
        }"##;
        let out = notebook_to_markdown(nb).unwrap();
        assert_eq!(out.language.as_deref(), Some("python"));
        assert_eq!(
            out.markdown,
            "# Analysis\nIntro text\n\n```python\nprint('hi')\n```\n\n```\nhi\n```\n"
        );
    }

    #[test]
    fn rejects_invalid_json_and_missing_cells() {
        assert!(notebook_to_markdown("{not json").is_err());
        assert!(notebook_to_markdown(r#"{"metadata": {}}"#).is_err());
    }
}
