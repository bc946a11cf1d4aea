//! Reading pipeline documents and rendering decoder documents.

use crate::decoder::Decoder;
use crate::error::DocumentError;
use crate::output_format::OutputFormat;
use serde_yaml::Value;
use std::path::Path;

/// Parse a pipeline document (YAML or JSON).
///
/// Custom tags such as `!include foo` are dropped and their values kept as
/// plain data.
pub fn load_document(content: &str) -> Result<Value, DocumentError> {
    let value: Value = serde_yaml::from_str(content)?;
    Ok(strip_tags(value))
}

pub fn read_document(path: &Path) -> Result<Value, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DocumentError::NotFound(path.to_path_buf())
        } else {
            DocumentError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    load_document(&content)
}

fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_tags).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (strip_tags(k), strip_tags(v)))
                .collect(),
        ),
        other => other,
    }
}

pub fn render(decoder: &Decoder, format: OutputFormat) -> Result<String, DocumentError> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(decoder).map_err(|e| DocumentError::Render(e.to_string()))
        }
        OutputFormat::Json => serde_json::to_string_pretty(decoder)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| DocumentError::Render(e.to_string())),
    }
}
