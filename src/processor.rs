// src/processor.rs - Input side: one decoded ingest pipeline step
use crate::error::TranslationError;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;

/// Every processor kind the translator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Append,
    Convert,
    Csv,
    Date,
    Dissect,
    Fingerprint,
    Foreach,
    Geoip,
    Grok,
    Gsub,
    Json,
    Kv,
    Lowercase,
    Pipeline,
    Remove,
    Rename,
    Script,
    Set,
    Split,
    Trim,
    Uppercase,
    Urldecode,
    UriParts,
    UserAgent,
}

impl Operation {
    pub const ALL: [Operation; 24] = [
        Operation::Append,
        Operation::Convert,
        Operation::Csv,
        Operation::Date,
        Operation::Dissect,
        Operation::Fingerprint,
        Operation::Foreach,
        Operation::Geoip,
        Operation::Grok,
        Operation::Gsub,
        Operation::Json,
        Operation::Kv,
        Operation::Lowercase,
        Operation::Pipeline,
        Operation::Remove,
        Operation::Rename,
        Operation::Script,
        Operation::Set,
        Operation::Split,
        Operation::Trim,
        Operation::Uppercase,
        Operation::Urldecode,
        Operation::UriParts,
        Operation::UserAgent,
    ];

    /// Name as it appears in the pipeline document
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Append => "append",
            Operation::Convert => "convert",
            Operation::Csv => "csv",
            Operation::Date => "date",
            Operation::Dissect => "dissect",
            Operation::Fingerprint => "fingerprint",
            Operation::Foreach => "foreach",
            Operation::Geoip => "geoip",
            Operation::Grok => "grok",
            Operation::Gsub => "gsub",
            Operation::Json => "json",
            Operation::Kv => "kv",
            Operation::Lowercase => "lowercase",
            Operation::Pipeline => "pipeline",
            Operation::Remove => "remove",
            Operation::Rename => "rename",
            Operation::Script => "script",
            Operation::Set => "set",
            Operation::Split => "split",
            Operation::Trim => "trim",
            Operation::Uppercase => "uppercase",
            Operation::Urldecode => "urldecode",
            Operation::UriParts => "uri_parts",
            Operation::UserAgent => "user_agent",
        }
    }

    /// grok and dissect produce parse directives instead of map statements
    pub fn is_pattern_extraction(&self) -> bool {
        matches!(self, Operation::Grok | Operation::Dissect)
    }
}

impl FromStr for Operation {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| TranslationError::UnsupportedOperation {
                operation: s.to_string(),
            })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single pipeline step: the operation plus its named options
#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    pub operation: Operation,
    pub options: IndexMap<String, Value>,
}

impl Processor {
    pub fn new(operation: Operation) -> Self {
        Processor {
            operation,
            options: IndexMap::new(),
        }
    }

    /// Builder-style option setter, mostly for tests
    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    /// Decode `{operation: {options...}}`
    ///
    /// The mapping must have exactly one key, and that key must name a known
    /// operation.
    pub fn from_value(value: &Value) -> Result<Self, TranslationError> {
        let mapping = value.as_mapping().ok_or_else(|| {
            TranslationError::malformed("expected a mapping with a single operation key")
        })?;

        let mut entries = mapping.iter();
        let (key, body) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(TranslationError::malformed(format!(
                    "expected exactly one operation key, found {}",
                    mapping.len()
                )))
            }
        };

        let name = key
            .as_str()
            .ok_or_else(|| TranslationError::malformed("operation key must be a string"))?;
        let operation: Operation = name.parse()?;

        let options = match body {
            Value::Null => IndexMap::new(),
            Value::Mapping(map) => string_keyed(map)?,
            _ => {
                return Err(TranslationError::malformed(format!(
                    "options of '{}' must be a mapping",
                    name
                )))
            }
        };

        Ok(Processor { operation, options })
    }

    /// Option value, with an explicit `null` treated as absent
    pub fn get(&self, option: &str) -> Option<&Value> {
        self.options.get(option).filter(|v| !v.is_null())
    }

    pub fn has(&self, option: &str) -> bool {
        self.get(option).is_some()
    }

    pub fn str_opt(&self, option: &'static str) -> Result<Option<String>, TranslationError> {
        match self.get(option) {
            None => Ok(None),
            Some(value) => scalar_to_string(value)
                .map(Some)
                .ok_or_else(|| self.invalid(option, "a string")),
        }
    }

    pub fn require_str(&self, option: &'static str) -> Result<String, TranslationError> {
        self.str_opt(option)?.ok_or_else(|| self.missing(option))
    }

    /// Accepts either a single string or a list of strings
    pub fn str_or_list(&self, option: &'static str) -> Result<Option<Vec<String>>, TranslationError> {
        match self.get(option) {
            None => Ok(None),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    scalar_to_string(item).ok_or_else(|| self.invalid(option, "a list of strings"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(value) => scalar_to_string(value)
                .map(|s| Some(vec![s]))
                .ok_or_else(|| self.invalid(option, "a string or a list of strings")),
        }
    }

    /// Like `str_or_list`, with absence meaning an empty list
    pub fn str_list(&self, option: &'static str) -> Result<Vec<String>, TranslationError> {
        Ok(self.str_or_list(option)?.unwrap_or_default())
    }

    pub fn mapping_opt(&self, option: &'static str) -> Result<Option<&Mapping>, TranslationError> {
        match self.get(option) {
            None => Ok(None),
            Some(Value::Mapping(map)) => Ok(Some(map)),
            Some(_) => Err(self.invalid(option, "a mapping")),
        }
    }

    pub fn missing(&self, option: &'static str) -> TranslationError {
        TranslationError::MissingOption {
            operation: self.operation,
            option,
        }
    }

    pub fn invalid(&self, option: &'static str, expected: &'static str) -> TranslationError {
        TranslationError::InvalidOption {
            operation: self.operation,
            option,
            expected,
        }
    }
}

/// Render a YAML scalar the way it would read in the source document
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_keyed(map: &Mapping) -> Result<IndexMap<String, Value>, TranslationError> {
    map.iter()
        .map(|(k, v)| {
            let key = scalar_to_string(k)
                .ok_or_else(|| TranslationError::malformed("option names must be strings"))?;
            Ok((key, v.clone()))
        })
        .collect()
}
