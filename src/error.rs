use crate::processor::Operation;
use std::path::PathBuf;

/// Fault raised while translating a single processor
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Unknown processor type: {operation}")]
    UnsupportedOperation { operation: String },

    #[error("Malformed processor: {reason}")]
    MalformedProcessor { reason: String },

    #[error("Processor '{operation}' is missing required option '{option}'")]
    MissingOption {
        operation: Operation,
        option: &'static str,
    },

    #[error("Option '{option}' of processor '{operation}' must be {expected}")]
    InvalidOption {
        operation: Operation,
        option: &'static str,
        expected: &'static str,
    },
}

impl TranslationError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        TranslationError::MalformedProcessor {
            reason: reason.into(),
        }
    }
}

/// A translation fault together with the processor that caused it
#[derive(Debug, thiserror::Error)]
#[error("Failed to translate processor #{index} ('{operation}'): {source}")]
pub struct ProcessorFailure {
    pub index: usize,
    pub operation: String,
    pub processor: serde_yaml::Value,
    #[source]
    pub source: TranslationError,
}

impl ProcessorFailure {
    /// Pretty-printed rendering of the failing processor for diagnostics
    pub fn dump(&self) -> String {
        // JSON needs string keys; fall back to YAML for anything else
        serde_json::to_string_pretty(&self.processor)
            .or_else(|_| serde_yaml::to_string(&self.processor))
            .unwrap_or_else(|e| format!("<unprintable processor: {}>", e))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("File '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Document has no 'processors' key")]
    MissingProcessors,

    #[error("'processors' must be a sequence")]
    ProcessorsNotSequence,

    #[error("Failed to render output: {0}")]
    Render(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in '{}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Anything that can stop a whole document from being translated
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Processor(#[from] ProcessorFailure),
}
