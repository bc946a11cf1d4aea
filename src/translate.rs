// src/translate.rs
pub mod builder;
pub mod config;
pub mod date_format;
pub mod dispatch;
pub mod guard;
pub mod pattern;
pub mod special_fields;

use crate::decoder::{Decoder, NormalizeBlock};
use crate::error::{DecodeError, DocumentError, ProcessorFailure, TranslationError};
use crate::processor::Processor;
use builder::BlockBuilder;
use config::TranslateConfig;
use serde_yaml::Value;

/// Translate a whole pipeline document (`{processors: [...]}`) into a decoder
pub fn translate_document(document: &Value, config: &TranslateConfig) -> Result<Decoder, DecodeError> {
    let processors = document
        .get("processors")
        .ok_or(DocumentError::MissingProcessors)?
        .as_sequence()
        .ok_or(DocumentError::ProcessorsNotSequence)?;

    let normalize = translate_processors(processors, config)?;
    tracing::info!(
        processors = processors.len(),
        blocks = normalize.len(),
        "pipeline translated"
    );

    Ok(Decoder {
        normalize,
        parse_style: config.parse_style,
    })
}

/// Single pass over the processors; the first fault aborts the whole pass
pub fn translate_processors(
    processors: &[Value],
    config: &TranslateConfig,
) -> Result<Vec<NormalizeBlock>, ProcessorFailure> {
    let mut builder = BlockBuilder::new();

    for (index, raw) in processors.iter().enumerate() {
        translate_one(raw, config, &mut builder).map_err(|source| ProcessorFailure {
            index,
            operation: operation_name(raw),
            processor: raw.clone(),
            source,
        })?;
    }

    Ok(builder.finish())
}

fn translate_one(
    raw: &Value,
    config: &TranslateConfig,
    builder: &mut BlockBuilder,
) -> Result<(), TranslationError> {
    let processor = Processor::from_value(raw)?;
    let processor = special_fields::normalize_special_fields(processor, config);
    tracing::debug!(operation = %processor.operation, "translating processor");

    let entries = dispatch::translate(&processor, config)?;
    let guard = guard::translate_guard(&processor)?;
    let parse = pattern::parse_directive(&processor)?;

    builder.push(guard, parse, entries);
    Ok(())
}

/// Best-effort operation name for diagnostics, even for malformed input
fn operation_name(raw: &Value) -> String {
    raw.as_mapping()
        .and_then(|m| m.keys().next())
        .and_then(|k| k.as_str())
        .unwrap_or("<unknown>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_failure_carries_processor_context() {
        let doc = document(
            r#"
processors:
  - set: {field: a, value: "1"}
  - unknown_op: {field: b}
"#,
        );
        let err = translate_document(&doc, &TranslateConfig::default()).unwrap_err();
        match err {
            DecodeError::Processor(failure) => {
                assert_eq!(failure.index, 1);
                assert_eq!(failure.operation, "unknown_op");
                assert!(failure.dump().contains("\"unknown_op\""));
                assert!(matches!(
                    failure.source,
                    TranslationError::UnsupportedOperation { .. }
                ));
            }
            other => panic!("Expected processor failure, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_processors_key() {
        let err = translate_document(&document("description: nothing"), &TranslateConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Document(DocumentError::MissingProcessors)
        ));
    }

    #[test]
    fn test_processors_must_be_sequence() {
        let err = translate_document(&document("processors: {set: {}}"), &TranslateConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Document(DocumentError::ProcessorsNotSequence)
        ));
    }

    #[test]
    fn test_timestamp_marker_normalized_before_dispatch() {
        let doc = document("processors:\n  - date: {field: '@timestamp', formats: [yyyy]}\n");
        let decoder = translate_document(&doc, &TranslateConfig::default()).unwrap();
        let map = decoder.normalize[0].map().unwrap();
        assert_eq!(
            serde_json::to_value(&map[0]).unwrap(),
            serde_json::json!({"event.start": "parse_date($event.start, %Y,en_US.UTF-8)"})
        );
    }
}
