use crate::processor::Processor;
use crate::translate::config::TranslateConfig;
use serde_yaml::Value;

/// Rewrite well-known field references before anything else looks at them.
///
/// Currently only the timestamp marker in `field` is mapped onto the
/// event-time field.
pub fn normalize_special_fields(mut processor: Processor, config: &TranslateConfig) -> Processor {
    if let Some(field) = processor.options.get_mut("field") {
        if field.as_str() == Some(config.timestamp_marker.as_str()) {
            *field = Value::String(config.event_time_field.clone());
        }
    }
    processor
}
