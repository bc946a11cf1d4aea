use crate::decoder::GuardCondition;
use crate::error::TranslationError;
use crate::processor::Processor;

const CONTAINS_CALL: &str = ".contains(";

/// Derive the `check` condition for a processor, if any.
///
/// Pattern extraction is only attempted when its source field exists; other
/// processors are gated by their `if` expression, rewritten into the target
/// condition syntax.
pub fn translate_guard(processor: &Processor) -> Result<Option<GuardCondition>, TranslationError> {
    if processor.operation.is_pattern_extraction() {
        let field = processor.require_str("field")?;
        return Ok(Some(GuardCondition(format!("exists(${})", field))));
    }

    Ok(processor
        .str_opt("if")?
        .map(|condition| GuardCondition(translate_condition(&condition))))
}

/// Rewrite one painless-style boolean expression
pub fn translate_condition(condition: &str) -> String {
    let cleaned = condition
        .replace("ctx.", "")
        .replace("ctx?.", "")
        .replace('?', "")
        .replace("&&", "AND")
        .replace("||", "OR");

    if let Some((field, value)) = cleaned.split_once(CONTAINS_CALL) {
        let value = value.strip_suffix(')').unwrap_or(value);
        return format!("contains(${}, {})", field.trim(), value.trim());
    }

    if let Some((field, value)) = cleaned.split_once("==") {
        return format!("${} == {}", field.trim(), value.trim());
    }

    cleaned
}
