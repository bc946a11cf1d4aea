use crate::decoder::ParseDirective;
use crate::error::TranslationError;
use crate::processor::{scalar_to_string, Operation, Processor};

const TOKEN_OPEN: &str = "%{";
const TOKEN_CLOSE: char = '}';

/// Rewrite every `%{...}` extraction token as `<...>`.
///
/// Each opener is paired with the next `}`; braces outside a token (regex
/// quantifiers, literal text) are left alone, as is an opener that is never
/// closed.
pub fn translate_delimiters(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find(TOKEN_OPEN) {
        let body_start = start + TOKEN_OPEN.len();
        match rest[body_start..].find(TOKEN_CLOSE) {
            Some(len) => {
                out.push_str(&rest[..start]);
                out.push('<');
                out.push_str(&rest[body_start..body_start + len]);
                out.push('>');
                rest = &rest[body_start + len + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Build the parse directive for grok/dissect; every other operation has none
pub fn parse_directive(processor: &Processor) -> Result<Option<ParseDirective>, TranslationError> {
    let patterns = match processor.operation {
        Operation::Grok => grok_patterns(processor)?,
        Operation::Dissect => processor
            .str_opt("pattern")?
            .filter(|p| !p.is_empty())
            .map(|p| vec![translate_delimiters(&p)])
            .unwrap_or_default(),
        _ => return Ok(None),
    };

    if patterns.is_empty() {
        return Ok(None);
    }

    Ok(Some(ParseDirective {
        field: processor.require_str("field")?,
        patterns,
    }))
}

fn grok_patterns(processor: &Processor) -> Result<Vec<String>, TranslationError> {
    let mut patterns: Vec<String> = processor
        .str_list("patterns")?
        .iter()
        .map(|p| translate_delimiters(p))
        .collect();

    if let Some(definitions) = processor.mapping_opt("pattern_definitions")? {
        for (name, definition) in definitions {
            let (name, definition) = match (scalar_to_string(name), scalar_to_string(definition)) {
                (Some(n), Some(d)) => (n, d),
                _ => {
                    return Err(processor.invalid("pattern_definitions", "a mapping of names to patterns"))
                }
            };
            let definition = translate_delimiters(&definition);
            for pattern in &mut patterns {
                *pattern = pattern.replace(&name, &definition);
            }
        }
    }

    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn processor(src: &str) -> Processor {
        let value: Value = serde_yaml::from_str(src).unwrap();
        Processor::from_value(&value).unwrap()
    }

    #[test]
    fn test_translate_delimiters() {
        assert_eq!(translate_delimiters("%{ts} %{msg}"), "<ts> <msg>");
        assert_eq!(
            translate_delimiters("%{IP:client.ip} - %{NUMBER:bytes:int}"),
            "<IP:client.ip> - <NUMBER:bytes:int>"
        );
        assert_eq!(translate_delimiters("no tokens"), "no tokens");
    }

    #[test]
    fn test_braces_outside_tokens_untouched() {
        assert_eq!(translate_delimiters("%{a} \\d{2} %{b}"), "<a> \\d{2} <b>");
        assert_eq!(translate_delimiters("%{a} %{unclosed"), "<a> %{unclosed");
    }

    #[test]
    fn test_dissect_directive() {
        let directive = parse_directive(&processor(
            "dissect: {field: message, pattern: '%{ts} %{msg}'}",
        ))
        .unwrap()
        .unwrap();
        assert_eq!(directive.field, "message");
        assert_eq!(directive.patterns, vec!["<ts> <msg>"]);
    }

    #[test]
    fn test_dissect_empty_pattern() {
        assert!(parse_directive(&processor("dissect: {field: message, pattern: ''}"))
            .unwrap()
            .is_none());
        assert!(parse_directive(&processor("dissect: {field: message}"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_grok_with_definitions() {
        let directive = parse_directive(&processor(
            r#"
grok:
  field: event.original
  patterns:
    - "%{MYTS:ts} %{GREEDYDATA:msg}"
    - "%{GREEDYDATA:msg}"
  pattern_definitions:
    MYTS: "%{YEAR}-%{MONTHNUM}"
"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(directive.field, "event.original");
        assert_eq!(
            directive.patterns,
            vec!["<<YEAR>-<MONTHNUM>:ts> <GREEDYDATA:msg>", "<GREEDYDATA:msg>"]
        );
    }

    #[test]
    fn test_grok_without_patterns() {
        assert!(parse_directive(&processor("grok: {field: message}"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_other_operations_have_no_directive() {
        assert!(parse_directive(&processor("lowercase: {field: a}"))
            .unwrap()
            .is_none());
    }
}
