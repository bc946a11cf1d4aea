// src/translate/date_format.rs - Java-style date patterns to strftime
use chrono::format::{Item, StrftimeItems};
use once_cell::sync::Lazy;
use regex::Regex;

/// Named formats understood by both sides as-is
const NAMED_FORMATS: &[&str] = &["ISO8601", "UNIX", "UNIX_MS", "TAI64N"];

// Alternation order matters: longer tokens must win over their prefixes.
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"'(?:[^']|'')*'|%-?[A-Za-z%]|yyyy|MMMM|EEEE|MMM|EEE|yy|MM|dd|HH|hh|mm|ss|M|d|H|h|m|s|a|[A-Za-z]",
    )
    .expect("date token regex is valid")
});

/// Result of translating one date pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pub strftime: String,
    /// Source tokens with no strftime counterpart, copied through verbatim
    pub unsupported: Vec<String>,
}

/// strftime directive for a source token
fn strftime_token(token: &str) -> Option<&'static str> {
    let directive = match token {
        "yyyy" => "%Y",
        "yy" => "%y",
        "MMMM" => "%B",
        "MMM" => "%b",
        "MM" => "%m",
        "M" => "%-m",
        "dd" => "%d",
        "d" => "%-d",
        "HH" => "%H",
        "H" => "%-H",
        "hh" => "%I",
        "h" => "%-I",
        "mm" => "%M",
        "m" => "%-M",
        "ss" => "%S",
        "s" => "%-S",
        "a" => "%p",
        "EEEE" => "%A",
        "EEE" => "%a",
        _ => return None,
    };
    Some(directive)
}

pub fn to_strftime(format: &str) -> String {
    translate(format).strftime
}

/// Translate in a single left-to-right pass.
///
/// Already-translated `%` directives and quoted literals are never rescanned,
/// so a replacement can't be matched again by a shorter token.
pub fn translate(format: &str) -> DateFormat {
    if NAMED_FORMATS.contains(&format) {
        return DateFormat {
            strftime: format.to_string(),
            unsupported: Vec::new(),
        };
    }

    let mut strftime = String::with_capacity(format.len() + 8);
    let mut unsupported: Vec<String> = Vec::new();
    let mut last = 0;

    for m in TOKEN_REGEX.find_iter(format) {
        strftime.push_str(&format[last..m.start()]);
        let token = m.as_str();

        if token.starts_with('\'') {
            strftime.push_str(&quoted_literal(token));
        } else if token.starts_with('%') {
            strftime.push_str(token);
        } else if let Some(directive) = strftime_token(token) {
            strftime.push_str(directive);
        } else {
            strftime.push_str(token);
            if !unsupported.iter().any(|t| t == token) {
                unsupported.push(token.to_string());
            }
        }
        last = m.end();
    }
    strftime.push_str(&format[last..]);

    DateFormat {
        strftime,
        unsupported,
    }
}

/// `'T'` -> `T`, `''` -> `'`
fn quoted_literal(token: &str) -> String {
    let inner = &token[1..token.len() - 1];
    if inner.is_empty() {
        return "'".to_string();
    }
    inner.replace("''", "'").replace('%', "%%")
}

/// Problems a strftime consumer would trip over, as human-readable findings
pub fn lint(format: &DateFormat) -> Vec<String> {
    let mut findings: Vec<String> = format
        .unsupported
        .iter()
        .map(|token| format!("date token '{}' has no strftime equivalent", token))
        .collect();

    if !NAMED_FORMATS.contains(&format.strftime.as_str())
        && StrftimeItems::new(&format.strftime).any(|item| matches!(item, Item::Error))
    {
        findings.push(format!("'{}' is not a valid strftime format", format.strftime));
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_formats() {
        assert_eq!(to_strftime("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(to_strftime("dd/MMM/yyyy:HH:mm:ss"), "%d/%b/%Y:%H:%M:%S");
        assert_eq!(to_strftime("MMMM d yy hh:mm a"), "%B %-d %y %I:%M %p");
        assert_eq!(to_strftime("EEE MMM dd"), "%a %b %d");
        assert_eq!(to_strftime("EEEE, M/d"), "%A, %-m/%-d");
        assert_eq!(to_strftime("dd/MMM/yyyy:H:m:s"), "%d/%b/%Y:%-H:%-M:%-S");
    }

    #[test]
    fn test_longest_token_wins() {
        // A naive replace would turn MMMM into %-m%-m%-m%-m or %%-m...
        assert_eq!(to_strftime("MMMM"), "%B");
        assert_eq!(to_strftime("MMM"), "%b");
        assert_eq!(to_strftime("EEE a"), "%a %p");
        assert_eq!(to_strftime("dd d"), "%d %-d");
    }

    #[test]
    fn test_idempotent_on_translated_output() {
        for source in ["yyyy-MM-dd'T'HH:mm:ss", "EEE, dd MMM yyyy", "M/d/yy h a"] {
            let once = to_strftime(source);
            assert_eq!(to_strftime(&once), once, "re-translating {}", source);
        }
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(to_strftime("yyyy-MM-dd'T'HH:mm"), "%Y-%m-%dT%H:%M");
        assert_eq!(to_strftime("hh 'o''clock' a"), "%I o'clock %p");
        assert_eq!(to_strftime("''yy"), "'%y");
    }

    #[test]
    fn test_named_formats_pass_through() {
        assert_eq!(to_strftime("ISO8601"), "ISO8601");
        assert_eq!(to_strftime("UNIX_MS"), "UNIX_MS");
    }

    #[test]
    fn test_unsupported_tokens_reported() {
        let format = translate("yyyy-MM-dd HH:mm:ss.SSS Z");
        assert_eq!(format.strftime, "%Y-%m-%d %H:%M:%S.SSS Z");
        assert_eq!(format.unsupported, vec!["S", "Z"]);
        assert_eq!(lint(&format).len(), 2);
    }

    #[test]
    fn test_clean_format_has_no_findings() {
        assert!(lint(&translate("dd/MMM/yyyy:HH:mm:ss")).is_empty());
        assert!(lint(&translate("ISO8601")).is_empty());
    }
}
