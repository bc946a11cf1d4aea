// src/translate/dispatch.rs - Per-operation translation rules
use crate::decoder::{MapEntry, Statement};
use crate::error::TranslationError;
use crate::processor::{scalar_to_string, Operation, Processor};
use crate::translate::config::TranslateConfig;
use crate::translate::date_format;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

/// Mustache field reference as used by append values: `{{{field}}}`
static TEMPLATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\{\{?\s*([^{}]+?)\s*\}\}\}?$").expect("template regex is valid")
});

const SCRIPT_FIELD: &str = "THIS_IS_A_SCRIPT";
const SCRIPT_HELPER: &str = "LOOK AT THE PIPELINE";

type Rule = Result<Vec<MapEntry>, TranslationError>;

/// Translate one processor into the map entries it contributes.
///
/// grok and dissect yield nothing here; they become parse directives instead.
pub fn translate(processor: &Processor, config: &TranslateConfig) -> Rule {
    match processor.operation {
        Operation::Dissect | Operation::Grok => Ok(Vec::new()),
        Operation::Append => append(processor),
        Operation::Convert => convert(processor),
        Operation::Csv => csv(processor),
        Operation::Date => date(processor, config),
        Operation::Fingerprint => fingerprint(processor, config),
        Operation::Foreach => foreach(processor, config),
        Operation::Geoip => geoip(processor),
        Operation::Gsub => gsub(processor),
        Operation::Json => json(processor),
        Operation::Kv => kv(processor),
        Operation::Lowercase => in_place(processor, "downcase", ""),
        Operation::Uppercase => in_place(processor, "upcase", ""),
        Operation::Trim => in_place(processor, "trim", ", 'both', ' '"),
        Operation::Urldecode | Operation::UriParts => in_place(processor, "parse_uri", ""),
        Operation::UserAgent => in_place(processor, "parse_useragent", ""),
        Operation::Pipeline => pipeline(processor),
        Operation::Remove => remove(processor),
        Operation::Rename => rename(processor),
        Operation::Script => script(processor),
        Operation::Set => set(processor),
        Operation::Split => split(processor, config),
    }
}

fn one(field: impl Into<String>, expression: impl Into<String>) -> Rule {
    Ok(vec![Statement::new(field, expression).into()])
}

/// Target field, falling back to the source field
fn target_or_field(processor: &Processor) -> Result<String, TranslationError> {
    match processor.str_opt("target_field")? {
        Some(target) if !target.is_empty() => Ok(target),
        _ => processor.require_str("field"),
    }
}

/// `field: helper($field<extra>)`
fn in_place(processor: &Processor, helper: &str, extra: &str) -> Rule {
    let field = processor.require_str("field")?;
    one(&field, format!("{}(${}{})", helper, field, extra))
}

fn append(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let values = processor
        .str_or_list("value")?
        .ok_or_else(|| processor.missing("value"))?;

    Ok(values
        .iter()
        .map(|value| {
            let argument = match TEMPLATE_REGEX.captures(value) {
                Some(caps) => format!("${}", &caps[1]),
                None => value.clone(),
            };
            Statement::new(&field, format!("array_append({})", argument)).into()
        })
        .collect())
}

fn convert(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let kind = processor.require_str("type")?;
    one(target_or_field(processor)?, format!("parse_{}(${})", kind, field))
}

fn csv(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let targets = processor.str_list("target_fields")?;
    one(&field, format!("parse_csv(${}, {})", field, targets.join(",")))
}

fn date(processor: &Processor, config: &TranslateConfig) -> Rule {
    let field = processor.require_str("field")?;
    let target = target_or_field(processor)?;
    let formats = processor.str_list("formats")?;

    if formats.is_empty() {
        return one(
            target,
            format!("parse_date(${},ISO8601,{})", field, config.locale),
        );
    }

    Ok(formats
        .iter()
        .map(|source| {
            let format = date_format::translate(source);
            for finding in date_format::lint(&format) {
                tracing::warn!(field = %field, format = %source, "{}", finding);
            }
            Statement::new(
                &target,
                format!("parse_date(${}, {},{})", field, format.strftime, config.locale),
            )
            .into()
        })
        .collect())
}

fn fingerprint(processor: &Processor, config: &TranslateConfig) -> Rule {
    let target = processor.require_str("target_field")?;
    let fields = processor.str_list("fields")?;
    let helper = &config.hash_helper;

    match fields.as_slice() {
        [] => Err(processor.missing("fields")),
        [single] => one(target, format!("{}(${})", helper, single)),
        many => {
            let tmp = &config.hash_temp_field;
            let concatenated = many
                .iter()
                .map(|f| format!("${}", f))
                .collect::<Vec<_>>()
                .join(",");
            Ok(vec![
                Statement::new(tmp, format!("concat_any({})", concatenated)).into(),
                Statement::new(target, format!("{}(${})", helper, tmp)).into(),
                Statement::new(tmp, "delete()").into(),
            ])
        }
    }
}

/// Only the nested processor is translated; iteration is not modelled
fn foreach(processor: &Processor, config: &TranslateConfig) -> Rule {
    let nested = processor
        .get("processor")
        .ok_or_else(|| processor.missing("processor"))?;
    let nested = Processor::from_value(nested)?;
    translate(&nested, config)
}

fn geoip(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let target = processor.require_str("target_field")?;
    let helper = if target.ends_with("geo") { "geoip" } else { "as" };
    one(target, format!("{}(${})", helper, field))
}

fn gsub(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let pattern = processor.require_str("pattern")?;
    let replacement = processor.require_str("replacement")?;
    one(field, format!("replace(\"{}\",\"{}\")", pattern, replacement))
}

fn json(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let target = processor.require_str("target_field")?;
    one(target, format!("parse_json(${})", field))
}

fn kv(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let target = processor.require_str("target_field")?;
    let value_split = processor.require_str("value_split")?;
    let field_split = processor.require_str("field_split")?;
    one(
        target,
        format!(
            r#"parse_key_value(${}, '{}', '{}', '"', '\\')"#,
            field, value_split, field_split
        ),
    )
}

/// Sub-pipelines are referenced by name, never inlined
fn pipeline(processor: &Processor) -> Rule {
    Ok(vec![MapEntry::PipelineRef(processor.require_str("name")?)])
}

fn remove(processor: &Processor) -> Rule {
    let fields = processor
        .str_or_list("field")?
        .ok_or_else(|| processor.missing("field"))?;
    Ok(fields
        .into_iter()
        .map(|field| Statement::new(field, "delete()").into())
        .collect())
}

fn rename(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;
    let target = processor.require_str("target_field")?;
    one(target, format!("rename(${})", field))
}

/// Scripts can't be translated; leave a marker for manual review
fn script(processor: &Processor) -> Rule {
    let source = processor.require_str("source")?;
    let flattened = source.replace('\r', "").replace('\n', " ");
    one(SCRIPT_FIELD, format!("{}({})", SCRIPT_HELPER, flattened))
}

fn set(processor: &Processor) -> Rule {
    let field = processor.require_str("field")?;

    if let Some(source) = processor.str_opt("copy_from")? {
        return one(field, format!("${}", source));
    }

    match processor.get("value") {
        Some(value) => one(field, literal(processor, value)?),
        None => Ok(Vec::new()),
    }
}

/// Scalars render as written; lists and mappings as compact JSON
fn literal(processor: &Processor, value: &Value) -> Result<String, TranslationError> {
    match scalar_to_string(value) {
        Some(text) => Ok(text),
        None => serde_json::to_string(value)
            .map_err(|_| processor.invalid("value", "a scalar, list or string-keyed mapping")),
    }
}

fn split(processor: &Processor, config: &TranslateConfig) -> Rule {
    let field = processor.require_str("field")?;
    let separator = processor.require_str("separator")?;
    let delimiter = &config.split_delimiter;
    Ok(vec![
        Statement::new(&field, format!("replace('{}', '{}')", separator, delimiter)).into(),
        Statement::new(&field, format!("split(${},'{}')", field, delimiter)).into(),
    ])
}
