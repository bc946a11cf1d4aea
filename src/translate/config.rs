use crate::decoder::ParseKeyStyle;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Knobs for the translation, loadable from a YAML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslateConfig {
    /// `field` value that gets rewritten before translation
    pub timestamp_marker: String,
    /// Replacement for `timestamp_marker`
    pub event_time_field: String,
    /// Locale argument passed to `parse_date`
    pub locale: String,
    /// Digest helper used by fingerprint
    pub hash_helper: String,
    /// Scratch field for multi-field fingerprints
    pub hash_temp_field: String,
    /// Single-character delimiter that split rewrites its separator to
    pub split_delimiter: String,
    pub parse_style: ParseKeyStyle,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        TranslateConfig {
            timestamp_marker: "@timestamp".to_string(),
            event_time_field: "event.start".to_string(),
            locale: "en_US.UTF-8".to_string(),
            hash_helper: "sha1".to_string(),
            hash_temp_field: "_to_hash".to_string(),
            split_delimiter: "|".to_string(),
            parse_style: ParseKeyStyle::Nested,
        }
    }
}

impl TranslateConfig {
    /// Load overrides from a YAML file; unset keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = TranslateConfig::from_yaml_str("locale: de_DE.UTF-8\nparse_style: piped\n").unwrap();
        assert_eq!(config.locale, "de_DE.UTF-8");
        assert_eq!(config.parse_style, ParseKeyStyle::Piped);
        assert_eq!(config.event_time_field, "event.start");
        assert_eq!(config.hash_temp_field, "_to_hash");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            TranslateConfig::from_yaml_str("  \n").unwrap(),
            TranslateConfig::default()
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(TranslateConfig::from_yaml_str("colour: blue\n").is_err());
    }
}
