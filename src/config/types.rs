use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::accel::PairRules;
use crate::convert::DuplicateStyle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "labelSuffixes[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatmergeSettings {
    /// Entity name suffixes identifying label strings.
    pub label_suffixes: Vec<String>,

    /// Entity name suffixes identifying access key strings.
    pub accesskey_suffixes: Vec<String>,

    /// Marker character spliced into a label in front of its access key.
    pub accelerator_marker: char,

    /// How colliding source texts from distinct locations are emitted.
    pub duplicate_style: DuplicateStyle,
}

impl Default for CatmergeSettings {
    fn default() -> Self {
        let rules = PairRules::default();
        Self {
            label_suffixes: rules.label_suffixes,
            accesskey_suffixes: rules.accesskey_suffixes,
            accelerator_marker: rules.marker,
            duplicate_style: DuplicateStyle::default(),
        }
    }
}

impl CatmergeSettings {
    /// # Errors
    /// - Required list is empty
    /// - Suffix without a leading dot
    /// - Alphanumeric marker character
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.label_suffixes.is_empty() {
            errors.push(ValidationError::new(
                "labelSuffixes",
                "At least one suffix is required. Example: [\".label\", \".title\"]",
            ));
        }
        for (index, suffix) in self.label_suffixes.iter().enumerate() {
            if !suffix.starts_with('.') {
                errors.push(ValidationError::new(
                    format!("labelSuffixes[{index}]"),
                    format!("Suffix '{suffix}' must start with a dot, for example: \".label\""),
                ));
            }
        }

        if self.accesskey_suffixes.is_empty() {
            errors.push(ValidationError::new(
                "accesskeySuffixes",
                "At least one suffix is required. Example: [\".accesskey\"]",
            ));
        }
        for (index, suffix) in self.accesskey_suffixes.iter().enumerate() {
            if !suffix.starts_with('.') {
                errors.push(ValidationError::new(
                    format!("accesskeySuffixes[{index}]"),
                    format!("Suffix '{suffix}' must start with a dot, for example: \".accesskey\""),
                ));
            }
        }

        if self.accelerator_marker.is_alphanumeric() {
            errors.push(ValidationError::new(
                "acceleratorMarker",
                format!(
                    "The marker '{}' would collide with label text. Use a symbol such as \"&\" or \"~\"",
                    self.accelerator_marker
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// ペアリングルールへ変換する
    #[must_use]
    pub fn pair_rules(&self) -> PairRules {
        PairRules {
            label_suffixes: self.label_suffixes.clone(),
            accesskey_suffixes: self.accesskey_suffixes.clone(),
            marker: self.accelerator_marker,
        }
    }
}
