use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_UNIT_LABEL: &str = "unit";
pub const DEFAULT_NAME_LABEL: &str = "name";
pub const DEFAULT_QUANTITY_LABEL: &str = "qty";
pub const DEFAULT_CRF_TEST: &str = "crf_test";

const PARSER_TYPES: &[&str] = &["crfppParser", "crfpp"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown parser type: {0}")]
    UnknownParserType(String),
    #[error("failed to load unit exceptions from {path}: {message}")]
    Exceptions { path: PathBuf, message: String },
}

/// Parser settings, deserialized from the JSON document
/// `{"modelfilepath": "...", "unit": "unit", "name": "name", "quantity": "qty"}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ParserConfig {
    #[serde(default, rename = "parsertype")]
    pub parser_type: Option<String>,
    #[serde(default, rename = "modelfilepath")]
    pub model_file_path: Option<PathBuf>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default, rename = "crftestpath")]
    pub crf_test_path: Option<PathBuf>,
    /// `noun.exc`-style `plural singular` lines layered over the built-in
    /// unit exceptions.
    #[serde(default, rename = "unitexceptions")]
    pub unit_exceptions_path: Option<PathBuf>,
}

/// Tag categories the decoder routes to record fields. Compared against the
/// lower-cased tag with its `B-`/`I-` prefix removed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Labels {
    pub unit: String,
    pub name: String,
    pub quantity: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            unit: DEFAULT_UNIT_LABEL.to_string(),
            name: DEFAULT_NAME_LABEL.to_string(),
            quantity: DEFAULT_QUANTITY_LABEL.to_string(),
        }
    }
}

impl ParserConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: ParserConfig = serde_json::from_slice(data)?;
        if let Some(kind) = config.parser_type.as_deref()
            && !PARSER_TYPES.contains(&kind)
        {
            return Err(ConfigError::UnknownParserType(kind.to_string()));
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read(path)?;
        Self::from_json(&data)
    }

    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_file_path = Some(path.into());
        self
    }

    /// The configured model path, if it is non-empty.
    pub fn model_file_path(&self) -> Option<&Path> {
        self.model_file_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.model_file_path().is_some()
    }

    pub fn crf_test_path(&self) -> &Path {
        self.crf_test_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new(DEFAULT_CRF_TEST))
    }

    pub fn unit_exceptions_path(&self) -> Option<&Path> {
        self.unit_exceptions_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Category labels with empty or missing entries replaced by the defaults.
    pub fn labels(&self) -> Labels {
        Labels {
            unit: label_or(&self.unit, DEFAULT_UNIT_LABEL),
            name: label_or(&self.name, DEFAULT_NAME_LABEL),
            quantity: label_or(&self.quantity, DEFAULT_QUANTITY_LABEL),
        }
    }
}

fn label_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_lowercase(),
        _ => fallback.to_string(),
    }
}
