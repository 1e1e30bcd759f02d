use std::fs;
use std::path::Path;

use sep_core::errors::{ErrorInfo, SepError};
use sep_core::{from_json_slice, from_yaml_slice};

use crate::flowsheet::{Flowsheet, FlowsheetDescription};

/// Text format of a flowsheet description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    /// YAML (also accepts JSON, which is a YAML subset).
    Yaml,
    /// Strict JSON.
    Json,
}

impl DescriptionFormat {
    /// `.json` selects JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DescriptionFormat::Json,
            _ => DescriptionFormat::Yaml,
        }
    }
}

/// Parses a description without validating units or streams.
pub fn parse_description(
    text: &str,
    format: DescriptionFormat,
) -> Result<FlowsheetDescription, SepError> {
    match format {
        DescriptionFormat::Json => from_json_slice(text.as_bytes()),
        DescriptionFormat::Yaml => from_yaml_slice(text.as_bytes()),
    }
}

/// Parses and validates a flowsheet description.
pub fn parse_flowsheet(text: &str, format: DescriptionFormat) -> Result<Flowsheet, SepError> {
    Flowsheet::from_description(parse_description(text, format)?)
}

/// Reads, parses, and validates the flowsheet description at `path`.
pub fn load_flowsheet(path: &Path) -> Result<Flowsheet, SepError> {
    let text = fs::read_to_string(path).map_err(|err| {
        SepError::Serde(
            ErrorInfo::new("io-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    parse_flowsheet(&text, DescriptionFormat::from_path(path))
}
