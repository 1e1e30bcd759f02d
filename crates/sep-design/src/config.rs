//! Design configuration files.

use std::fs;
use std::path::Path;

use sep_core::errors::{ErrorInfo, SepError};
use sep_core::from_yaml_slice;
use sep_opt::Method;
use serde::{Deserialize, Serialize};

use crate::orchestrator::DesignInputs;
use crate::variables::OptimizationVariable;

fn default_max_iter() -> usize {
    50
}

fn default_method() -> String {
    Method::default().name().to_string()
}

/// Optional outer-search section of a design configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Design variables, in search-vector order.
    pub variables: Vec<OptimizationVariable>,
    /// Iteration budget.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Search method name.
    #[serde(default = "default_method")]
    pub method: String,
}

impl OptimizationConfig {
    /// Parses the configured method name.
    pub fn method(&self) -> Result<Method, SepError> {
        self.method.parse()
    }
}

/// A design problem as written in YAML (or JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Base inputs for every evaluation.
    #[serde(flatten)]
    pub inputs: DesignInputs,
    /// Outer search settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationConfig>,
}

/// Reads a design configuration from `path`.
pub fn load_design_config(path: &Path) -> Result<DesignConfig, SepError> {
    let bytes = fs::read(path).map_err(|err| {
        SepError::Serde(
            ErrorInfo::new("io-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    from_yaml_slice(&bytes)
}
