//! Named, bounded design variables addressed by path.

use std::fmt;

use sep_core::errors::{ErrorInfo, SepError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conditions::{get_path, Conditions};

/// Base mapping a design variable writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathRoot {
    /// The state-definition inputs.
    InitialConditions,
    /// The kinetic simulation settings.
    SimulationParams,
}

impl PathRoot {
    /// Key used in paths and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            PathRoot::InitialConditions => "initial_conditions",
            PathRoot::SimulationParams => "simulation_params",
        }
    }
}

impl fmt::Display for PathRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path as written in configuration: `"a.b.c"` or `["a", "b", "c"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    /// Dot-separated path.
    Dotted(String),
    /// Explicit segments.
    Segments(Vec<String>),
}

impl PathSpec {
    fn segments(&self) -> Vec<String> {
        match self {
            PathSpec::Dotted(text) if text.is_empty() => Vec::new(),
            PathSpec::Dotted(text) => text.split('.').map(str::to_string).collect(),
            PathSpec::Segments(segments) => segments.clone(),
        }
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("."))
    }
}

impl From<&str> for PathSpec {
    fn from(text: &str) -> Self {
        PathSpec::Dotted(text.to_string())
    }
}

/// A validated path: a root mapping plus at least one key below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariablePath {
    /// Root mapping.
    pub root: PathRoot,
    /// Keys below the root.
    pub segments: Vec<String>,
}

impl VariablePath {
    /// Validates `spec` for the variable called `name`.
    pub fn parse(name: &str, spec: &PathSpec) -> Result<Self, SepError> {
        let segments = spec.segments();
        let Some((root, rest)) = segments.split_first() else {
            return Err(config_error("empty-path", name, "design variable path is empty"));
        };
        let root = match root.as_str() {
            "initial_conditions" => PathRoot::InitialConditions,
            "simulation_params" => PathRoot::SimulationParams,
            other => {
                return Err(config_error(
                    "unknown-path-root",
                    name,
                    format!("path root '{other}' is not initial_conditions or simulation_params"),
                ))
            }
        };
        if rest.is_empty() || rest.iter().any(String::is_empty) {
            return Err(config_error(
                "empty-path",
                name,
                format!("path '{spec}' names no key below '{root}'"),
            ));
        }
        Ok(Self {
            root,
            segments: rest.to_vec(),
        })
    }
}

fn config_error(code: &str, name: &str, message: impl Into<String>) -> SepError {
    SepError::Config(ErrorInfo::new(code, message).with_context("variable", name))
}

/// Tunable scalar exposed to the outer search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationVariable {
    /// Human-readable name.
    pub name: String,
    /// Location in the base mappings.
    pub path: PathSpec,
    /// `(low, high)` search interval.
    pub bounds: (f64, f64),
    /// Starting value; read from the base mapping when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<f64>,
}

/// A variable whose path, bounds, and starting value have been checked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedVariable {
    pub path: VariablePath,
    pub bounds: (f64, f64),
    pub initial: f64,
}

impl OptimizationVariable {
    /// Creates a variable without an explicit starting value.
    pub fn new(name: impl Into<String>, path: impl Into<PathSpec>, bounds: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            bounds,
            initial_value: None,
        }
    }

    /// Sets an explicit starting value.
    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub(crate) fn resolve(
        &self,
        initial_conditions: &Conditions,
        simulation_params: &Conditions,
    ) -> Result<ResolvedVariable, SepError> {
        let path = VariablePath::parse(&self.name, &self.path)?;
        let (low, high) = self.bounds;
        if low.is_nan() || high.is_nan() || low > high {
            return Err(config_error(
                "invalid-bounds",
                &self.name,
                format!("bounds ({low}, {high}) are not ordered"),
            ));
        }
        let initial = match self.initial_value {
            Some(value) => value,
            None => {
                let base = match path.root {
                    PathRoot::InitialConditions => initial_conditions,
                    PathRoot::SimulationParams => simulation_params,
                };
                match get_path(base, &path.segments) {
                    None | Some(Value::Null) => {
                        return Err(config_error(
                            "missing-initial-value",
                            &self.name,
                            format!("no initial value for '{}' in {}", self.path, path.root),
                        ))
                    }
                    Some(value) => value.as_f64().ok_or_else(|| {
                        config_error(
                            "non-numeric-value",
                            &self.name,
                            format!("value at '{}' is not numeric: {value}", self.path),
                        )
                    })?,
                }
            }
        };
        if !initial.is_finite() {
            return Err(config_error(
                "non-numeric-value",
                &self.name,
                "initial value is not finite",
            ));
        }
        Ok(ResolvedVariable {
            path,
            bounds: self.bounds,
            initial,
        })
    }
}
