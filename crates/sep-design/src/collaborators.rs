//! Seams to the external state, kinetics, and cost models.
//!
//! The orchestrator only sequences these calls. Real thermodynamic, kinetic,
//! and economic models live outside this workspace and plug in by
//! implementing the traits below; [`crate::reference`] holds simple stand-ins.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use sep_core::errors::SepError;
use serde::{Deserialize, Serialize};

use crate::conditions::Conditions;

/// Initial chemical and process state built from the initial conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessState {
    /// Temperature in kelvin.
    #[serde(rename = "T_K")]
    pub temperature_k: f64,
    /// Pressure in pascal.
    #[serde(rename = "p_Pa")]
    pub pressure_pa: f64,
    /// Species or mineral amounts.
    pub composition: BTreeMap<String, f64>,
    /// The conditions the state was defined from.
    pub conditions: Conditions,
}

/// Settings for one kinetic simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticsRequest {
    /// Thermodynamic constraint pair, such as `TP` or `TV`.
    pub constraint: String,
    /// Simulated duration in seconds.
    pub duration_s: f64,
    /// Number of output time points.
    pub n_points: usize,
    /// Fraction of completion at which the simulation may stop early.
    pub stopping_criteria: f64,
    /// Reactor-specific parameters forwarded untouched.
    #[serde(default)]
    pub reactor_params: Conditions,
}

/// Tabular simulation output, one row per time point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Column names.
    pub columns: Vec<String>,
    /// Rows in time order; every row has one value per column.
    pub rows: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Empty series with the given columns.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The final row keyed by column name.
    pub fn last_row(&self) -> Option<IndexMap<String, f64>> {
        self.rows.last().map(|row| {
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().copied())
                .collect()
        })
    }
}

/// Inputs to the levelized cost computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRequest {
    /// Product whose levelized cost is computed.
    pub primary_product: String,
    /// Economic parameter overrides.
    #[serde(default)]
    pub economic_params: Conditions,
    /// Last row of the kinetic simulation.
    pub final_state: IndexMap<String, f64>,
}

/// Levelized cost of the primary product and its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    /// Levelized cost of product.
    pub lcop: f64,
    /// Cost elements contributing to `lcop`.
    pub breakdown: IndexMap<String, f64>,
}

/// Builds the initial process state. Constructed once per orchestrator and
/// reused across calls.
pub trait StateDefiner {
    /// Defines the state for `conditions`.
    fn define_state(&self, conditions: &Conditions) -> Result<ProcessState, SepError>;
}

/// Advances a state over time.
pub trait KineticsSolver {
    /// Simulates `state` under `request`.
    fn solve_kinetics(
        &self,
        state: &ProcessState,
        request: &KineticsRequest,
    ) -> Result<TimeSeries, SepError>;
}

/// Computes the levelized cost of a product.
pub trait CostModel {
    /// Levelized cost and breakdown for `request`.
    fn compute_levelized_cost(&self, request: &CostRequest) -> Result<CostReport, SepError>;
}
