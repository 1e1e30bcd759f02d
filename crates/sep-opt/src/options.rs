//! Search tolerances and budgets.

use serde::{Deserialize, Serialize};

fn default_max_iter() -> usize {
    100
}

fn default_ftol() -> f64 {
    1e-9
}

fn default_gtol() -> f64 {
    1e-6
}

fn default_xtol() -> f64 {
    1e-8
}

fn default_fd_step() -> f64 {
    1e-6
}

fn default_penalty_weight() -> f64 {
    1e6
}

/// Iteration budget, tolerances, and penalty weight for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of iterations.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Optional cap on objective evaluations.
    #[serde(default)]
    pub max_evals: Option<usize>,
    /// Relative objective decrease (quasi-Newton) or simplex value spread
    /// (Nelder-Mead) below which the search stops.
    #[serde(default = "default_ftol")]
    pub ftol: f64,
    /// Projected-gradient infinity norm below which the quasi-Newton search stops.
    #[serde(default = "default_gtol")]
    pub gtol: f64,
    /// Simplex size below which Nelder-Mead stops.
    #[serde(default = "default_xtol")]
    pub xtol: f64,
    /// Relative finite-difference step.
    #[serde(default = "default_fd_step")]
    pub fd_step: f64,
    /// Weight applied to squared constraint violations.
    #[serde(default = "default_penalty_weight")]
    pub penalty_weight: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iter: default_max_iter(),
            max_evals: None,
            ftol: default_ftol(),
            gtol: default_gtol(),
            xtol: default_xtol(),
            fd_step: default_fd_step(),
            penalty_weight: default_penalty_weight(),
        }
    }
}

impl SearchOptions {
    /// Returns a copy with a different iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Returns a copy with an evaluation cap.
    pub fn with_max_evals(mut self, max_evals: usize) -> Self {
        self.max_evals = Some(max_evals);
        self
    }
}
