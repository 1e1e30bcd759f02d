use sep_core::errors::{ErrorInfo, SepError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constraint::Constraint;
use crate::evaluator::{Evaluator, Outcome};
use crate::method::Method;
use crate::options::SearchOptions;
use crate::{bfgs, simplex, Bound};

/// One objective evaluation, in call order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// Trial vector.
    pub params: Vec<f64>,
    /// Penalized objective value seen by the search.
    pub value: f64,
}

/// Result of a bounded search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Method that produced the report.
    pub method: Method,
    /// Whether a convergence criterion was met.
    pub success: bool,
    /// Termination reason.
    pub message: String,
    /// Best point found.
    pub optimized_params: Vec<f64>,
    /// Objective value at `optimized_params`.
    pub min_value: f64,
    /// Iterations performed.
    pub n_iterations: usize,
    /// Objective evaluations performed.
    pub n_evaluations: usize,
    /// Every evaluation in call order.
    pub trace: Vec<TracePoint>,
}

/// Bounded minimizer over `f64` vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchAgent {
    method: Method,
    options: SearchOptions,
}

impl SearchAgent {
    /// Creates an agent for `method` with the given options.
    pub fn new(method: Method, options: SearchOptions) -> Self {
        Self { method, options }
    }

    /// Selected method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Search options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Minimizes `objective` inside `bounds`, starting from `initial`.
    ///
    /// The starting point is clamped into the bounds. Constraints are added to
    /// the objective as `penalty_weight * violation^2`. The objective is
    /// expected to be total: callers wrapping a fallible model map failures to
    /// a penalty value before they reach the search.
    pub fn optimize<F>(
        &self,
        mut objective: F,
        initial: &[f64],
        bounds: &[Bound],
        constraints: &[Constraint],
    ) -> Result<SearchReport, SepError>
    where
        F: FnMut(&[f64]) -> f64,
    {
        validate_problem(initial, bounds)?;
        info!(
            method = %self.method,
            dimension = initial.len(),
            max_iter = self.options.max_iter,
            "starting search"
        );

        let mut evaluator = Evaluator::new(
            &mut objective,
            constraints,
            bounds,
            self.options.penalty_weight,
            self.options.max_evals,
        );
        let mut x0 = initial.to_vec();
        evaluator.project(&mut x0);
        let projected_start = x0.clone();

        let outcome = match self.method {
            Method::LbfgsB => bfgs::minimize(&mut evaluator, x0, &self.options),
            Method::NelderMead => simplex::minimize(&mut evaluator, x0, &self.options),
        }
        .unwrap_or(Outcome::stopped(
            "maximum number of function evaluations exceeded",
        ));

        let (best, trace, n_iterations) = evaluator.into_parts();
        let (optimized_params, min_value) = best.unwrap_or((projected_start, f64::INFINITY));
        let report = SearchReport {
            method: self.method,
            success: outcome.converged,
            message: outcome.message.to_string(),
            optimized_params,
            min_value,
            n_iterations,
            n_evaluations: trace.len(),
            trace,
        };
        info!(
            method = %self.method,
            success = report.success,
            min_value = report.min_value,
            iterations = report.n_iterations,
            evaluations = report.n_evaluations,
            message = %report.message,
            "search finished"
        );
        Ok(report)
    }
}

fn validate_problem(initial: &[f64], bounds: &[Bound]) -> Result<(), SepError> {
    if initial.len() != bounds.len() {
        return Err(SepError::Search(
            ErrorInfo::new(
                "dimension-mismatch",
                "initial guess and bounds have different lengths",
            )
            .with_context("initial", initial.len().to_string())
            .with_context("bounds", bounds.len().to_string()),
        ));
    }
    for (idx, (low, high)) in bounds.iter().enumerate() {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(SepError::Search(
                ErrorInfo::new(
                    "invalid-bounds",
                    format!("bound {idx} has low {low} above high {high}"),
                )
                .with_context("index", idx.to_string()),
            ));
        }
    }
    if let Some(idx) = initial.iter().position(|value| !value.is_finite()) {
        return Err(SepError::Search(
            ErrorInfo::new("non-finite-initial", "initial guess is not finite")
                .with_context("index", idx.to_string()),
        ));
    }
    Ok(())
}
