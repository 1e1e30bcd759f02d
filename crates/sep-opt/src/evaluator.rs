use crate::agent::TracePoint;
use crate::constraint::Constraint;
use crate::Bound;

/// Raised by [`Evaluator::eval`] once the evaluation cap is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BudgetExhausted;

/// How a search loop stopped, short of exhausting the evaluation budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub converged: bool,
    pub message: &'static str,
}

impl Outcome {
    pub(crate) const fn converged(message: &'static str) -> Self {
        Self {
            converged: true,
            message,
        }
    }

    pub(crate) const fn stopped(message: &'static str) -> Self {
        Self {
            converged: false,
            message,
        }
    }

    pub(crate) const fn iteration_limit() -> Self {
        Self::stopped("maximum number of iterations exceeded")
    }
}

/// Counts, traces, and penalizes every objective call made by a search.
pub(crate) struct Evaluator<'a> {
    objective: &'a mut dyn FnMut(&[f64]) -> f64,
    constraints: &'a [Constraint],
    bounds: &'a [Bound],
    penalty_weight: f64,
    max_evals: Option<usize>,
    trace: Vec<TracePoint>,
    pub iterations: usize,
    best: Option<(Vec<f64>, f64)>,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(
        objective: &'a mut dyn FnMut(&[f64]) -> f64,
        constraints: &'a [Constraint],
        bounds: &'a [Bound],
        penalty_weight: f64,
        max_evals: Option<usize>,
    ) -> Self {
        Self {
            objective,
            constraints,
            bounds,
            penalty_weight,
            max_evals,
            trace: Vec::new(),
            iterations: 0,
            best: None,
        }
    }

    pub(crate) fn bounds(&self) -> &[Bound] {
        self.bounds
    }

    /// Clamps `x` into the bounds in place.
    pub(crate) fn project(&self, x: &mut [f64]) {
        for (value, (low, high)) in x.iter_mut().zip(self.bounds) {
            *value = value.clamp(*low, *high);
        }
    }

    /// Penalized objective at `x`. NaN is reported as +inf so that every
    /// comparison in the search stays total.
    pub(crate) fn eval(&mut self, x: &[f64]) -> Result<f64, BudgetExhausted> {
        if self.max_evals.is_some_and(|cap| self.trace.len() >= cap) {
            return Err(BudgetExhausted);
        }
        let raw = (self.objective)(x);
        let penalty: f64 = self
            .constraints
            .iter()
            .map(|constraint| {
                let violation = constraint.violation(x);
                self.penalty_weight * violation * violation
            })
            .sum();
        let value = raw + penalty;
        let value = if value.is_nan() { f64::INFINITY } else { value };
        self.trace.push(TracePoint {
            params: x.to_vec(),
            value,
        });
        if self.best.as_ref().map_or(true, |(_, best)| value < *best) {
            self.best = Some((x.to_vec(), value));
        }
        Ok(value)
    }

    /// Best point seen, the full trace, and the iteration count.
    pub(crate) fn into_parts(self) -> (Option<(Vec<f64>, f64)>, Vec<TracePoint>, usize) {
        (self.best, self.trace, self.iterations)
    }
}
