//! Constraints applied to the search as quadratic penalties.

use std::fmt;

type ConstraintFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// A constraint on the search vector.
pub enum Constraint {
    /// Satisfied when `g(x) >= 0`.
    Inequality(ConstraintFn),
    /// Satisfied when `h(x) == 0`.
    Equality(ConstraintFn),
}

impl Constraint {
    /// Inequality constraint `g(x) >= 0`.
    pub fn inequality<G>(g: G) -> Self
    where
        G: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Constraint::Inequality(Box::new(g))
    }

    /// Equality constraint `h(x) == 0`.
    pub fn equality<H>(h: H) -> Self
    where
        H: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Constraint::Equality(Box::new(h))
    }

    /// Magnitude by which `x` violates the constraint; zero when satisfied.
    /// A non-finite constraint value counts as an infinite violation.
    pub fn violation(&self, x: &[f64]) -> f64 {
        let value = match self {
            Constraint::Inequality(g) => g(x).min(0.0),
            Constraint::Equality(h) => h(x),
        };
        if value.is_finite() {
            value.abs()
        } else {
            f64::INFINITY
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Inequality(_) => f.write_str("Constraint::Inequality(..)"),
            Constraint::Equality(_) => f.write_str("Constraint::Equality(..)"),
        }
    }
}
