#![deny(missing_docs)]
#![doc = "Bounded numeric search: projected BFGS and Nelder-Mead with penalty constraints."]

mod agent;
mod bfgs;
pub mod constraint;
mod evaluator;
pub mod method;
pub mod options;
mod simplex;

pub use agent::{SearchAgent, SearchReport, TracePoint};
pub use constraint::Constraint;
pub use method::Method;
pub use options::SearchOptions;

/// Closed interval `(low, high)` for one search coordinate.
pub type Bound = (f64, f64);
