//! Search method selection.

use std::fmt;
use std::str::FromStr;

use sep_core::errors::{ErrorInfo, SepError};
use serde::{Deserialize, Serialize};

/// Minimization algorithm used by the search agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Method {
    /// Bounded quasi-Newton search with finite-difference gradients.
    #[default]
    #[serde(rename = "L-BFGS-B")]
    LbfgsB,
    /// Derivative-free simplex search projected onto the bounds.
    #[serde(rename = "Nelder-Mead")]
    NelderMead,
}

impl Method {
    /// Canonical method name.
    pub fn name(&self) -> &'static str {
        match self {
            Method::LbfgsB => "L-BFGS-B",
            Method::NelderMead => "Nelder-Mead",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = SepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l-bfgs-b" | "lbfgsb" | "quasi-newton" => Ok(Method::LbfgsB),
            "nelder-mead" | "neldermead" | "simplex" => Ok(Method::NelderMead),
            _ => Err(SepError::Search(
                ErrorInfo::new("unknown-method", format!("unknown search method '{s}'"))
                    .with_hint("supported: L-BFGS-B, Nelder-Mead"),
            )),
        }
    }
}
