use crate::params::numeric_param;
use crate::stream::Stream;
use crate::unit::UnitOp;

use super::{UnitBehavior, UnitResult};

/// Flotation bank reporting its rate constant.
///
/// Both roles carry the feed through unchanged. Only the rate constant is a
/// KPI, so the OPEX score of a flowsheet never counts a recovery fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Flotation {
    rate_constant: f64,
}

impl Flotation {
    /// Reads the bank parameters from a validated unit.
    pub fn from_unit(unit: &UnitOp) -> Self {
        Self {
            rate_constant: numeric_param(&unit.params, "k_s_1ps", 0.5),
        }
    }
}

impl UnitBehavior for Flotation {
    fn simulate(&self, feed: &Stream) -> UnitResult {
        UnitResult::new(
            [("froth", feed.clone()), ("tail", feed.clone())],
            [("k", self.rate_constant)],
        )
    }
}
