use crate::params::numeric_param;
use crate::stream::Stream;
use crate::unit::UnitOp;

use super::{UnitBehavior, UnitResult};

/// Low-intensity magnetic separator.
#[derive(Debug, Clone, PartialEq)]
pub struct Lims {
    magnetic_recovery: f64,
}

impl Lims {
    /// Reads the separator parameters from a validated unit.
    pub fn from_unit(unit: &UnitOp) -> Self {
        Self {
            magnetic_recovery: numeric_param(&unit.params, "magnetic_recovery", 0.8),
        }
    }
}

impl UnitBehavior for Lims {
    fn simulate(&self, feed: &Stream) -> UnitResult {
        UnitResult::new(
            [("concentrate", feed.clone()), ("tailings", feed.clone())],
            [("mag_rec", self.magnetic_recovery)],
        )
    }
}
