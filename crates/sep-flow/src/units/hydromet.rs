use crate::params::numeric_param;
use crate::stream::Stream;
use crate::unit::UnitOp;

use super::{UnitBehavior, UnitResult};

/// Leach stage. No chemistry yet: reports the configured extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Leach {
    extraction: f64,
}

impl Leach {
    /// Reads the leach parameters from a validated unit.
    pub fn from_unit(unit: &UnitOp) -> Self {
        Self {
            extraction: numeric_param(&unit.params, "extraction", 0.6),
        }
    }
}

impl UnitBehavior for Leach {
    fn simulate(&self, feed: &Stream) -> UnitResult {
        UnitResult::new(
            [("pregnant", feed.clone()), ("residue", feed.clone())],
            [("ext", self.extraction)],
        )
    }
}
