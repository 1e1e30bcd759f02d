use crate::params::{numeric_param, ParamValue};
use crate::stream::Stream;
use crate::unit::UnitOp;

use super::{UnitBehavior, UnitResult};

/// Gravity thickener.
///
/// When `underflow_solids` is configured the underflow stream carries that
/// solids fraction; otherwise both branches are copies of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Thickener {
    flux: f64,
    underflow_solids: Option<f64>,
}

impl Thickener {
    /// Reads the thickener parameters from a validated unit.
    pub fn from_unit(unit: &UnitOp) -> Self {
        Self {
            flux: numeric_param(&unit.params, "unit_area_m2tpd", 1.0),
            underflow_solids: unit
                .params
                .get("underflow_solids")
                .and_then(ParamValue::as_f64),
        }
    }
}

impl UnitBehavior for Thickener {
    fn simulate(&self, feed: &Stream) -> UnitResult {
        let mut underflow = feed.clone();
        if let Some(solids) = self.underflow_solids {
            underflow.solids_wtfrac = Some(solids);
        }
        UnitResult::new(
            [("underflow", underflow), ("overflow", feed.clone())],
            [("flux", self.flux)],
        )
    }
}
