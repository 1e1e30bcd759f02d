use crate::params::numeric_param;
use crate::stream::Stream;
use crate::unit::UnitOp;

use super::{UnitBehavior, UnitResult};

const DEFAULT_FINENESS: f64 = 0.7;
const DEFAULT_SPECIFIC_ENERGY: f64 = 8.0;

/// Simplified mill: rescales PSD bin edges by a fineness factor.
///
/// Mass fractions are carried over unchanged. The specific energy KPI is the
/// configured `E_specific_kWhpt` (8.0 kWh/t when absent); a feed without a PSD
/// passes through untouched and reports zero energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Mill {
    fineness_factor: f64,
    specific_energy_kwhpt: f64,
}

impl Mill {
    /// Reads the mill parameters from a validated unit.
    pub fn from_unit(unit: &UnitOp) -> Self {
        Self {
            fineness_factor: numeric_param(&unit.params, "fineness_factor", DEFAULT_FINENESS),
            specific_energy_kwhpt: numeric_param(
                &unit.params,
                "E_specific_kWhpt",
                DEFAULT_SPECIFIC_ENERGY,
            ),
        }
    }
}

impl UnitBehavior for Mill {
    fn simulate(&self, feed: &Stream) -> UnitResult {
        let Some(psd) = &feed.psd else {
            return UnitResult::new([("product", feed.clone())], [("E_specific_kWhpt", 0.0)]);
        };
        let mut product = feed.clone();
        product.psd = Some(psd.scaled(self.fineness_factor));
        UnitResult::new(
            [("product", product)],
            [("E_specific_kWhpt", self.specific_energy_kwhpt)],
        )
    }
}
