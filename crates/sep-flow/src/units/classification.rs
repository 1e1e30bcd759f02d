use crate::params::numeric_param;
use crate::stream::{Psd, Stream};
use crate::unit::UnitOp;

use super::{UnitBehavior, UnitResult};

const DEFAULT_SHARPNESS: f64 = 3.0;
const SPLIT_WITHOUT_PSD: f64 = 0.6;

/// Hydrocyclone classifier.
///
/// Both branches carry the feed unchanged; only the underflow split KPI is
/// derived, from the Whiten efficiency curve when the feed has a PSD.
#[derive(Debug, Clone, PartialEq)]
pub struct Cyclone {
    d50c_um: f64,
    sharpness_alpha: f64,
}

impl Cyclone {
    /// Reads the cyclone parameters from a validated unit.
    pub fn from_unit(unit: &UnitOp) -> Self {
        Self {
            d50c_um: numeric_param(&unit.params, "d50c_um", 0.0),
            sharpness_alpha: numeric_param(&unit.params, "sharpness_alpha", DEFAULT_SHARPNESS),
        }
    }

    /// Fraction of particles of size `size_um` reporting to underflow.
    fn efficiency(&self, size_um: f64) -> f64 {
        if self.d50c_um <= 0.0 {
            return 1.0;
        }
        let alpha = self.sharpness_alpha;
        let x = size_um / self.d50c_um;
        let numerator = (alpha * x).exp() - 1.0;
        let denominator = (alpha * x).exp() + alpha.exp() - 2.0;
        if denominator <= 0.0 {
            return 0.0;
        }
        (numerator / denominator).clamp(0.0, 1.0)
    }

    fn underflow_split(&self, psd: &Psd) -> f64 {
        let total = psd.total_mass();
        if total <= 0.0 {
            return SPLIT_WITHOUT_PSD;
        }
        psd.bins_um
            .iter()
            .zip(psd.mass_frac.iter())
            .map(|(size, frac)| frac * self.efficiency(*size))
            .sum::<f64>()
            / total
    }
}

impl UnitBehavior for Cyclone {
    fn simulate(&self, feed: &Stream) -> UnitResult {
        let split = feed
            .psd
            .as_ref()
            .map_or(SPLIT_WITHOUT_PSD, |psd| self.underflow_split(psd));
        UnitResult::new(
            [("overflow", feed.clone()), ("underflow", feed.clone())],
            [("UF_split", split)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_is_half_at_cut_size() {
        let cyclone = Cyclone {
            d50c_um: 75.0,
            sharpness_alpha: 3.0,
        };
        assert!((cyclone.efficiency(75.0) - 0.5).abs() < 1e-12);
        assert!(cyclone.efficiency(10.0) < 0.5);
        assert!(cyclone.efficiency(300.0) > 0.9);
    }
}
