use rand::Rng;

use crate::params::{ParamValue, Params};

/// Multiplicative perturbation of numeric unit parameters.
///
/// Each numeric value is scaled by a factor drawn uniformly from
/// `[low, high)`; text values are copied untouched. Randomness always comes
/// from the caller's generator so suggestions are reproducible per seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturber {
    low: f64,
    high: f64,
}

impl Perturber {
    /// Creates a perturber drawing factors from `[low, high)`.
    pub fn with_range(low: f64, high: f64) -> Self {
        Self {
            low: low.min(high),
            high: low.max(high),
        }
    }

    /// Lower end of the factor range.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper end of the factor range.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns a perturbed copy of `params`.
    pub fn suggest_edit<R: Rng + ?Sized>(&self, params: &Params, rng: &mut R) -> Params {
        params
            .iter()
            .map(|(name, value)| {
                let edited = match value {
                    ParamValue::Number(number) => {
                        let factor = self.low + (self.high - self.low) * rng.gen::<f64>();
                        ParamValue::Number(number * factor)
                    }
                    other => other.clone(),
                };
                (name.clone(), edited)
            })
            .collect()
    }
}

impl Default for Perturber {
    fn default() -> Self {
        Self::with_range(0.9, 1.1)
    }
}
