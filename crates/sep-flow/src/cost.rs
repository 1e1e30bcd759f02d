use serde::{Deserialize, Serialize};

/// KPI name carrying specific comminution energy in kWh per tonne.
pub const ENERGY_KPI: &str = "E_specific_kWhpt";

/// Default grid emission factor, kg CO2e per kWh.
pub const DEFAULT_GRID_FACTOR: f64 = 0.4;

/// Aggregate operating cost and emissions estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Operating cost score.
    #[serde(rename = "OPEX")]
    pub opex: f64,
    /// Emissions in kg CO2e per tonne processed.
    #[serde(rename = "CO2e")]
    pub co2e: f64,
}

/// Toy OPEX estimator: every KPI value counts as a resource-cost contributor.
pub fn estimate_opex<'a, I>(kpis: I) -> f64
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    kpis.into_iter().map(|(_, value)| *value).sum()
}

/// Emissions from energy KPIs (`<unit>.E_specific_kWhpt`) at `grid_factor`.
pub fn estimate_co2e<'a, I>(kpis: I, grid_factor: f64) -> f64
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    kpis.into_iter()
        .filter(|(name, _)| is_energy_kpi(name))
        .map(|(_, value)| value * grid_factor)
        .sum()
}

/// Both estimates over the same KPI mapping.
pub fn estimate_cost<'a, I>(kpis: I, grid_factor: f64) -> CostEstimate
where
    I: IntoIterator<Item = (&'a String, &'a f64)> + Clone,
{
    CostEstimate {
        opex: estimate_opex(kpis.clone()),
        co2e: estimate_co2e(kpis, grid_factor),
    }
}

fn is_energy_kpi(name: &str) -> bool {
    name == ENERGY_KPI
        || name
            .strip_suffix(ENERGY_KPI)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
