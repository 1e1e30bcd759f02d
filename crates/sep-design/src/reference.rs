//! Simple stand-in collaborators so the design pipeline runs end to end.
//!
//! These are not thermodynamic or economic models: an ideal state, one
//! Arrhenius first-order reaction, and a capital-recovery annuity. Production
//! setups replace them with real implementations of the collaborator traits.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use sep_core::errors::{ErrorInfo, SepError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collaborators::{
    CostModel, CostReport, CostRequest, KineticsRequest, KineticsSolver, ProcessState,
    StateDefiner, TimeSeries,
};
use crate::conditions::{number_or, Conditions};

const GAS_CONSTANT: f64 = 8.314_462_618;
const CELSIUS_OFFSET: f64 = 273.15;
const PA_PER_BAR: f64 = 1e5;

fn missing(key: &str) -> SepError {
    SepError::Collaborator(
        ErrorInfo::new("missing-condition", format!("required condition '{key}' is missing"))
            .with_context("condition", key),
    )
}

fn invalid(key: &str, why: impl Into<String>) -> SepError {
    SepError::Collaborator(
        ErrorInfo::new("invalid-condition", format!("condition '{key}' {}", why.into()))
            .with_context("condition", key),
    )
}

fn required_number(conditions: &Conditions, key: &str) -> Result<f64, SepError> {
    match conditions.get(key) {
        None | Some(Value::Null) => Err(missing(key)),
        Some(value) => value
            .as_f64()
            .filter(|number| number.is_finite())
            .ok_or_else(|| invalid(key, "must be a finite number")),
    }
}

fn optional_number(conditions: &Conditions, key: &str, default: f64) -> Result<f64, SepError> {
    number_or(conditions, key, default).ok_or_else(|| invalid(key, "must be a number"))
}

/// Ideal-mixture state from `T_C`, `p_bar`, and `mineral_spec`.
///
/// `mineral_spec` is either a single amount or a mineral-to-amount map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IdealStateDefiner;

impl StateDefiner for IdealStateDefiner {
    fn define_state(&self, conditions: &Conditions) -> Result<ProcessState, SepError> {
        let temperature_k = required_number(conditions, "T_C")? + CELSIUS_OFFSET;
        if temperature_k <= 0.0 {
            return Err(invalid("T_C", "is below absolute zero"));
        }
        let pressure_pa = required_number(conditions, "p_bar")? * PA_PER_BAR;
        if pressure_pa <= 0.0 {
            return Err(invalid("p_bar", "must be positive"));
        }
        let composition = match conditions.get("mineral_spec") {
            None | Some(Value::Null) => return Err(missing("mineral_spec")),
            Some(Value::Number(amount)) => {
                let amount = amount
                    .as_f64()
                    .ok_or_else(|| invalid("mineral_spec", "must be numeric"))?;
                BTreeMap::from([("mineral".to_string(), amount)])
            }
            Some(Value::Object(minerals)) => minerals
                .iter()
                .map(|(mineral, amount)| {
                    amount
                        .as_f64()
                        .map(|amount| (mineral.clone(), amount))
                        .ok_or_else(|| {
                            invalid("mineral_spec", format!("entry '{mineral}' is not numeric"))
                        })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(invalid("mineral_spec", "must be a number or a map")),
        };
        Ok(ProcessState {
            temperature_k,
            pressure_pa,
            composition,
            conditions: conditions.clone(),
        })
    }
}

/// Isothermal first-order conversion with an Arrhenius rate constant.
///
/// Reactor parameters may override `pre_exponential_per_s`,
/// `activation_energy_J_mol`, and `rate_multiplier`. Rows stop at the first
/// point whose extent reaches `stopping_criteria`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderKinetics {
    /// Arrhenius pre-exponential factor, 1/s.
    pub pre_exponential_per_s: f64,
    /// Activation energy, J/mol.
    pub activation_energy_j_mol: f64,
}

impl Default for FirstOrderKinetics {
    fn default() -> Self {
        Self {
            pre_exponential_per_s: 1e4,
            activation_energy_j_mol: 50e3,
        }
    }
}

impl KineticsSolver for FirstOrderKinetics {
    fn solve_kinetics(
        &self,
        state: &ProcessState,
        request: &KineticsRequest,
    ) -> Result<TimeSeries, SepError> {
        if !matches!(request.constraint.as_str(), "TP" | "TV") {
            return Err(SepError::Collaborator(
                ErrorInfo::new(
                    "unsupported-constraint",
                    format!("constraint '{}' is not supported", request.constraint),
                )
                .with_hint("use TP or TV"),
            ));
        }
        let params = &request.reactor_params;
        let pre_exponential =
            optional_number(params, "pre_exponential_per_s", self.pre_exponential_per_s)?;
        let activation =
            optional_number(params, "activation_energy_J_mol", self.activation_energy_j_mol)?;
        let multiplier = optional_number(params, "rate_multiplier", 1.0)?;
        let rate = multiplier
            * pre_exponential
            * (-activation / (GAS_CONSTANT * state.temperature_k)).exp();

        let mut series = TimeSeries::with_columns(["time_s", "extent", "T_K", "p_Pa"]);
        let intervals = request.n_points.saturating_sub(1).max(1) as f64;
        for idx in 0..request.n_points {
            let time_s = request.duration_s * idx as f64 / intervals;
            let extent = 1.0 - (-rate * time_s).exp();
            series.push_row(vec![time_s, extent, state.temperature_k, state.pressure_pa]);
            if extent >= request.stopping_criteria {
                break;
            }
        }
        Ok(series)
    }
}

/// Levelized cost from an annualized capital charge plus per-tonne operating
/// costs, divided by the annual product mass.
///
/// Every field can be overridden per request through `economic_params`, using
/// the field name as key. Product mass is `rock_tpa * yield * extent`, where
/// `extent` comes from the final simulation row (1.0 when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelizedCostModel {
    /// Installed capital, USD.
    pub capex_usd: f64,
    /// Annual discount rate.
    pub discount_rate: f64,
    /// Plant life, years.
    pub lifetime_years: f64,
    /// Feed throughput, tonnes per year.
    pub rock_tpa: f64,
    /// Operating cost excluding energy, USD per tonne feed.
    pub opex_usd_per_t: f64,
    /// Energy use, kWh per tonne feed.
    pub energy_kwh_per_t: f64,
    /// Energy price, USD per kWh.
    pub energy_price_usd_per_kwh: f64,
    /// Product yield at full conversion, kg per tonne feed.
    pub yield_kg_per_t: BTreeMap<String, f64>,
}

impl Default for LevelizedCostModel {
    fn default() -> Self {
        Self {
            capex_usd: 5e6,
            discount_rate: 0.08,
            lifetime_years: 20.0,
            rock_tpa: 1e5,
            opex_usd_per_t: 25.0,
            energy_kwh_per_t: 30.0,
            energy_price_usd_per_kwh: 0.08,
            yield_kg_per_t: BTreeMap::from([("H2".to_string(), 2.0)]),
        }
    }
}

/// Capital recovery factor for `rate` over `years`.
fn capital_recovery_factor(rate: f64, years: f64) -> f64 {
    if rate.abs() < 1e-12 {
        return 1.0 / years;
    }
    let growth = (1.0 + rate).powf(years);
    rate * growth / (growth - 1.0)
}

impl LevelizedCostModel {
    fn product_yield(&self, params: &Conditions, product: &str) -> Result<f64, SepError> {
        match params.get("yield_kg_per_t") {
            None | Some(Value::Null) => {
                Ok(self.yield_kg_per_t.get(product).copied().unwrap_or(0.0))
            }
            Some(Value::Object(yields)) => match yields.get(product) {
                None => Ok(0.0),
                Some(value) => value.as_f64().ok_or_else(|| {
                    invalid("yield_kg_per_t", format!("entry '{product}' is not numeric"))
                }),
            },
            Some(_) => Err(invalid("yield_kg_per_t", "must be a product-to-yield map")),
        }
    }
}

impl CostModel for LevelizedCostModel {
    fn compute_levelized_cost(&self, request: &CostRequest) -> Result<CostReport, SepError> {
        let params = &request.economic_params;
        let capex = optional_number(params, "capex_usd", self.capex_usd)?;
        let rate = optional_number(params, "discount_rate", self.discount_rate)?;
        let years = optional_number(params, "lifetime_years", self.lifetime_years)?;
        let rock_tpa = optional_number(params, "rock_tpa", self.rock_tpa)?;
        let opex_per_t = optional_number(params, "opex_usd_per_t", self.opex_usd_per_t)?;
        let energy_per_t = optional_number(params, "energy_kwh_per_t", self.energy_kwh_per_t)?;
        let energy_price = optional_number(
            params,
            "energy_price_usd_per_kwh",
            self.energy_price_usd_per_kwh,
        )?;
        if years <= 0.0 {
            return Err(invalid("lifetime_years", "must be positive"));
        }

        let extent = request.final_state.get("extent").copied().unwrap_or(1.0);
        let product_kg = rock_tpa * self.product_yield(params, &request.primary_product)? * extent;
        if product_kg.is_nan() || product_kg <= 0.0 {
            return Err(SepError::Collaborator(
                ErrorInfo::new(
                    "zero-yield",
                    format!("no {} is produced", request.primary_product),
                )
                .with_context("product", request.primary_product.as_str())
                .with_context("extent", extent.to_string()),
            ));
        }

        let capital = capex * capital_recovery_factor(rate, years) / product_kg;
        let operating = rock_tpa * opex_per_t / product_kg;
        let energy = rock_tpa * energy_per_t * energy_price / product_kg;
        let breakdown = IndexMap::from([
            ("capital".to_string(), capital),
            ("operating".to_string(), operating),
            ("energy".to_string(), energy),
        ]);
        Ok(CostReport {
            lcop: capital + operating + energy,
            breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::capital_recovery_factor;

    #[test]
    fn recovery_factor_matches_annuity_tables() {
        assert!((capital_recovery_factor(0.08, 20.0) - 0.101_852).abs() < 1e-6);
        assert!((capital_recovery_factor(0.0, 10.0) - 0.1).abs() < 1e-12);
    }
}
