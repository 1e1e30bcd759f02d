//! Define, simulate, and cost a process design; search over design variables.

use indexmap::IndexMap;
use sep_core::errors::{ErrorInfo, SepError};
use sep_core::FAILURE_PENALTY;
use sep_opt::{Method, SearchAgent, SearchOptions, SearchReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::collaborators::{
    CostModel, CostRequest, KineticsRequest, KineticsSolver, StateDefiner,
};
use crate::conditions::{set_path, Conditions};
use crate::duration::parse_duration;
use crate::variables::{OptimizationVariable, PathRoot, ResolvedVariable};

const DEFAULT_CONSTRAINT: &str = "TP";
const DEFAULT_DURATION: &str = "1 day";
const DEFAULT_N_POINTS: usize = 100;
const DEFAULT_STOPPING_CRITERIA: f64 = 0.99;

fn default_primary_product() -> String {
    "H2".to_string()
}

/// Base mappings for one design evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignInputs {
    /// State-definition inputs.
    pub initial_conditions: Conditions,
    /// Kinetic simulation settings.
    #[serde(default)]
    pub simulation_params: Conditions,
    /// Economic parameter overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_params: Option<Conditions>,
    /// Reactor parameters forwarded to the kinetics collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactor_params: Option<Conditions>,
    /// Product whose levelized cost is the objective.
    #[serde(default = "default_primary_product")]
    pub primary_product: String,
}

impl DesignInputs {
    /// Inputs with default simulation settings and no economic overrides.
    pub fn new(initial_conditions: Conditions) -> Self {
        Self {
            initial_conditions,
            simulation_params: Conditions::new(),
            economic_params: None,
            reactor_params: None,
            primary_product: default_primary_product(),
        }
    }
}

/// Result of [`DesignOrchestrator::design_process`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignOutcome {
    /// Last row of the kinetic time series.
    pub simulation_results: IndexMap<String, f64>,
    /// Levelized cost of the primary product.
    pub lcop: f64,
    /// Components of `lcop`.
    pub cost_breakdown: IndexMap<String, f64>,
}

fn setting_error(key: &str, value: &Value, expected: &str) -> SepError {
    SepError::Config(
        ErrorInfo::new(
            "invalid-setting",
            format!("simulation_params.{key} = {value} is not {expected}"),
        )
        .with_context("setting", key),
    )
}

/// Reads the kinetics request out of `simulation_params` without modifying it.
fn kinetics_request(
    simulation_params: &Conditions,
    reactor_params: Option<&Conditions>,
) -> Result<KineticsRequest, SepError> {
    let constraint = match simulation_params.get("constraint") {
        None | Some(Value::Null) => DEFAULT_CONSTRAINT.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => return Err(setting_error("constraint", other, "a string")),
    };
    let duration_s = match simulation_params.get("duration") {
        None | Some(Value::Null) => parse_duration(&Value::from(DEFAULT_DURATION))?,
        Some(value) => parse_duration(value)?,
    };
    let n_points = match simulation_params.get("n_points") {
        None | Some(Value::Null) => DEFAULT_N_POINTS,
        Some(value) => match value.as_f64() {
            Some(points) if points.is_finite() && points >= 1.0 => points.round() as usize,
            _ => return Err(setting_error("n_points", value, "a positive count")),
        },
    };
    let stopping_criteria = match simulation_params.get("stopping_criteria") {
        None | Some(Value::Null) => DEFAULT_STOPPING_CRITERIA,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| setting_error("stopping_criteria", value, "a number"))?,
    };
    Ok(KineticsRequest {
        constraint,
        duration_s,
        n_points,
        stopping_criteria,
        reactor_params: reactor_params.cloned().unwrap_or_default(),
    })
}

/// Sequences state definition, kinetics, and costing.
///
/// Collaborators are owned for the orchestrator's lifetime, so any expensive
/// setup in the state definer happens once. Calls run synchronously on the
/// caller's thread.
#[derive(Debug, Clone)]
pub struct DesignOrchestrator<S, K, C> {
    state: S,
    kinetics: K,
    cost: C,
}

impl<S, K, C> DesignOrchestrator<S, K, C>
where
    S: StateDefiner,
    K: KineticsSolver,
    C: CostModel,
{
    /// Creates an orchestrator over the given collaborators.
    pub fn new(state: S, kinetics: K, cost: C) -> Self {
        Self {
            state,
            kinetics,
            cost,
        }
    }

    /// The state-definition collaborator.
    pub fn state_definer(&self) -> &S {
        &self.state
    }

    /// The kinetics collaborator.
    pub fn kinetics(&self) -> &K {
        &self.kinetics
    }

    /// The cost collaborator.
    pub fn cost_model(&self) -> &C {
        &self.cost
    }

    /// Define the state, simulate it, and cost the final row.
    ///
    /// Collaborator failures propagate to the caller.
    pub fn design_process(
        &self,
        initial_conditions: &Conditions,
        simulation_params: &Conditions,
        economic_params: Option<&Conditions>,
        reactor_params: Option<&Conditions>,
        primary_product: &str,
    ) -> Result<DesignOutcome, SepError> {
        info!(step = "define", "defining process state");
        let state = self.state.define_state(initial_conditions)?;

        let request = kinetics_request(simulation_params, reactor_params)?;
        info!(
            step = "simulate",
            constraint = %request.constraint,
            duration_s = request.duration_s,
            n_points = request.n_points,
            "running kinetic simulation"
        );
        let series = self.kinetics.solve_kinetics(&state, &request)?;
        let Some(final_state) = series.last_row() else {
            return Err(SepError::Collaborator(ErrorInfo::new(
                "empty-time-series",
                "kinetics collaborator returned no rows",
            )));
        };

        info!(step = "evaluate", product = primary_product, "computing levelized cost");
        let report = self.cost.compute_levelized_cost(&CostRequest {
            primary_product: primary_product.to_string(),
            economic_params: economic_params.cloned().unwrap_or_default(),
            final_state: final_state.clone(),
        })?;
        Ok(DesignOutcome {
            simulation_results: final_state,
            lcop: report.lcop,
            cost_breakdown: report.breakdown,
        })
    }

    /// [`DesignOrchestrator::design_process`] over a bundled set of inputs.
    pub fn design(&self, inputs: &DesignInputs) -> Result<DesignOutcome, SepError> {
        self.design_process(
            &inputs.initial_conditions,
            &inputs.simulation_params,
            inputs.economic_params.as_ref(),
            inputs.reactor_params.as_ref(),
            &inputs.primary_product,
        )
    }

    /// Levelized cost at one trial vector.
    fn evaluate_trial(
        &self,
        base: &DesignInputs,
        variables: &[ResolvedVariable],
        trial: &[f64],
    ) -> Result<f64, SepError> {
        let mut inputs = base.clone();
        for (variable, value) in variables.iter().zip(trial) {
            let target = match variable.path.root {
                PathRoot::InitialConditions => &mut inputs.initial_conditions,
                PathRoot::SimulationParams => &mut inputs.simulation_params,
            };
            set_path(target, &variable.path.segments, Value::from(*value));
        }
        let lcop = self.design(&inputs)?.lcop;
        if !lcop.is_finite() {
            return Err(SepError::Collaborator(
                ErrorInfo::new("non-finite-lcop", format!("levelized cost is {lcop}"))
                    .with_context("trial", format!("{trial:?}")),
            ));
        }
        Ok(lcop)
    }

    /// Minimizes the levelized cost over `variables`, starting from `base`.
    ///
    /// Every variable is validated before the search starts; a bad path,
    /// bound, or starting value is returned as an error. During the search a
    /// failed trial is logged with its cause and scored as
    /// [`FAILURE_PENALTY`], so collaborator failures never abort it.
    pub fn optimize_process(
        &self,
        base: &DesignInputs,
        variables: &[OptimizationVariable],
        method: Method,
        max_iter: usize,
    ) -> Result<SearchReport, SepError> {
        let resolved = variables
            .iter()
            .map(|variable| {
                variable.resolve(&base.initial_conditions, &base.simulation_params)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let initial: Vec<f64> = resolved.iter().map(|variable| variable.initial).collect();
        let bounds: Vec<(f64, f64)> = resolved.iter().map(|variable| variable.bounds).collect();
        info!(
            variables = resolved.len(),
            %method,
            max_iter,
            "optimizing process design"
        );

        let objective = |trial: &[f64]| match self.evaluate_trial(base, &resolved, trial) {
            Ok(lcop) => {
                debug!(?trial, lcop, "trial evaluated");
                lcop
            }
            Err(err) => {
                warn!(?trial, error = %err, penalty = FAILURE_PENALTY, "trial failed");
                FAILURE_PENALTY
            }
        };
        let agent = SearchAgent::new(method, SearchOptions::default().with_max_iter(max_iter));
        agent.optimize(objective, &initial, &bounds, &[])
    }
}
