use std::cell::Cell;
use std::path::PathBuf;

use serde_json::json;

use sep_core::SepError;
use sep_design::{
    load_design_config, parse_duration, Conditions, CostModel, CostReport, CostRequest,
    DesignInputs, DesignOrchestrator, FirstOrderKinetics, IdealStateDefiner, KineticsRequest,
    KineticsSolver, LevelizedCostModel, ProcessState, StateDefiner, TimeSeries,
};

fn conditions(value: serde_json::Value) -> Conditions {
    value.as_object().cloned().unwrap()
}

fn base_inputs() -> DesignInputs {
    let mut inputs = DesignInputs::new(conditions(json!({
        "T_C": 60.0,
        "p_bar": 1.0,
        "mineral_spec": {"Fayalite": 0.1, "Forsterite": 0.9}
    })));
    inputs.simulation_params = conditions(json!({
        "duration": "10 minutes",
        "n_points": 5,
        "constraint": "TV"
    }));
    inputs
}

fn reference() -> DesignOrchestrator<IdealStateDefiner, FirstOrderKinetics, LevelizedCostModel> {
    DesignOrchestrator::new(
        IdealStateDefiner,
        FirstOrderKinetics::default(),
        LevelizedCostModel::default(),
    )
}

/// Records what the kinetics collaborator was asked to do.
#[derive(Default)]
struct RecordingKinetics {
    last: std::cell::RefCell<Option<KineticsRequest>>,
}

impl KineticsSolver for RecordingKinetics {
    fn solve_kinetics(
        &self,
        _state: &ProcessState,
        request: &KineticsRequest,
    ) -> Result<TimeSeries, SepError> {
        *self.last.borrow_mut() = Some(request.clone());
        let mut series = TimeSeries::with_columns(["time_s", "extent"]);
        series.push_row(vec![0.0, 0.0]);
        series.push_row(vec![request.duration_s, 0.5]);
        Ok(series)
    }
}

struct EmptyKinetics;

impl KineticsSolver for EmptyKinetics {
    fn solve_kinetics(
        &self,
        _: &ProcessState,
        _: &KineticsRequest,
    ) -> Result<TimeSeries, SepError> {
        Ok(TimeSeries::with_columns(["time_s"]))
    }
}

struct CountingState {
    calls: Cell<usize>,
}

impl StateDefiner for CountingState {
    fn define_state(&self, conditions: &Conditions) -> Result<ProcessState, SepError> {
        self.calls.set(self.calls.get() + 1);
        IdealStateDefiner.define_state(conditions)
    }
}

#[test]
fn design_process_surfaces_last_row_and_cost() {
    let inputs = base_inputs();
    let orchestrator = reference();
    assert_eq!(orchestrator.cost_model(), &LevelizedCostModel::default());
    let outcome = orchestrator.design(&inputs).unwrap();
    assert_eq!(outcome.simulation_results["time_s"], 600.0);
    assert!((outcome.simulation_results["T_K"] - 333.15).abs() < 1e-9);
    let extent = outcome.simulation_results["extent"];
    assert!(extent > 0.0 && extent < 1.0);
    let breakdown_total: f64 = outcome.cost_breakdown.values().sum();
    assert!((outcome.lcop - breakdown_total).abs() < 1e-9 * outcome.lcop);
    let keys: Vec<&str> = outcome.cost_breakdown.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["capital", "operating", "energy"]);
}

#[test]
fn simulation_settings_default_and_are_not_consumed() {
    let kinetics = RecordingKinetics::default();
    let orchestrator =
        DesignOrchestrator::new(IdealStateDefiner, kinetics, LevelizedCostModel::default());
    let mut inputs = base_inputs();
    inputs.simulation_params = Conditions::new();
    orchestrator.design(&inputs).unwrap();
    assert!(inputs.simulation_params.is_empty());

    inputs.simulation_params = conditions(json!({"constraint": "TV", "duration": 120}));
    inputs.reactor_params = Some(conditions(json!({"rate_multiplier": 2.0})));
    let before = inputs.clone();
    orchestrator.design(&inputs).unwrap();
    assert_eq!(inputs, before);
}

#[test]
fn kinetics_request_reflects_settings() {
    let orchestrator = DesignOrchestrator::new(
        IdealStateDefiner,
        RecordingKinetics::default(),
        LevelizedCostModel::default(),
    );
    let mut inputs = base_inputs();
    inputs.simulation_params = Conditions::new();
    let outcome = orchestrator.design(&inputs).unwrap();
    assert_eq!(outcome.simulation_results["time_s"], 86_400.0);
    assert_eq!(outcome.simulation_results["extent"], 0.5);
    let request = orchestrator.kinetics().last.borrow().clone().unwrap();
    assert_eq!(request.constraint, "TP");
    assert_eq!(request.n_points, 100);
    assert_eq!(request.stopping_criteria, 0.99);
    assert!(request.reactor_params.is_empty());
}

#[test]
fn empty_time_series_is_an_error() {
    let orchestrator =
        DesignOrchestrator::new(IdealStateDefiner, EmptyKinetics, LevelizedCostModel::default());
    let err = orchestrator.design(&base_inputs()).unwrap_err();
    assert_eq!(err.code(), "empty-time-series");
}

#[test]
fn collaborator_errors_propagate_from_direct_calls() {
    let mut inputs = base_inputs();
    inputs.initial_conditions.remove("mineral_spec");
    let err = reference().design(&inputs).unwrap_err();
    assert!(matches!(err, SepError::Collaborator(_)));
    assert_eq!(err.code(), "missing-condition");

    let mut inputs = base_inputs();
    inputs.primary_product = "Ni".into();
    assert_eq!(reference().design(&inputs).unwrap_err().code(), "zero-yield");

    let mut inputs = base_inputs();
    inputs.simulation_params.insert("constraint".into(), json!("HP"));
    assert_eq!(
        reference().design(&inputs).unwrap_err().code(),
        "unsupported-constraint"
    );
}

#[test]
fn state_definer_is_reused_across_calls() {
    let orchestrator = DesignOrchestrator::new(
        CountingState {
            calls: Cell::new(0),
        },
        FirstOrderKinetics::default(),
        LevelizedCostModel::default(),
    );
    let inputs = base_inputs();
    for _ in 0..3 {
        orchestrator.design(&inputs).unwrap();
    }
    assert_eq!(orchestrator.state_definer().calls.get(), 3);
}

#[test]
fn hotter_reactors_convert_more() {
    let orchestrator = reference();
    let mut cold = base_inputs();
    cold.initial_conditions.insert("T_C".into(), json!(50.0));
    let mut hot = base_inputs();
    hot.initial_conditions.insert("T_C".into(), json!(100.0));
    let cold = orchestrator.design(&cold).unwrap();
    let hot = orchestrator.design(&hot).unwrap();
    assert!(hot.simulation_results["extent"] > cold.simulation_results["extent"]);
    assert!(hot.lcop < cold.lcop);
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration(&json!("10 minutes")).unwrap(), 600.0);
    assert_eq!(parse_duration(&json!("1 day")).unwrap(), 86_400.0);
    assert_eq!(parse_duration(&json!("2.5 h")).unwrap(), 9_000.0);
    assert_eq!(parse_duration(&json!(45)).unwrap(), 45.0);
    assert_eq!(parse_duration(&json!("30")).unwrap(), 30.0);
    for bad in [json!("ten minutes"), json!("5 fortnights"), json!(-1.0), json!(true)] {
        assert_eq!(parse_duration(&bad).unwrap_err().code(), "invalid-duration");
    }
}

#[test]
fn cost_model_accepts_overrides() {
    let model = LevelizedCostModel::default();
    let mut request = CostRequest {
        primary_product: "H2".into(),
        economic_params: Conditions::new(),
        final_state: [("extent".to_string(), 1.0)].into_iter().collect(),
    };
    let baseline: CostReport = model.compute_levelized_cost(&request).unwrap();
    request.economic_params = conditions(json!({"capex_usd": 0.0}));
    let no_capital = model.compute_levelized_cost(&request).unwrap();
    assert_eq!(no_capital.breakdown["capital"], 0.0);
    assert!(no_capital.lcop < baseline.lcop);
}

#[test]
fn demo_config_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos/serpentinization_design.yaml");
    let config = load_design_config(&path).unwrap();
    assert_eq!(config.inputs.primary_product, "H2");
    let optimization = config.optimization.unwrap();
    assert_eq!(optimization.max_iter, 20);
    assert_eq!(optimization.variables.len(), 2);
    assert!(optimization.method().is_ok());
    assert!(reference().design(&config.inputs).unwrap().lcop.is_finite());
}
