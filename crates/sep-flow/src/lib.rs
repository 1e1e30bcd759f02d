#![deny(missing_docs)]
#![doc = "Flowsheet model, unit behaviors, and the single-pass execution engine."]

/// OPEX and CO2e estimators.
pub mod cost;
/// Structural precondition gate.
pub mod critic;
pub mod engine;
/// Flowsheet container, graph view, and graph validation.
pub mod flowsheet;
/// YAML and JSON description loading.
pub mod loader;
/// Parameter values and the static unit contract table.
pub mod params;
/// Evaluate-then-perturb refine loop.
pub mod refine;
pub mod service;
/// Stream, PSD, and liberation data types.
pub mod stream;
/// Random parameter perturbation.
pub mod suggest;
/// Validated unit declarations.
pub mod unit;
pub mod units;

pub use cost::{estimate_co2e, estimate_cost, estimate_opex, CostEstimate, DEFAULT_GRID_FACTOR};
pub use critic::Critic;
pub use engine::{Orchestrator, RunReport, RunSummary, SkipReason, UnitOutcome};
pub use flowsheet::{Flowsheet, FlowsheetDescription, FlowsheetGraph, GraphNode, GraphSummary};
pub use loader::{load_flowsheet, parse_description, parse_flowsheet, DescriptionFormat};
pub use params::{contract_for, ParamValue, Params, UnitContract, UNIT_CONTRACTS};
pub use refine::{RefineReport, RefineRound};
pub use stream::{LiberationMatrix, Phase, Psd, Stream};
pub use suggest::Perturber;
pub use unit::{UnitDescription, UnitOp};
pub use units::{UnitBehavior, UnitRegistry, UnitResult};
