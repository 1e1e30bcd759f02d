#![deny(missing_docs)]
#![doc = "Define, simulate, and cost a process design, and search over its design variables."]

pub mod collaborators;
/// Nested condition maps and path-addressed access.
pub mod conditions;
pub mod config;
/// Duration strings such as `"10 minutes"`.
pub mod duration;
pub mod orchestrator;
pub mod reference;
pub mod variables;

pub use collaborators::{
    CostModel, CostReport, CostRequest, KineticsRequest, KineticsSolver, ProcessState,
    StateDefiner, TimeSeries,
};
pub use conditions::Conditions;
pub use config::{load_design_config, DesignConfig, OptimizationConfig};
pub use duration::parse_duration;
pub use orchestrator::{DesignInputs, DesignOrchestrator, DesignOutcome};
pub use reference::{FirstOrderKinetics, IdealStateDefiner, LevelizedCostModel};
pub use variables::{OptimizationVariable, PathRoot, PathSpec, VariablePath};
