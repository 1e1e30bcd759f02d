use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use sep_core::{to_yaml_string, RngHandle};
use sep_flow::{load_flowsheet, DescriptionFormat, Orchestrator};
use serde_json::json;
use tracing::info;

use super::{emit, provenance, write_file, Stamped};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Flowsheet description (YAML, or JSON by extension).
    #[arg(long)]
    pub flowsheet: PathBuf,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Flowsheet description (YAML, or JSON by extension).
    #[arg(long)]
    pub flowsheet: PathBuf,
    /// Write the graph here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Flowsheet description (YAML, or JSON by extension).
    #[arg(long)]
    pub flowsheet: PathBuf,
    /// Write the run report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Flowsheet description (YAML, or JSON by extension).
    #[arg(long)]
    pub flowsheet: PathBuf,
    /// Seed for the parameter perturbation.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Write the suggested flowsheet here (YAML, or JSON by extension) instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RefineArgs {
    /// Flowsheet description (YAML, or JSON by extension).
    #[arg(long)]
    pub flowsheet: PathBuf,
    /// Number of evaluate-then-perturb rounds.
    #[arg(long, default_value_t = 5)]
    pub rounds: usize,
    /// Seed for the parameter perturbations.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Write the refine report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn validate(args: &ValidateArgs) -> Result<(), Box<dyn Error>> {
    let flowsheet = load_flowsheet(&args.flowsheet)?;
    let summary = flowsheet.validate_graph()?;
    let (ok, message) = Orchestrator::new().critic().check(&flowsheet);
    info!(flowsheet = %flowsheet.name, ok, "validated flowsheet");
    emit(
        &json!({
            "name": flowsheet.name,
            "units": flowsheet.units.len(),
            "feeds": summary.feeds,
            "sinks": summary.sinks,
            "critic": { "ok": ok, "message": message },
        }),
        None,
    )
}

pub fn graph(args: &GraphArgs) -> Result<(), Box<dyn Error>> {
    let flowsheet = load_flowsheet(&args.flowsheet)?;
    emit(&flowsheet.graph(), args.out.as_deref())
}

pub fn simulate(args: &SimulateArgs) -> Result<(), Box<dyn Error>> {
    let flowsheet = load_flowsheet(&args.flowsheet)?;
    let report = Orchestrator::new().run_once(&flowsheet);
    emit(
        &Stamped {
            provenance: provenance(flowsheet.canonical_hash()?, None),
            report: &report,
        },
        args.out.as_deref(),
    )
}

pub fn suggest(args: &SuggestArgs) -> Result<(), Box<dyn Error>> {
    let flowsheet = load_flowsheet(&args.flowsheet)?;
    let mut rng = RngHandle::from_seed(args.seed);
    let suggested = Orchestrator::new().suggest(&flowsheet, &mut rng);
    match args.out.as_deref() {
        Some(path) if DescriptionFormat::from_path(path) == DescriptionFormat::Yaml => {
            write_file(path, &to_yaml_string(&suggested)?)
        }
        out => emit(&suggested, out),
    }
}

pub fn refine(args: &RefineArgs) -> Result<(), Box<dyn Error>> {
    let flowsheet = load_flowsheet(&args.flowsheet)?;
    let mut rng = RngHandle::from_seed(args.seed);
    let report = Orchestrator::new().refine(&flowsheet, args.rounds, &mut rng);
    if let Some(best) = report.best() {
        info!(
            round = best.round,
            opex = ?best.report.opex_score(),
            "best refine round"
        );
    }
    emit(
        &Stamped {
            provenance: provenance(flowsheet.canonical_hash()?, Some(args.seed)),
            report: &report,
        },
        args.out.as_deref(),
    )
}
