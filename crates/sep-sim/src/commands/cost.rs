use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use indexmap::IndexMap;
use sep_core::{from_json_slice, from_yaml_slice};
use sep_flow::{estimate_cost, DescriptionFormat, DEFAULT_GRID_FACTOR};

use super::emit;

#[derive(Args, Debug)]
pub struct EstimateCostArgs {
    /// KPI mapping (YAML, or JSON by extension), e.g. the `kpis` of a run report.
    #[arg(long)]
    pub kpis: PathBuf,
    /// kg CO2e per kWh applied to specific-energy KPIs.
    #[arg(long, default_value_t = DEFAULT_GRID_FACTOR)]
    pub grid_factor: f64,
}

pub fn run(args: &EstimateCostArgs) -> Result<(), Box<dyn Error>> {
    let bytes = fs::read(&args.kpis)?;
    let kpis: IndexMap<String, f64> = match DescriptionFormat::from_path(&args.kpis) {
        DescriptionFormat::Json => from_json_slice(&bytes)?,
        DescriptionFormat::Yaml => from_yaml_slice(&bytes)?,
    };
    emit(&estimate_cost(&kpis, args.grid_factor), None)
}
