use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use sep_core::errors::{ErrorInfo, SepError};
use sep_core::{stable_hash_string, to_json_pretty};
use sep_design::{
    load_design_config, DesignConfig, DesignOrchestrator, FirstOrderKinetics, IdealStateDefiner,
    LevelizedCostModel,
};
use sep_opt::SearchReport;
use tracing::info;

use super::{emit, provenance, write_file, Stamped};

#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Design configuration (YAML).
    #[arg(long)]
    pub config: PathBuf,
    /// Write the design outcome here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Design configuration (YAML) with an `optimization` section.
    #[arg(long)]
    pub config: PathBuf,
    /// Output directory for `report.json` and `trace.csv`; stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Overrides the configured iteration budget.
    #[arg(long)]
    pub max_iter: Option<usize>,
}

type ReferenceOrchestrator =
    DesignOrchestrator<IdealStateDefiner, FirstOrderKinetics, LevelizedCostModel>;

fn reference_orchestrator() -> ReferenceOrchestrator {
    DesignOrchestrator::new(
        IdealStateDefiner,
        FirstOrderKinetics::default(),
        LevelizedCostModel::default(),
    )
}

pub fn design(args: &DesignArgs) -> Result<(), Box<dyn Error>> {
    let config = load_design_config(&args.config)?;
    let outcome = reference_orchestrator().design(&config.inputs)?;
    info!(lcop = outcome.lcop, product = %config.inputs.primary_product, "design evaluated");
    emit(
        &Stamped {
            provenance: provenance(stable_hash_string(&config)?, None),
            report: &outcome,
        },
        args.out.as_deref(),
    )
}

pub fn optimize(args: &OptimizeArgs) -> Result<(), Box<dyn Error>> {
    let config: DesignConfig = load_design_config(&args.config)?;
    let Some(optimization) = config.optimization.as_ref() else {
        return Err(SepError::Config(
            ErrorInfo::new(
                "missing-optimization",
                "configuration has no optimization section",
            )
            .with_context("path", args.config.display().to_string()),
        )
        .into());
    };
    let method = optimization.method()?;
    let max_iter = args.max_iter.unwrap_or(optimization.max_iter);
    let report = reference_orchestrator().optimize_process(
        &config.inputs,
        &optimization.variables,
        method,
        max_iter,
    )?;
    info!(
        success = report.success,
        min_value = report.min_value,
        evaluations = report.n_evaluations,
        "optimization finished"
    );

    let stamped = Stamped {
        provenance: provenance(stable_hash_string(&config)?, None),
        report: &report,
    };
    let Some(out) = args.out.as_deref() else {
        return emit(&stamped, None);
    };
    fs::create_dir_all(out)?;
    write_file(&out.join("report.json"), &to_json_pretty(&stamped)?)?;
    let names: Vec<&str> = optimization
        .variables
        .iter()
        .map(|variable| variable.name.as_str())
        .collect();
    write_trace(&out.join("trace.csv"), &names, &report)
}

fn write_trace(path: &Path, names: &[&str], report: &SearchReport) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["eval".to_string()];
    header.extend(names.iter().map(|name| name.to_string()));
    header.push("value".to_string());
    wtr.write_record(&header)?;
    for (idx, point) in report.trace.iter().enumerate() {
        let mut record = vec![idx.to_string()];
        record.extend(point.params.iter().map(|value| value.to_string()));
        record.push(point.value.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
