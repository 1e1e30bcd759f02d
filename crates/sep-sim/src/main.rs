use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    cost::{self, EstimateCostArgs},
    design::{self, DesignArgs, OptimizeArgs},
    flowsheet::{self, GraphArgs, RefineArgs, SimulateArgs, SuggestArgs, ValidateArgs},
};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "sep-sim", about = "Separation flowsheet simulation and design CLI")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a flowsheet's schema, graph invariants, and critic gate.
    Validate(ValidateArgs),
    /// Emit the stream/unit inspection graph.
    Graph(GraphArgs),
    /// Run a flowsheet once and report KPIs and OPEX.
    Simulate(SimulateArgs),
    /// Perturb the first unit's numeric parameters.
    Suggest(SuggestArgs),
    /// Alternate simulate and suggest for a number of rounds.
    Refine(RefineArgs),
    /// Estimate OPEX and CO2e from a KPI mapping.
    EstimateCost(EstimateCostArgs),
    /// Define, simulate, and cost a process design once.
    Design(DesignArgs),
    /// Minimize levelized cost over the configured design variables.
    Optimize(OptimizeArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);
    match cli.command {
        Command::Validate(args) => flowsheet::validate(&args),
        Command::Graph(args) => flowsheet::graph(&args),
        Command::Simulate(args) => flowsheet::simulate(&args),
        Command::Suggest(args) => flowsheet::suggest(&args),
        Command::Refine(args) => flowsheet::refine(&args),
        Command::EstimateCost(args) => cost::run(&args),
        Command::Design(args) => design::design(&args),
        Command::Optimize(args) => design::optimize(&args),
    }
}
