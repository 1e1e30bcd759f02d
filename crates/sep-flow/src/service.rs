//! Request/response surface for agent tooling.
//!
//! Every entry point returns a [`Response`] envelope tagged by `status`, so
//! construction failures surface as data rather than as errors.

use indexmap::IndexMap;
use rand::Rng;
use sep_core::errors::SepError;
use serde::{Deserialize, Serialize};

use crate::cost::{estimate_cost as cost_of, CostEstimate, DEFAULT_GRID_FACTOR};
use crate::engine::{Orchestrator, RunReport, RunSummary};
use crate::flowsheet::{Flowsheet, FlowsheetDescription};
use crate::loader::{parse_flowsheet, DescriptionFormat};
use crate::stream::Stream;

/// Status-tagged response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response<T> {
    /// Successful payload.
    Ok(T),
    /// The request was well-formed but the critic rejected the flowsheet.
    Invalid {
        /// Critic message.
        reason: String,
    },
    /// The request could not be served.
    Error {
        /// Failure description.
        error: String,
    },
}

impl<T> Response<T> {
    fn error(error: impl Into<String>) -> Self {
        Response::Error {
            error: error.into(),
        }
    }

    /// Returns whether the response carries a payload.
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }
}

impl<T> From<SepError> for Response<T> {
    fn from(err: SepError) -> Self {
        Response::error(err.to_string())
    }
}

impl From<RunReport> for Response<RunSummary> {
    fn from(report: RunReport) -> Self {
        match report {
            RunReport::Ok(summary) => Response::Ok(summary),
            RunReport::Invalid { reason } => Response::Invalid { reason },
        }
    }
}

/// Payload of [`optimize_flowsheet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFlowsheet {
    /// The perturbed flowsheet.
    pub flowsheet: Flowsheet,
}

/// Payload of [`run_speciation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciatedStream {
    /// The speciated stream.
    pub stream_out: Stream,
}

/// External aqueous speciation collaborator.
pub trait Speciator {
    /// Returns the speciated form of `stream`.
    fn speciate(&self, stream: &Stream) -> Result<Stream, SepError>;
}

/// Builds a flowsheet from `text` and runs it once.
pub fn simulate_flowsheet(
    orchestrator: &Orchestrator,
    text: &str,
    format: DescriptionFormat,
) -> Response<RunSummary> {
    if text.trim().is_empty() {
        return Response::error("flowsheet description missing");
    }
    match parse_flowsheet(text, format) {
        Ok(flowsheet) => orchestrator.run_once(&flowsheet).into(),
        Err(err) => err.into(),
    }
}

/// Validates `description` and returns one suggestion step applied to it.
pub fn optimize_flowsheet<R: Rng + ?Sized>(
    orchestrator: &Orchestrator,
    description: FlowsheetDescription,
    rng: &mut R,
) -> Response<SuggestedFlowsheet> {
    match Flowsheet::from_description(description) {
        Ok(flowsheet) => Response::Ok(SuggestedFlowsheet {
            flowsheet: orchestrator.suggest(&flowsheet, rng),
        }),
        Err(err) => err.into(),
    }
}

/// OPEX and CO2e for a KPI mapping at the default grid factor.
pub fn estimate_cost(kpis: &IndexMap<String, f64>) -> Response<CostEstimate> {
    Response::Ok(cost_of(kpis, DEFAULT_GRID_FACTOR))
}

/// Forwards `stream` to the configured speciation collaborator.
pub fn run_speciation(
    stream: &Stream,
    speciator: Option<&dyn Speciator>,
) -> Response<SpeciatedStream> {
    let Some(speciator) = speciator else {
        return Response::error("speciation collaborator not configured");
    };
    if let Err(err) = stream.validate() {
        return err.into();
    }
    match speciator.speciate(stream) {
        Ok(stream_out) => Response::Ok(SpeciatedStream { stream_out }),
        Err(err) => err.into(),
    }
}
