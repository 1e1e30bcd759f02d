//! Single-pass flowsheet execution.
//!
//! Units run strictly in declaration order against a working copy of the
//! declared stream table. Each executed unit writes its role-ordered outputs
//! back under its declared output names, so later units read processed
//! material. Units whose type has no registered behavior, or whose first input
//! is not a declared stream, are skipped and recorded as such.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cost::estimate_opex;
use crate::critic::Critic;
use crate::flowsheet::Flowsheet;
use crate::stream::Stream;
use crate::suggest::Perturber;
use crate::unit::UnitOp;
use crate::units::UnitRegistry;

/// Why a unit did not execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No behavior is registered for the unit's type tag.
    UnregisteredType {
        /// The unit type tag.
        unit_type: String,
    },
    /// The first declared input is not present in the stream table.
    MissingFeed {
        /// Name of the missing feed, or `None` when the unit has no inputs.
        stream: Option<String>,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnregisteredType { unit_type } => {
                write!(f, "no behavior registered for type '{unit_type}'")
            }
            SkipReason::MissingFeed { stream: Some(name) } => {
                write!(f, "feed stream '{name}' not found")
            }
            SkipReason::MissingFeed { stream: None } => write!(f, "unit has no inputs"),
        }
    }
}

/// Per-unit record of one execution pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UnitOutcome {
    /// The unit was simulated.
    Executed {
        /// Unit identifier.
        unit_id: String,
        /// Output streams keyed by role.
        outputs: IndexMap<String, Stream>,
        /// Role to declared output stream name, for roles that were bound.
        bindings: IndexMap<String, String>,
    },
    /// The unit was skipped.
    Skipped {
        /// Unit identifier.
        unit_id: String,
        /// Why execution was skipped.
        reason: SkipReason,
    },
}

impl UnitOutcome {
    /// Identifier of the unit this outcome belongs to.
    pub fn unit_id(&self) -> &str {
        match self {
            UnitOutcome::Executed { unit_id, .. } | UnitOutcome::Skipped { unit_id, .. } => {
                unit_id
            }
        }
    }

    /// Returns whether the unit executed.
    pub fn is_executed(&self) -> bool {
        matches!(self, UnitOutcome::Executed { .. })
    }
}

/// Results of a successful execution pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// KPIs keyed `"<unit_id>.<kpi>"` in insertion order.
    pub kpis: IndexMap<String, f64>,
    /// Aggregate operating cost score over `kpis`.
    #[serde(rename = "OPEX_score")]
    pub opex_score: f64,
    /// One outcome per unit, in declaration order.
    pub outcomes: Vec<UnitOutcome>,
    /// Final working stream table.
    pub streams: IndexMap<String, Stream>,
}

impl RunSummary {
    /// Outcome recorded for `unit_id`.
    pub fn outcome(&self, unit_id: &str) -> Option<&UnitOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.unit_id() == unit_id)
    }

    /// Identifiers of the units that were skipped.
    pub fn skipped(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_executed())
            .map(UnitOutcome::unit_id)
            .collect()
    }
}

/// Outcome of [`Orchestrator::run_once`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunReport {
    /// The flowsheet passed the critic and was executed.
    Ok(RunSummary),
    /// The critic rejected the flowsheet; nothing ran.
    Invalid {
        /// Critic message.
        reason: String,
    },
}

impl RunReport {
    /// Returns whether the run executed.
    pub fn is_ok(&self) -> bool {
        matches!(self, RunReport::Ok(_))
    }

    /// The run summary, when the run executed.
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunReport::Ok(summary) => Some(summary),
            RunReport::Invalid { .. } => None,
        }
    }

    /// The OPEX score, when the run executed.
    pub fn opex_score(&self) -> Option<f64> {
        self.summary().map(|summary| summary.opex_score)
    }
}

/// Couples the critic, the perturber, and the behavior registry.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    critic: Critic,
    perturber: Perturber,
    registry: UnitRegistry,
}

impl Orchestrator {
    /// Orchestrator with the standard registry and default perturbation range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the behavior registry.
    pub fn with_registry(mut self, registry: UnitRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the parameter perturber.
    pub fn with_perturber(mut self, perturber: Perturber) -> Self {
        self.perturber = perturber;
        self
    }

    /// The behavior registry in use.
    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// The critic in use.
    pub fn critic(&self) -> &Critic {
        &self.critic
    }

    /// Runs the critic and, if it passes, executes every unit once.
    pub fn run_once(&self, flowsheet: &Flowsheet) -> RunReport {
        let (ok, message) = self.critic.check(flowsheet);
        if !ok {
            warn!(flowsheet = %flowsheet.name, reason = %message, "critic rejected flowsheet");
            return RunReport::Invalid { reason: message };
        }
        info!(
            flowsheet = %flowsheet.name,
            units = flowsheet.units.len(),
            "running flowsheet"
        );

        let mut streams: IndexMap<String, Stream> = flowsheet
            .streams
            .iter()
            .map(|stream| (stream.name.clone(), stream.clone()))
            .collect();
        let declared: BTreeSet<&str> = flowsheet
            .streams
            .iter()
            .map(|stream| stream.name.as_str())
            .collect();
        let mut kpis = IndexMap::new();
        let outcomes = flowsheet
            .units
            .iter()
            .map(|unit| self.dispatch(unit, &declared, &mut streams, &mut kpis))
            .collect();

        let opex_score = estimate_opex(&kpis);
        info!(
            flowsheet = %flowsheet.name,
            kpis = kpis.len(),
            opex_score,
            "flowsheet run finished"
        );
        RunReport::Ok(RunSummary {
            kpis,
            opex_score,
            outcomes,
            streams,
        })
    }

    fn dispatch(
        &self,
        unit: &UnitOp,
        declared: &BTreeSet<&str>,
        streams: &mut IndexMap<String, Stream>,
        kpis: &mut IndexMap<String, f64>,
    ) -> UnitOutcome {
        let skip = |reason: SkipReason| {
            warn!(unit = %unit.id, %reason, "skipping unit");
            UnitOutcome::Skipped {
                unit_id: unit.id.clone(),
                reason,
            }
        };
        let Some(behavior) = self.registry.instantiate(unit) else {
            return skip(SkipReason::UnregisteredType {
                unit_type: unit.unit_type.clone(),
            });
        };
        // Only declared streams can feed a unit; the table holds their latest state.
        let feed = unit
            .feed_name()
            .filter(|name| declared.contains(name))
            .and_then(|name| streams.get(name));
        let Some(feed) = feed else {
            return skip(SkipReason::MissingFeed {
                stream: unit.feed_name().map(str::to_string),
            });
        };

        debug!(unit = %unit.id, unit_type = %unit.unit_type, feed = %feed.name, "dispatching unit");
        let result = behavior.simulate(feed);
        for (name, value) in result.kpis {
            kpis.insert(format!("{}.{}", unit.id, name), value);
        }

        let mut outputs = IndexMap::new();
        let mut bindings = IndexMap::new();
        for (idx, (role, stream)) in result.outputs.into_iter().enumerate() {
            match unit.outputs.get(idx) {
                Some(target) => {
                    let bound = stream.renamed(target.as_str());
                    streams.insert(target.clone(), bound.clone());
                    bindings.insert(role.clone(), target.clone());
                    outputs.insert(role, bound);
                }
                None => {
                    outputs.insert(role, stream);
                }
            }
        }
        UnitOutcome::Executed {
            unit_id: unit.id.clone(),
            outputs,
            bindings,
        }
    }

    /// Returns a copy of `flowsheet` with the first unit's numeric parameters
    /// perturbed. A flowsheet without units comes back unchanged.
    pub fn suggest<R: Rng + ?Sized>(&self, flowsheet: &Flowsheet, rng: &mut R) -> Flowsheet {
        let mut next = flowsheet.clone();
        if let Some(first) = next.units.first_mut() {
            first.params = self.perturber.suggest_edit(&first.params, rng);
            debug!(unit = %first.id, "perturbed unit parameters");
        }
        next
    }
}
