use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{Orchestrator, RunReport};
use crate::flowsheet::Flowsheet;

/// One evaluate-then-perturb round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRound {
    /// Zero-based round index.
    pub round: usize,
    /// Flowsheet evaluated in this round.
    pub flowsheet: Flowsheet,
    /// Result of running it.
    pub report: RunReport,
}

/// Outcome of [`Orchestrator::refine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineReport {
    /// Rounds in execution order.
    pub rounds: Vec<RefineRound>,
    /// Index of the executed round with the lowest OPEX score.
    pub best_round: Option<usize>,
}

impl RefineReport {
    /// The round with the lowest score, if any round executed.
    pub fn best(&self) -> Option<&RefineRound> {
        self.best_round.and_then(|idx| self.rounds.get(idx))
    }
}

impl Orchestrator {
    /// Alternates [`Orchestrator::run_once`] and [`Orchestrator::suggest`] for
    /// `rounds` rounds, starting from `flowsheet`.
    ///
    /// A round whose score is NaN never becomes the best round.
    pub fn refine<R: Rng + ?Sized>(
        &self,
        flowsheet: &Flowsheet,
        rounds: usize,
        rng: &mut R,
    ) -> RefineReport {
        let mut current = flowsheet.clone();
        let mut history = Vec::with_capacity(rounds);
        let mut best: Option<(usize, f64)> = None;
        for round in 0..rounds {
            let report = self.run_once(&current);
            if let Some(score) = report.opex_score().filter(|score| !score.is_nan()) {
                if best.map_or(true, |(_, best_score)| score < best_score) {
                    best = Some((round, score));
                }
            }
            let next = self.suggest(&current, rng);
            history.push(RefineRound {
                round,
                flowsheet: current,
                report,
            });
            current = next;
        }
        info!(
            rounds,
            best_round = ?best.map(|(idx, _)| idx),
            "refine loop finished"
        );
        RefineReport {
            rounds: history,
            best_round: best.map(|(idx, _)| idx),
        }
    }
}
