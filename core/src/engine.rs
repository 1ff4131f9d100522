//! The sweep engine: runs every combination of a sweep.
//!
//! RULES:
//!   - Combinations run sequentially, in sweep order.
//!   - Each combination gets a fresh stream from the SeedPlan.
//!     No stream outlives or is shared beyond its own run.
//!   - A combination that fails is logged and recorded, never fatal.
//!     Only store errors abort the sweep.

use crate::{
    combination::{ParamField, ParameterCombination},
    config::SweepConfig,
    error::SimResult,
    grouping::{self, Group},
    rng::SeedPlan,
    simulation::{self, RunOutcome},
    stats::OutcomeSummary,
    store::ResultStore,
    sweep::ParameterSweep,
    types::{CombinationId, RunId, Seed},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fresh identifier for a sweep run.
pub fn new_run_id() -> RunId {
    format!("sweep-{}", uuid::Uuid::new_v4())
}

/// A combination whose run was rejected, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct CombinationFailure {
    pub id: CombinationId,
    pub combination: ParameterCombination,
    pub reason: String,
}

/// Everything one sweep produced.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub run_id: RunId,
    pub iterations: u32,
    /// All combinations in sweep order; index = CombinationId.
    pub combinations: Vec<ParameterCombination>,
    pub outcomes: BTreeMap<CombinationId, RunOutcome>,
    pub failures: Vec<CombinationFailure>,
}

impl SweepReport {
    pub fn completed_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn group_by(&self, varying: ParamField) -> Vec<Group<'_>> {
        grouping::group_by(&self.combinations, &self.outcomes, varying)
    }

    pub fn summary(&self, id: CombinationId) -> Option<OutcomeSummary> {
        self.outcomes.get(&id).and_then(OutcomeSummary::from_outcome)
    }

    /// The combination with the highest mean monthly profit.
    pub fn best_by_mean_profit(&self) -> Option<(CombinationId, f64)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.mean_profit().map(|mean| (*id, mean)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

pub struct SweepEngine {
    pub run_id: RunId,
    sweep: ParameterSweep,
    seeds: SeedPlan,
    iterations: u32,
}

impl SweepEngine {
    pub fn new(run_id: RunId, config: SweepConfig) -> SimResult<Self> {
        let sweep = ParameterSweep::new(config.parameters)?;
        Ok(Self {
            run_id,
            sweep,
            seeds: SeedPlan::new(config.seed, config.seed_mode),
            iterations: config.iterations,
        })
    }

    pub fn sweep(&self) -> &ParameterSweep {
        &self.sweep
    }

    pub fn seed_for(&self, id: CombinationId) -> Seed {
        self.seeds.seed_for(id)
    }

    /// Run every combination without persisting anything.
    pub fn run(&self) -> SimResult<SweepReport> {
        self.run_inner(None)
    }

    /// Run every combination and persist each one as it finishes.
    pub fn run_with_store(&self, store: &ResultStore) -> SimResult<SweepReport> {
        self.run_inner(Some(store))
    }

    fn run_inner(&self, store: Option<&ResultStore>) -> SimResult<SweepReport> {
        log::info!(
            "sweep {}: {} combinations x {} months, master seed {}",
            self.run_id,
            self.sweep.len(),
            self.iterations,
            self.seeds.master_seed()
        );

        let mut report = SweepReport {
            run_id: self.run_id.clone(),
            iterations: self.iterations,
            combinations: Vec::with_capacity(self.sweep.len()),
            outcomes: BTreeMap::new(),
            failures: Vec::new(),
        };

        for (id, combination) in self.sweep.enumerate() {
            let seed = self.seeds.seed_for(id);
            match simulation::simulate(&combination, seed, self.iterations) {
                Ok(outcome) => {
                    log::debug!("{id} [{combination}] final amount {:.2}", outcome.final_amount);
                    if let Some(store) = store {
                        store.record_completed(&self.run_id, id, &combination, seed, &outcome)?;
                    }
                    report.outcomes.insert(id, outcome);
                }
                Err(e) => {
                    log::warn!("{id} [{combination}] skipped: {e}");
                    let reason = e.to_string();
                    if let Some(store) = store {
                        store.record_failed(&self.run_id, id, &combination, seed, &reason)?;
                    }
                    report.failures.push(CombinationFailure { id, combination, reason });
                }
            }
            report.combinations.push(combination);
        }

        log::info!(
            "sweep {}: {} completed, {} failed",
            self.run_id,
            report.completed_count(),
            report.failures.len()
        );
        Ok(report)
    }
}
