//! Sequential baseline: decide first, then compute only the chosen branch

use crate::error::SpeculationError;
use crate::runner::TrialRunner;
use crate::scenario::Scenario;
use crate::types::{timed, Branch, BranchValue, DecisionOutcome, RunId, RunMode, TrialResult};
use speculate_workload::{CancelSignal, Decision, Workload, WorkloadError};
use std::time::Instant;

/// Runs the decision, then the chosen branch, on the calling thread
#[derive(Debug)]
pub struct SequentialRunner<D, A, B> {
    scenario: Scenario<D, A, B>,
}

impl<D, A, B> Clone for SequentialRunner<D, A, B> {
    fn clone(&self) -> Self {
        Self {
            scenario: self.scenario.clone(),
        }
    }
}

impl<D, A, B> SequentialRunner<D, A, B>
where
    D: Decision,
    A: Workload,
    B: Workload,
{
    /// Create a runner for a scenario
    #[must_use]
    pub fn new(scenario: Scenario<D, A, B>) -> Self {
        Self { scenario }
    }

    /// Scenario this runner executes
    #[inline]
    #[must_use]
    pub fn scenario(&self) -> &Scenario<D, A, B> {
        &self.scenario
    }

    /// Execute one sequential run, blocking the calling thread
    ///
    /// # Errors
    /// The branch runs without cancellation control, so this only fails if
    /// a workload reports cancellation on its own.
    pub fn run(&self) -> Result<TrialResult<BranchValue<A::Output, B::Output>>, SpeculationError> {
        let run_id = RunId::new();
        let start = Instant::now();

        let (value, elapsed) = timed(|| self.scenario.decision().evaluate());
        let decision = DecisionOutcome { value, elapsed };

        let chosen = self.scenario.select(decision.value);
        let branch_name = self.scenario.branch_name(chosen);
        let signal = CancelSignal::never();

        let (result, branch_elapsed) = match chosen {
            Branch::A => timed(|| self.scenario.branch_a().run(&signal).map(BranchValue::A)),
            Branch::B => timed(|| self.scenario.branch_b().run(&signal).map(BranchValue::B)),
        };
        let total_elapsed = start.elapsed();

        match result {
            Ok(value) => {
                tracing::debug!(%run_id, branch = %chosen, ?total_elapsed, "sequential run finished");
                Ok(TrialResult {
                    run_id,
                    mode: RunMode::Sequential,
                    chosen,
                    branch_name,
                    decision,
                    branch_elapsed,
                    total_elapsed,
                    value,
                })
            }
            Err(WorkloadError::Cancelled) => Err(SpeculationError::ChosenBranchCancelled {
                branch: chosen,
                decision,
            }),
        }
    }
}

#[async_trait::async_trait]
impl<D, A, B> TrialRunner for SequentialRunner<D, A, B>
where
    D: Decision,
    A: Workload,
    B: Workload,
{
    type Value = BranchValue<A::Output, B::Output>;

    fn mode(&self) -> RunMode {
        RunMode::Sequential
    }

    /// Moves the run to the blocking pool so the runtime stays responsive
    async fn run_trial(&self) -> Result<TrialResult<Self::Value>, SpeculationError> {
        let runner = self.clone();
        tokio::task::spawn_blocking(move || runner.run())
            .await
            .map_err(|err| SpeculationError::task_failed("sequential", err.to_string()))?
    }
}
