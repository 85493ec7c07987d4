//! Speculation Orchestrator
//!
//! One run launches the decision and both candidate branches at once,
//! then:
//! 1. **AwaitDecision**: waits for the decision outcome, before looking at any branch
//! 2. **Select**: branch A iff the decision value exceeds the threshold
//! 3. **AwaitChosen**: waits for the chosen branch, however long it takes
//! 4. **Cancel**: fires the run's cancellation scope, stopping the loser
//! 5. **Finish**: reports total time, or `ChosenBranchCancelled`
//!
//! Each task writes to its own oneshot slot, so finishing never blocks on
//! the orchestrator. The losing slot is dropped unread.
//!
//! Nothing bounds AwaitChosen. If the chosen branch never finishes (a
//! proof-of-work whose difficulty is never met), the run waits until a
//! parent signal cancels it.

use crate::error::SpeculationError;
use crate::runner::TrialRunner;
use crate::scenario::Scenario;
use crate::types::{Branch, BranchOutcome, BranchValue, DecisionOutcome, RunId, RunMode, TrialResult};
use speculate_workload::{CancelSignal, CancellationScope, Decision, Workload, WorkloadError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::Instrument;

/// Runs decision and both branches concurrently, keeping the chosen one
#[derive(Debug)]
pub struct SpeculativeRunner<D, A, B> {
    scenario: Scenario<D, A, B>,
    parent: Option<CancelSignal>,
}

impl<D, A, B> Clone for SpeculativeRunner<D, A, B> {
    fn clone(&self) -> Self {
        Self {
            scenario: self.scenario.clone(),
            parent: self.parent.clone(),
        }
    }
}

impl<D, A, B> SpeculativeRunner<D, A, B>
where
    D: Decision,
    A: Workload,
    B: Workload,
{
    /// Create a runner for a scenario
    #[must_use]
    pub fn new(scenario: Scenario<D, A, B>) -> Self {
        Self {
            scenario,
            parent: None,
        }
    }

    /// Nest every run's scope under `parent`
    ///
    /// When the parent fires, both branches of an in-flight run stop and
    /// the run reports `ChosenBranchCancelled`.
    #[must_use]
    pub fn with_parent(mut self, parent: CancelSignal) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Scenario this runner executes
    #[inline]
    #[must_use]
    pub fn scenario(&self) -> &Scenario<D, A, B> {
        &self.scenario
    }

    /// Execute one speculative run
    ///
    /// Must be called from within a Tokio runtime; the three workloads run
    /// on the blocking pool.
    ///
    /// # Errors
    /// - `SpeculationError::ChosenBranchCancelled` if the chosen branch
    ///   stopped on cancellation (only possible through a parent signal)
    /// - `SpeculationError::TaskFailed` if the decision or the chosen branch
    ///   panicked
    pub async fn run(
        &self,
    ) -> Result<TrialResult<BranchValue<A::Output, B::Output>>, SpeculationError> {
        let run_id = RunId::new();
        let span = tracing::debug_span!("speculate", %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: RunId,
    ) -> Result<TrialResult<BranchValue<A::Output, B::Output>>, SpeculationError> {
        let start = Instant::now();
        let scope = match &self.parent {
            Some(parent) => CancellationScope::child_of(parent),
            None => CancellationScope::new(),
        };

        let (decision_tx, decision_rx) = oneshot::channel();
        let (a_tx, a_rx) = oneshot::channel();
        let (b_tx, b_rx) = oneshot::channel();

        spawn_decision(Arc::clone(self.scenario.decision()), decision_tx);
        spawn_branch(Arc::clone(self.scenario.branch_a()), scope.signal(), a_tx);
        spawn_branch(Arc::clone(self.scenario.branch_b()), scope.signal(), b_tx);

        // An early return drops the scope, which releases both branches.
        let decision = decision_rx
            .await
            .map_err(|_| SpeculationError::task_failed("decision", "outcome slot closed"))?;

        let chosen = self.scenario.select(decision.value);
        let branch_name = self.scenario.branch_name(chosen);
        tracing::debug!(
            value = decision.value,
            threshold = self.scenario.threshold(),
            branch = %chosen,
            "decision resolved"
        );

        let received = match chosen {
            Branch::A => {
                drop(b_rx);
                a_rx.await.map(|outcome| outcome.map(BranchValue::A))
            }
            Branch::B => {
                drop(a_rx);
                b_rx.await.map(|outcome| outcome.map(BranchValue::B))
            }
        };

        scope.fire();
        let total_elapsed = start.elapsed();

        let outcome =
            received.map_err(|_| SpeculationError::task_failed(branch_name, "outcome slot closed"))?;

        match outcome.result {
            Ok(value) => {
                tracing::debug!(branch = %chosen, ?total_elapsed, "speculative run finished");
                Ok(TrialResult {
                    run_id,
                    mode: RunMode::Speculative,
                    chosen,
                    branch_name,
                    decision,
                    branch_elapsed: outcome.elapsed,
                    total_elapsed,
                    value,
                })
            }
            Err(WorkloadError::Cancelled) => {
                tracing::warn!(branch = %chosen, "chosen branch was cancelled");
                Err(SpeculationError::ChosenBranchCancelled {
                    branch: chosen,
                    decision,
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl<D, A, B> TrialRunner for SpeculativeRunner<D, A, B>
where
    D: Decision,
    A: Workload,
    B: Workload,
{
    type Value = BranchValue<A::Output, B::Output>;

    fn mode(&self) -> RunMode {
        RunMode::Speculative
    }

    async fn run_trial(&self) -> Result<TrialResult<Self::Value>, SpeculationError> {
        self.run().await
    }
}

fn spawn_decision<D: Decision>(decision: Arc<D>, slot: oneshot::Sender<DecisionOutcome>) {
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let value = decision.evaluate();
        let _ = slot.send(DecisionOutcome {
            value,
            elapsed: started.elapsed(),
        });
    });
}

fn spawn_branch<W: Workload>(
    workload: Arc<W>,
    signal: CancelSignal,
    slot: oneshot::Sender<BranchOutcome<W::Output>>,
) {
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let result = workload.run(&signal);
        let elapsed = started.elapsed();
        if let Err(err) = &result {
            tracing::trace!(workload = workload.name(), %err, ?elapsed, "branch stopped");
        }
        // A closed slot means this branch lost; nobody will read it.
        let _ = slot.send(BranchOutcome { result, elapsed });
    });
}
