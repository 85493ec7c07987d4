//! Decision rule and the workloads it chooses between
//!
//! A [`Scenario`] is shared by both runners, so the sequential baseline
//! and the speculative run always apply the same rule to the same inputs.

use crate::params::SpeculationParams;
use crate::types::Branch;
use speculate_workload::{Decision, MatrixTrace, PrimeSearch, ProofOfWork, Workload};
use std::sync::Arc;

/// The real workloads: matrix trace deciding between proof-of-work and prime search
pub type StandardScenario = Scenario<MatrixTrace, ProofOfWork, PrimeSearch>;

/// A decision workload, two candidate branches and a threshold
#[derive(Debug)]
pub struct Scenario<D, A, B> {
    decision: Arc<D>,
    branch_a: Arc<A>,
    branch_b: Arc<B>,
    threshold: i64,
}

impl<D, A, B> Clone for Scenario<D, A, B> {
    fn clone(&self) -> Self {
        Self {
            decision: Arc::clone(&self.decision),
            branch_a: Arc::clone(&self.branch_a),
            branch_b: Arc::clone(&self.branch_b),
            threshold: self.threshold,
        }
    }
}

impl<D, A, B> Scenario<D, A, B>
where
    D: Decision,
    A: Workload,
    B: Workload,
{
    /// Create a scenario
    #[must_use]
    pub fn new(decision: D, branch_a: A, branch_b: B, threshold: i64) -> Self {
        Self {
            decision: Arc::new(decision),
            branch_a: Arc::new(branch_a),
            branch_b: Arc::new(branch_b),
            threshold,
        }
    }

    /// Branch demanded by a decision value
    #[inline]
    #[must_use]
    pub fn select(&self, value: i64) -> Branch {
        select_branch(value, self.threshold)
    }

    /// Workload name of a branch
    #[must_use]
    pub fn branch_name(&self, branch: Branch) -> &'static str {
        match branch {
            Branch::A => self.branch_a.name(),
            Branch::B => self.branch_b.name(),
        }
    }

    /// Decision threshold
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub(crate) fn decision(&self) -> &Arc<D> {
        &self.decision
    }

    pub(crate) fn branch_a(&self) -> &Arc<A> {
        &self.branch_a
    }

    pub(crate) fn branch_b(&self) -> &Arc<B> {
        &self.branch_b
    }
}

impl StandardScenario {
    /// Build the real workloads from run parameters
    ///
    /// With a `seed`, the decision matrices are reproducible.
    #[must_use]
    pub fn standard(params: &SpeculationParams, seed: Option<u64>) -> Self {
        let decision = match seed {
            Some(seed) => MatrixTrace::new(params.matrix_size).with_seed(seed),
            None => MatrixTrace::new(params.matrix_size),
        };
        Self::new(
            decision,
            ProofOfWork::new(params.block_data.clone(), params.difficulty),
            PrimeSearch::new(params.prime_bound),
            params.threshold,
        )
    }
}

/// Branch A iff `value > threshold`
#[inline]
#[must_use]
pub fn select_branch(value: i64, threshold: i64) -> Branch {
    if value > threshold {
        Branch::A
    } else {
        Branch::B
    }
}
