//! Error types for speculation runs
//!
//! Provides error handling for:
//! - A chosen branch that stopped on cancellation
//! - Tasks that died without reporting an outcome
//! - Invalid run parameters

use crate::types::{Branch, DecisionOutcome};

/// Failure of a single trial
///
/// Every variant is local to one trial; none of them should stop a
/// benchmark.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeculationError {
    /// The branch selected by the decision reported cancellation itself
    #[error("chosen branch {branch} was still racing cancellation when selected (decision value {value})", value = .decision.value)]
    ChosenBranchCancelled {
        /// Branch that was selected
        branch: Branch,
        /// Decision that selected it
        decision: DecisionOutcome,
    },

    /// A task panicked or dropped its outcome slot unwritten
    #[error("{task} task failed: {reason}")]
    TaskFailed {
        /// Task name
        task: &'static str,
        /// What went wrong
        reason: String,
    },
}

impl SpeculationError {
    /// Create a task failure
    #[inline]
    pub fn task_failed(task: &'static str, reason: impl Into<String>) -> Self {
        Self::TaskFailed {
            task,
            reason: reason.into(),
        }
    }

    /// Check if the chosen branch was cancelled
    #[inline]
    #[must_use]
    pub fn is_chosen_branch_cancelled(&self) -> bool {
        matches!(self, Self::ChosenBranchCancelled { .. })
    }

    /// Decision that preceded the failure, if one was reached
    #[inline]
    #[must_use]
    pub fn decision(&self) -> Option<&DecisionOutcome> {
        match self {
            Self::ChosenBranchCancelled { decision, .. } => Some(decision),
            Self::TaskFailed { .. } => None,
        }
    }
}

/// Invalid run parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// No SHA-256 hex digest has that many leading zeros
    #[error("difficulty {difficulty} exceeds the {max} hex digits of a SHA-256 digest")]
    DifficultyTooHigh {
        /// Requested difficulty
        difficulty: usize,
        /// Largest satisfiable difficulty
        max: usize,
    },
}
