//! Core types for speculation runs
//!
//! Defines the values that flow between tasks and runners:
//! - Run identifiers
//! - Branch identifiers and values
//! - Per-task outcomes
//! - Per-trial results

use speculate_workload::WorkloadError;
use std::time::{Duration, Instant};
use ulid::Ulid;

/// Unique run identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate new run ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Candidate branch identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Chosen when the decision value exceeds the threshold
    A,
    /// Chosen otherwise
    B,
}

impl Branch {
    /// The other branch
    #[inline]
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// How a trial was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Decide, then compute only the chosen branch
    Sequential,
    /// Decide while both branches race, keep the chosen one
    Speculative,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => f.write_str("Sequential"),
            Self::Speculative => f.write_str("Speculative"),
        }
    }
}

/// Value produced by whichever branch was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchValue<A, B> {
    /// Output of branch A
    A(A),
    /// Output of branch B
    B(B),
}

impl<A, B> BranchValue<A, B> {
    /// Which branch produced the value
    #[inline]
    #[must_use]
    pub fn branch(&self) -> Branch {
        match self {
            Self::A(_) => Branch::A,
            Self::B(_) => Branch::B,
        }
    }
}

/// Output of the decision workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// Comparison value
    pub value: i64,
    /// Time spent computing it
    pub elapsed: Duration,
}

/// Output of one candidate branch task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOutcome<T> {
    /// Value on completion, or the reason it stopped
    pub result: Result<T, WorkloadError>,
    /// Time the branch ran
    pub elapsed: Duration,
}

impl<T> BranchOutcome<T> {
    /// Map the successful value, keeping timing
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BranchOutcome<U> {
        BranchOutcome {
            result: self.result.map(f),
            elapsed: self.elapsed,
        }
    }
}

/// Result of one successful trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult<V> {
    /// Run identifier
    pub run_id: RunId,
    /// How the trial was run
    pub mode: RunMode,
    /// Branch selected by the decision
    pub chosen: Branch,
    /// Workload name of the chosen branch
    pub branch_name: &'static str,
    /// Decision value and timing
    pub decision: DecisionOutcome,
    /// Time the chosen branch itself ran
    pub branch_elapsed: Duration,
    /// Run start to finish
    pub total_elapsed: Duration,
    /// Output of the chosen branch
    pub value: V,
}

/// Run `f` and measure it
pub(crate) fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let started = Instant::now();
    let value = f();
    (value, started.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_other_flips() {
        assert_eq!(Branch::A.other(), Branch::B);
        assert_eq!(Branch::B.other(), Branch::A);
    }

    #[test]
    fn branch_value_reports_its_branch() {
        let a: BranchValue<u8, ()> = BranchValue::A(1);
        let b: BranchValue<u8, ()> = BranchValue::B(());
        assert_eq!(a.branch(), Branch::A);
        assert_eq!(b.branch(), Branch::B);
    }

    #[test]
    fn outcome_map_keeps_elapsed() {
        let outcome = BranchOutcome {
            result: Ok(2),
            elapsed: Duration::from_millis(5),
        };
        let mapped = outcome.map(|v| v * 10);
        assert_eq!(mapped.result, Ok(20));
        assert_eq!(mapped.elapsed, Duration::from_millis(5));
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
