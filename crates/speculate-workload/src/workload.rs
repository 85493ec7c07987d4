//! Workload traits
//!
//! Implement [`Workload`] for a candidate branch and [`Decision`] for the
//! computation that picks between candidates.

use crate::cancel::CancelSignal;
use crate::error::WorkloadError;

/// A cancellable candidate computation
///
/// Implementations must poll `signal` at least once per unit of work and
/// return [`WorkloadError::Cancelled`] as soon as it fires, discarding
/// partial results.
pub trait Workload: Send + Sync + 'static {
    /// Value produced on natural completion
    type Output: Send + 'static;

    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Run to completion or cancellation
    ///
    /// # Errors
    /// Returns [`WorkloadError::Cancelled`] if `signal` fires first.
    fn run(&self, signal: &CancelSignal) -> Result<Self::Output, WorkloadError>;
}

/// A bounded, non-cancellable computation yielding a comparison value
pub trait Decision: Send + Sync + 'static {
    /// Short name for logs
    fn name(&self) -> &'static str {
        "decision"
    }

    /// Compute the comparison value
    fn evaluate(&self) -> i64;
}
