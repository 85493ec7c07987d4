//! Error types for candidate workloads

/// Failure reported by a cancellable workload
///
/// Cancellation is the only way a candidate workload can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkloadError {
    /// The workload observed its cancellation signal before finishing
    #[error("workload cancelled")]
    Cancelled,
}

impl WorkloadError {
    /// Check if the workload stopped because of cancellation
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
