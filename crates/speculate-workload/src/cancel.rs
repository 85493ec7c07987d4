//! Single-fire cancellation shared by one speculation run
//!
//! A [`CancellationScope`] is owned by exactly one orchestrator run. Tasks
//! never see the scope itself, only read-only [`CancelSignal`] handles,
//! so the owner is the only party that can fire it.

use tokio_util::sync::{CancellationToken, DropGuard};

/// Owning side of a cancellation signal
///
/// Firing consumes the scope, so a scope fires at most once. Dropping an
/// unfired scope fires it as well, which releases any task still polling
/// the signal when a run ends early.
#[derive(Debug)]
pub struct CancellationScope {
    guard: DropGuard,
    signal: CancelSignal,
}

impl CancellationScope {
    /// Create a fresh, unfired scope
    #[must_use]
    pub fn new() -> Self {
        Self::from_token(CancellationToken::new())
    }

    /// Create a scope that is also cancelled when `parent` fires
    ///
    /// Firing the child never affects the parent.
    #[must_use]
    pub fn child_of(parent: &CancelSignal) -> Self {
        Self::from_token(parent.token.child_token())
    }

    fn from_token(token: CancellationToken) -> Self {
        Self {
            signal: CancelSignal {
                token: token.clone(),
            },
            guard: token.drop_guard(),
        }
    }

    /// Read-only handle for a task bound to this scope
    #[inline]
    #[must_use]
    pub fn signal(&self) -> CancelSignal {
        self.signal.clone()
    }

    /// Whether the scope has been cancelled (by a parent, so far)
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// Fire the signal, consuming the scope
    pub fn fire(self) {
        tracing::trace!("cancellation scope fired");
        drop(self.guard);
    }
}

impl Default for CancellationScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a cancellation signal
///
/// Polling is a non-blocking atomic read.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    token: CancellationToken,
}

impl CancelSignal {
    /// A signal nothing can ever fire
    ///
    /// Used where a workload runs without cancellation control.
    #[must_use]
    pub fn never() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Whether the owning scope has fired
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Poll point for workloads
    ///
    /// # Errors
    /// Returns [`WorkloadError::Cancelled`](crate::WorkloadError::Cancelled)
    /// once the owning scope has fired.
    #[inline]
    pub fn check(&self) -> Result<(), crate::WorkloadError> {
        if self.is_cancelled() {
            Err(crate::WorkloadError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wait until the signal fires
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_scope_is_not_cancelled() {
        let scope = CancellationScope::new();
        let signal = scope.signal();
        assert!(!scope.is_cancelled());
        assert!(signal.check().is_ok());
    }

    #[test]
    fn fire_reaches_every_signal() {
        let scope = CancellationScope::new();
        let a = scope.signal();
        let b = scope.signal();

        scope.fire();

        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert_eq!(a.check(), Err(crate::WorkloadError::Cancelled));
    }

    #[test]
    fn dropping_scope_releases_signal() {
        let signal = {
            let scope = CancellationScope::new();
            scope.signal()
        };
        assert!(signal.is_cancelled());
    }

    #[test]
    fn child_follows_parent_but_not_the_reverse() {
        let parent = CancellationScope::new();
        let child = CancellationScope::child_of(&parent.signal());
        let child_signal = child.signal();

        child.fire();
        assert!(child_signal.is_cancelled());
        assert!(!parent.is_cancelled());

        let other_child = CancellationScope::child_of(&parent.signal());
        let other_signal = other_child.signal();
        parent.fire();
        assert!(other_signal.is_cancelled());
        drop(other_child);
    }

    #[test]
    fn never_signal_stays_quiet() {
        let signal = CancelSignal::never();
        let copy = signal.clone();
        drop(signal);
        assert!(!copy.is_cancelled());
    }
}
