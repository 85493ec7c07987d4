//! Prime enumeration (candidate branch B)

use crate::cancel::CancelSignal;
use crate::error::WorkloadError;
use crate::workload::Workload;

/// Cancellable trial-division search for all primes in `[2, bound)`
#[derive(Debug, Clone, Copy)]
pub struct PrimeSearch {
    bound: u64,
}

impl PrimeSearch {
    /// Create a search with an exclusive upper bound
    #[inline]
    #[must_use]
    pub fn new(bound: u64) -> Self {
        Self { bound }
    }

    /// Exclusive upper bound
    #[inline]
    #[must_use]
    pub fn bound(&self) -> u64 {
        self.bound
    }
}

impl Workload for PrimeSearch {
    type Output = Vec<u64>;

    fn name(&self) -> &'static str {
        "prime-search"
    }

    fn run(&self, signal: &CancelSignal) -> Result<Vec<u64>, WorkloadError> {
        let mut primes = Vec::new();
        for candidate in 2..self.bound {
            signal.check()?;
            if is_prime(candidate) {
                primes.push(candidate);
            }
        }
        tracing::debug!(bound = self.bound, found = primes.len(), "prime search finished");
        Ok(primes)
    }
}

/// Trial division up to the square root
#[must_use]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}
