//! Speculate Workloads
//!
//! The computations a speculation run coordinates:
//! - A shared single-fire cancellation signal ([`CancellationScope`] / [`CancelSignal`])
//! - Two cancellable candidate workloads ([`ProofOfWork`], [`PrimeSearch`])
//! - A bounded, non-cancellable decision workload ([`MatrixTrace`])
//!
//! Candidate workloads are plain CPU-bound functions. They never block;
//! they poll their [`CancelSignal`] before every step and bail out with
//! [`WorkloadError::Cancelled`] once it fires.
//!
//! # Example
//!
//! ```rust
//! use speculate_workload::{CancelSignal, PrimeSearch, Workload};
//!
//! let primes = PrimeSearch::new(20).run(&CancelSignal::never()).unwrap();
//! assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19]);
//! ```

pub mod cancel;
pub mod decision;
pub mod error;
pub mod pow;
pub mod primes;
pub mod workload;

pub use cancel::{CancelSignal, CancellationScope};
pub use decision::{random_matrix, trace_of_product, Matrix, MatrixTrace};
pub use error::WorkloadError;
pub use pow::{leading_zero_hex_digits, PowSolution, ProofOfWork, DEFAULT_BLOCK_DATA, MAX_DIFFICULTY};
pub use primes::{is_prime, PrimeSearch};
pub use workload::{Decision, Workload};
