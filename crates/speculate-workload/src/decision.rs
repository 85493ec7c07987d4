//! Matrix-trace decision workload
//!
//! Fills two `size x size` matrices with digits in `[0, 9]` and returns
//! the trace of their product. Only the diagonal of the product is
//! computed, since nothing else contributes to the trace.

use crate::workload::Decision;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Dense square matrix, row-major
pub type Matrix = Vec<Vec<i64>>;

/// Decision workload: trace of the product of two random matrices
#[derive(Debug, Clone, Copy)]
pub struct MatrixTrace {
    size: usize,
    seed: Option<u64>,
}

impl MatrixTrace {
    /// Random matrices drawn from entropy on every evaluation
    #[inline]
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self { size, seed: None }
    }

    /// Reproducible matrices: every evaluation draws from the same seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Matrix dimension
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Decision for MatrixTrace {
    fn name(&self) -> &'static str {
        "matrix-trace"
    }

    fn evaluate(&self) -> i64 {
        let mut rng = self.rng();
        let a = random_matrix(self.size, &mut rng);
        let b = random_matrix(self.size, &mut rng);
        trace_of_product(&a, &b)
    }
}

/// A `size x size` matrix of digits in `[0, 9]`
pub fn random_matrix<R: Rng>(size: usize, rng: &mut R) -> Matrix {
    (0..size)
        .map(|_| (0..size).map(|_| rng.random_range(0..10)).collect())
        .collect()
}

/// `trace(a * b)` for square matrices of equal size
#[must_use]
pub fn trace_of_product(a: &Matrix, b: &Matrix) -> i64 {
    a.iter()
        .enumerate()
        .map(|(i, row)| row.iter().zip(b).map(|(x, b_row)| x * b_row[i]).sum::<i64>())
        .sum()
}
