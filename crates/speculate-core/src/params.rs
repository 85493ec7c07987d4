//! Run parameters

use crate::error::ParamsError;
use speculate_workload::{DEFAULT_BLOCK_DATA, MAX_DIFFICULTY};

/// Parameters shared by both runners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeculationParams {
    /// Dimension of the decision matrices
    pub matrix_size: usize,
    /// Branch A is chosen when the decision value exceeds this
    pub threshold: i64,
    /// Leading zero hex digits required by the proof-of-work branch
    pub difficulty: usize,
    /// Exclusive upper bound of the prime search branch
    pub prime_bound: u64,
    /// Data hashed in front of the proof-of-work nonce
    pub block_data: String,
}

impl SpeculationParams {
    /// Create validated parameters with the default block data
    ///
    /// # Errors
    /// Returns `ParamsError::DifficultyTooHigh` if `difficulty` exceeds 64.
    /// A `matrix_size` of zero is valid: the decision value is then 0.
    pub fn new(
        matrix_size: usize,
        threshold: i64,
        difficulty: usize,
        prime_bound: u64,
    ) -> Result<Self, ParamsError> {
        let params = Self {
            matrix_size,
            threshold,
            difficulty,
            prime_bound,
            block_data: DEFAULT_BLOCK_DATA.to_string(),
        };
        params.validate()?;
        Ok(params)
    }

    /// Replace the block data
    #[inline]
    #[must_use]
    pub fn with_block_data(mut self, block_data: impl Into<String>) -> Self {
        self.block_data = block_data.into();
        self
    }

    /// Check invariants
    ///
    /// # Errors
    /// See [`SpeculationParams::new`].
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ParamsError::DifficultyTooHigh {
                difficulty: self.difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_params() {
        let params = SpeculationParams::new(2, 0, 1, 10).unwrap();
        assert_eq!(params.block_data, DEFAULT_BLOCK_DATA);
        assert_eq!(params.with_block_data("x").block_data, "x");
    }

    #[test]
    fn empty_matrix_is_accepted() {
        let params = SpeculationParams::new(0, 0, 1, 10).unwrap();
        assert_eq!(params.matrix_size, 0);
    }

    #[test]
    fn difficulty_limit_is_inclusive() {
        assert!(SpeculationParams::new(1, 0, 64, 10).is_ok());
        assert_eq!(
            SpeculationParams::new(1, 0, 65, 10),
            Err(ParamsError::DifficultyTooHigh {
                difficulty: 65,
                max: 64
            })
        );
    }
}
