//! Runner trait
//!
//! Implement this trait to plug a trial strategy into the benchmark
//! harness.

use crate::error::SpeculationError;
use crate::types::{RunMode, TrialResult};

/// Executes one trial at a time
#[async_trait::async_trait]
pub trait TrialRunner: Send + Sync {
    /// Value a successful trial carries
    type Value: Send;

    /// How this runner executes trials
    fn mode(&self) -> RunMode;

    /// Execute one trial
    async fn run_trial(&self) -> Result<TrialResult<Self::Value>, SpeculationError>;
}
