//! Speculate Core - speculative vs. sequential execution
//!
//! Two ways to run a decision-dependent computation:
//! - [`SequentialRunner`]: decide, then compute only the chosen branch
//! - [`SpeculativeRunner`]: decide while both branches already run, keep
//!   the chosen one and cancel the other
//!
//! # Example
//!
//! ```rust,ignore
//! use speculate_core::prelude::*;
//!
//! let params = SpeculationParams::new(2, 0, 1, 10)?;
//! let runner = SpeculativeRunner::new(Scenario::standard(&params, None));
//!
//! let trial = runner.run().await?;
//! println!("branch {} in {:?}", trial.chosen, trial.total_elapsed);
//! ```

// Core modules
pub mod error;
pub mod orchestrator;
pub mod params;
pub mod runner;
pub mod scenario;
pub mod sequential;
pub mod types;

// Re-exports for convenience
pub use error::{ParamsError, SpeculationError};
pub use orchestrator::SpeculativeRunner;
pub use params::SpeculationParams;
pub use runner::TrialRunner;
pub use scenario::{select_branch, Scenario, StandardScenario};
pub use sequential::SequentialRunner;
pub use types::{Branch, BranchOutcome, BranchValue, DecisionOutcome, RunId, RunMode, TrialResult};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Speculate Core
    pub use crate::{
        Branch, BranchValue, Scenario, SequentialRunner, SpeculationError, SpeculationParams,
        SpeculativeRunner, StandardScenario, TrialResult, TrialRunner,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
