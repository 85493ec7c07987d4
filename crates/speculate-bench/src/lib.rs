//! Speculate Bench - repeated-trial comparison of both runners
//!
//! - [`cli`]: argument parsing for the `speculate` binary
//! - [`config`]: defaults, settings file and flag layering
//! - [`harness`]: runs both series and collects timings
//! - [`report`]: means, speedup and the report artifact
//! - [`logging`]: tracing subscriber setup

pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod report;

pub use config::{BenchConfig, Settings, DEFAULT_PAUSE, DEFAULT_TRIALS};
pub use error::{ConfigError, ReportError};
pub use harness::{BenchOutcome, Harness, SeriesOutcome};
pub use report::{mean_duration, write_report, ReportSummary};
