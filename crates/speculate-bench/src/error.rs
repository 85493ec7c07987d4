//! Error types for the benchmark harness

use speculate_core::{ParamsError, RunMode};
use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("cannot read settings file {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for [`Settings`](crate::config::Settings)
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Run parameters rejected
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),

    /// A benchmark needs at least one trial per series
    #[error("trial count must be at least 1")]
    ZeroTrials,
}

/// Report errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Every trial of a series failed, so there is no mean
    #[error("no successful {mode} trials to aggregate")]
    NoSamples {
        /// Series without samples
        mode: RunMode,
    },

    /// A series averaged to zero time, so the speedup has no value
    #[error("mean {mode} time is zero; speedup is undefined")]
    ZeroMean {
        /// Series with the zero mean
        mode: RunMode,
    },

    /// Report file could not be written
    #[error("cannot write report to {path}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
