//! Benchmark configuration
//!
//! Values come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. An optional TOML settings file
//! 3. Command-line flags

use crate::error::ConfigError;
use serde::Deserialize;
use speculate_core::SpeculationParams;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Trials per series unless configured otherwise
pub const DEFAULT_TRIALS: usize = 30;

/// Pause between consecutive trials unless configured otherwise
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

/// Full benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Workload parameters
    pub params: SpeculationParams,
    /// Trials per series
    pub trials: usize,
    /// Sleep between trials
    pub pause: Duration,
    /// Base seed for decision matrices; trial `i` uses `seed + i`
    pub seed: Option<u64>,
    /// Where the report is written
    pub report_path: PathBuf,
}

impl BenchConfig {
    /// Create config with default trial count and pause
    #[must_use]
    pub fn new(params: SpeculationParams, report_path: impl Into<PathBuf>) -> Self {
        Self {
            params,
            trials: DEFAULT_TRIALS,
            pause: DEFAULT_PAUSE,
            seed: None,
            report_path: report_path.into(),
        }
    }

    /// Set trials per series
    #[inline]
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Set pause between trials
    #[inline]
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Make decision data reproducible
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overlay values present in a settings file
    #[must_use]
    pub fn apply_settings(mut self, settings: &Settings) -> Self {
        if let Some(trials) = settings.trials {
            self.trials = trials;
        }
        if let Some(pause_ms) = settings.pause_ms {
            self.pause = Duration::from_millis(pause_ms);
        }
        if let Some(seed) = settings.seed {
            self.seed = Some(seed);
        }
        if let Some(block_data) = &settings.block_data {
            self.params.block_data.clone_from(block_data);
        }
        self
    }

    /// Decision seed for a given trial index
    #[inline]
    #[must_use]
    pub fn seed_for_trial(&self, trial: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(trial as u64))
    }

    /// Check invariants
    ///
    /// # Errors
    /// - `ConfigError::ZeroTrials` if `trials` is zero
    /// - `ConfigError::Params` if the workload parameters are invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        self.params.validate()?;
        Ok(())
    }

    /// Parameter banner printed before the first trial
    #[must_use]
    pub fn banner(&self) -> String {
        format!(
            "Starting simulation with:\n  n (matrix): {}\n  threshold (trace): {}\n  difficulty (PoW): {}\n  max (primes): {}\n  file: {}\n",
            self.params.matrix_size,
            self.params.threshold,
            self.params.difficulty,
            self.params.prime_bound,
            self.report_path.display(),
        )
    }
}

/// Optional TOML settings file
///
/// ```toml
/// trials = 10
/// pause_ms = 50
/// seed = 7
/// block_data = "genesis"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Trials per series
    pub trials: Option<usize>,
    /// Pause between trials in milliseconds
    pub pause_ms: Option<u64>,
    /// Base decision seed
    pub seed: Option<u64>,
    /// Proof-of-work block data
    pub block_data: Option<String>,
}

impl Settings {
    /// Parse settings from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a settings file
    ///
    /// # Errors
    /// Returns `ConfigError::Read` if the file cannot be read, or
    /// `ConfigError::Parse` if its contents are invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SpeculationParams {
        SpeculationParams::new(2, 0, 1, 10).unwrap()
    }

    #[test]
    fn defaults_are_thirty_trials_with_short_pause() {
        let config = BenchConfig::new(params(), "out.txt");
        assert_eq!(config.trials, 30);
        assert_eq!(config.pause, Duration::from_millis(100));
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn settings_overlay_only_present_values() {
        let settings = Settings::from_toml_str("trials = 5\nblock_data = \"genesis\"").unwrap();
        let config = BenchConfig::new(params(), "out.txt")
            .with_pause(Duration::from_millis(7))
            .apply_settings(&settings);

        assert_eq!(config.trials, 5);
        assert_eq!(config.pause, Duration::from_millis(7));
        assert_eq!(config.params.block_data, "genesis");
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        assert!(matches!(
            Settings::from_toml_str("trails = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_settings_file_reports_path() {
        let err = Settings::from_file(Path::new("/nonexistent/speculate.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/speculate.toml"));
    }

    #[test]
    fn zero_trials_is_invalid() {
        let config = BenchConfig::new(params(), "out.txt").with_trials(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTrials)));
    }

    #[test]
    fn trial_seeds_advance_from_base() {
        let config = BenchConfig::new(params(), "out.txt").with_seed(u64::MAX);
        assert_eq!(config.seed_for_trial(0), Some(u64::MAX));
        assert_eq!(config.seed_for_trial(1), Some(0));
        assert_eq!(BenchConfig::new(params(), "x").seed_for_trial(3), None);
    }

    #[test]
    fn banner_lists_parameters() {
        let banner = BenchConfig::new(params(), "report.txt").banner();
        assert!(banner.contains("n (matrix): 2"));
        assert!(banner.contains("max (primes): 10"));
        assert!(banner.contains("file: report.txt"));
    }
}
