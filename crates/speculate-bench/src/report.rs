//! Benchmark summary and report artifact

use crate::error::ReportError;
use speculate_core::{RunMode, SpeculationParams};
use std::path::Path;
use std::time::Duration;

const RULE: &str = "---------------------------------";

/// Aggregated result of both series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSummary {
    /// Mean total time of successful sequential trials
    pub mean_sequential: Duration,
    /// Mean total time of successful speculative trials
    pub mean_speculative: Duration,
    /// `mean_sequential / mean_speculative`
    pub speedup: f64,
    /// Successful sequential trials
    pub sequential_samples: usize,
    /// Successful speculative trials
    pub speculative_samples: usize,
}

impl ReportSummary {
    /// Aggregate per-trial durations
    ///
    /// # Errors
    /// - `ReportError::NoSamples` if either series is empty
    /// - `ReportError::ZeroMean` if the speculative mean rounds to zero,
    ///   leaving the speedup undefined
    pub fn from_samples(sequential: &[Duration], speculative: &[Duration]) -> Result<Self, ReportError> {
        let mean_sequential = mean_duration(sequential).ok_or(ReportError::NoSamples {
            mode: RunMode::Sequential,
        })?;
        let mean_speculative = mean_duration(speculative).ok_or(ReportError::NoSamples {
            mode: RunMode::Speculative,
        })?;

        Ok(Self {
            mean_sequential,
            mean_speculative,
            speedup: speedup(mean_sequential, mean_speculative).ok_or(ReportError::ZeroMean {
                mode: RunMode::Speculative,
            })?,
            sequential_samples: sequential.len(),
            speculative_samples: speculative.len(),
        })
    }

    /// Plain-text report
    #[must_use]
    pub fn render(&self, params: &SpeculationParams) -> String {
        let mut report = String::new();

        report.push_str("--- PERFORMANCE ANALYSIS ---\n");
        report.push_str(&format!(
            "Parameters: n={}, threshold={}, difficulty={}, max_primes={}\n",
            params.matrix_size, params.threshold, params.difficulty, params.prime_bound
        ));
        report.push_str(&format!(
            "Trials: sequential={}, speculative={}\n",
            self.sequential_samples, self.speculative_samples
        ));
        report.push_str(RULE);
        report.push('\n');
        report.push_str(&format!("Mean sequential time:   {:?}\n", self.mean_sequential));
        report.push_str(&format!("Mean speculative time:  {:?}\n", self.mean_speculative));
        report.push_str(RULE);
        report.push('\n');
        report.push_str(&format!(
            "Speedup (sequential / speculative): {:.2}\n",
            self.speedup
        ));

        report
    }
}

/// Arithmetic mean with integer nanosecond division
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn mean_duration(samples: &[Duration]) -> Option<Duration> {
    if samples.is_empty() {
        return None;
    }
    let total: u128 = samples.iter().map(Duration::as_nanos).sum();
    let mean = total / samples.len() as u128;
    Some(Duration::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX)))
}

/// `sequential / speculative`, or `None` when `speculative` is zero
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn speedup(sequential: Duration, speculative: Duration) -> Option<f64> {
    if speculative.is_zero() {
        return None;
    }
    Some(sequential.as_nanos() as f64 / speculative.as_nanos() as f64)
}

/// Write the report, replacing any existing file
///
/// # Errors
/// Returns `ReportError::Write` if the file cannot be written.
pub async fn write_report(path: &Path, text: &str) -> Result<(), ReportError> {
    tokio::fs::write(path, text)
        .await
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}
