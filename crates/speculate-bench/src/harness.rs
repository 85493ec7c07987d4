//! Benchmark harness
//!
//! Runs the sequential series, then the speculative series, a fixed number
//! of trials each. A failed trial is logged and left out of the samples;
//! it never stops the series.

use speculate_core::{RunMode, SpeculationError, TrialResult, TrialRunner};
use speculate_workload::CancelSignal;
use std::time::Duration;

/// Samples collected by one series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOutcome {
    /// Runner mode
    pub mode: RunMode,
    /// Total time of each successful trial, in order
    pub durations: Vec<Duration>,
    /// Trials that returned an error
    pub failures: usize,
}

impl SeriesOutcome {
    fn new(mode: RunMode) -> Self {
        Self {
            mode,
            durations: Vec::new(),
            failures: 0,
        }
    }
}

/// Samples from both series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchOutcome {
    /// Sequential series
    pub sequential: SeriesOutcome,
    /// Speculative series
    pub speculative: SeriesOutcome,
    /// Shutdown was requested before all trials ran
    pub interrupted: bool,
}

/// Repeats both runners and collects their timings
///
/// Runners are built per trial by the factories, which receive the trial
/// index.
pub struct Harness<S, P> {
    trials: usize,
    pause: Duration,
    sequential: S,
    speculative: P,
    shutdown: CancelSignal,
}

impl<S, P, RS, RP> Harness<S, P>
where
    S: Fn(usize) -> RS,
    P: Fn(usize) -> RP,
    RS: TrialRunner,
    RP: TrialRunner,
{
    /// Create a harness
    pub fn new(trials: usize, pause: Duration, sequential: S, speculative: P) -> Self {
        Self {
            trials,
            pause,
            sequential,
            speculative,
            shutdown: CancelSignal::never(),
        }
    }

    /// Stop scheduling trials once `shutdown` fires
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancelSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Run both series
    pub async fn run(&self) -> BenchOutcome {
        println!("--- STARTING SEQUENTIAL RUN ---");
        let sequential = self.run_series(RunMode::Sequential, &self.sequential).await;

        println!("\n--- STARTING SPECULATIVE RUN ---");
        let speculative = self.run_series(RunMode::Speculative, &self.speculative).await;

        let completed = sequential.durations.len()
            + sequential.failures
            + speculative.durations.len()
            + speculative.failures;

        BenchOutcome {
            sequential,
            speculative,
            interrupted: completed < 2 * self.trials,
        }
    }

    async fn run_series<F, R>(&self, mode: RunMode, factory: &F) -> SeriesOutcome
    where
        F: Fn(usize) -> R,
        R: TrialRunner,
    {
        let mut series = SeriesOutcome::new(mode);

        for trial in 0..self.trials {
            if self.shutdown.is_cancelled() {
                tracing::warn!(%mode, trial, "shutdown requested, skipping remaining trials");
                break;
            }

            let runner = factory(trial);
            match runner.run_trial().await {
                Ok(result) => {
                    println!("{}", progress_line(&result));
                    series.durations.push(result.total_elapsed);
                }
                Err(err) => {
                    println!("{}", failure_line(mode, &err));
                    tracing::warn!(%mode, trial, error = %err, "trial failed");
                    series.failures += 1;
                }
            }

            if trial + 1 < self.trials {
                tokio::select! {
                    () = tokio::time::sleep(self.pause) => {}
                    () = self.shutdown.cancelled() => {}
                }
            }
        }

        tracing::info!(
            %mode,
            succeeded = series.durations.len(),
            failed = series.failures,
            "series finished"
        );
        series
    }
}

/// Console line for a successful trial
#[must_use]
pub fn progress_line<V>(trial: &TrialResult<V>) -> String {
    let prefix = format!(
        "[{}] decision (trace > threshold): {}. branch: {} ({}). decision time: {:?}",
        trial.mode, trial.decision.value, trial.chosen, trial.branch_name, trial.decision.elapsed
    );
    match trial.mode {
        RunMode::Sequential => format!(
            "{prefix}, compute time: {:?}, total time: {:?}",
            trial.branch_elapsed, trial.total_elapsed
        ),
        RunMode::Speculative => format!("{prefix}, total time: {:?}", trial.total_elapsed),
    }
}

/// Console line for a failed trial
#[must_use]
pub fn failure_line(mode: RunMode, err: &SpeculationError) -> String {
    match err.decision() {
        Some(decision) => format!(
            "[{mode}] error after decision {} (decision time: {:?}): {err}",
            decision.value, decision.elapsed
        ),
        None => format!("[{mode}] error: {err}"),
    }
}
