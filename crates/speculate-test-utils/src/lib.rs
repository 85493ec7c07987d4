//! Testing utilities for Speculate workspace
//!
//! Controllable stand-ins for the real workloads.

#![allow(missing_docs)]

use speculate_workload::{CancelSignal, Decision, Workload, WorkloadError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Decision returning a fixed value after an optional delay
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision {
    pub value: i64,
    pub delay: Duration,
}

impl FixedDecision {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Decision for FixedDecision {
    fn evaluate(&self) -> i64 {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.value
    }
}

/// Decision that panics
#[derive(Debug, Clone, Copy)]
pub struct PanickingDecision;

impl Decision for PanickingDecision {
    fn evaluate(&self) -> i64 {
        panic!("decision exploded");
    }
}

/// Shared view of what a [`SlowBranch`] did
#[derive(Debug, Clone, Default)]
pub struct Probe {
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    steps: Arc<AtomicU64>,
}

impl Probe {
    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::SeqCst)
    }

    /// Poll until the branch has returned, up to `timeout`
    pub async fn wait_stopped(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.stopped() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        self.stopped()
    }
}

/// Branch doing `steps` sleeps of `step`, polling cancellation before each
#[derive(Debug, Clone)]
pub struct SlowBranch {
    name: &'static str,
    value: u64,
    steps: u64,
    step: Duration,
    probe: Probe,
}

impl SlowBranch {
    pub fn new(name: &'static str, value: u64, steps: u64, step: Duration) -> Self {
        Self {
            name,
            value,
            steps,
            step,
            probe: Probe::default(),
        }
    }

    /// Finishes on its first poll
    pub fn instant(name: &'static str, value: u64) -> Self {
        Self::new(name, value, 0, Duration::ZERO)
    }

    /// Never finishes unless cancelled
    pub fn endless(name: &'static str) -> Self {
        Self::new(name, 0, u64::MAX, Duration::from_millis(1))
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

impl Workload for SlowBranch {
    type Output = u64;

    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, signal: &CancelSignal) -> Result<u64, WorkloadError> {
        self.probe.started.store(true, Ordering::SeqCst);
        let result = (|| {
            for _ in 0..self.steps {
                signal.check()?;
                std::thread::sleep(self.step);
                self.probe.steps.fetch_add(1, Ordering::SeqCst);
            }
            signal.check()?;
            Ok(self.value)
        })();
        if result.is_err() {
            self.probe.cancelled.store(true, Ordering::SeqCst);
        }
        self.probe.stopped.store(true, Ordering::SeqCst);
        result
    }
}
