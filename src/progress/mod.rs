//! Progress reporting for long-running analysis phases.
//!
//! Parsing, folding, and tree building all iterate over bounded
//! collections (lines, stacks, tree nodes). Each stage announces its
//! phase and unit count up front, then reports completed units as it
//! goes, including a final call with `units_done == total_units` when
//! the phase finishes. The sink decides what to do with the stream:
//! [`ThrottledProgress`] rate-limits it so a host UI is not flooded,
//! [`NullProgress`] discards everything.
//!
//! The sink is also the cancellation point: stages poll
//! [`ProgressSink::is_cancelled`] at unit boundaries and abort cleanly
//! when the host asks them to.

use std::time::{Duration, Instant};

use crate::utils::config::PROGRESS_UPDATE_INTERVAL;

/// Analysis phases, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Splitting the raw text into lines
    Split,
    /// Walking the lines of the recognized dialect
    ParseText,
    /// Folding per-thread stacks into the prefix tree
    FoldStacks,
    /// Converting the prefix tree into the flame graph tree
    BuildTree,
}

impl Phase {
    /// Number of phases, used to scale per-phase progress into an
    /// overall fraction.
    pub const COUNT: usize = 4;

    /// Zero-based position of this phase in the pipeline.
    pub fn index(self) -> usize {
        match self {
            Phase::Split => 0,
            Phase::ParseText => 1,
            Phase::FoldStacks => 2,
            Phase::BuildTree => 3,
        }
    }
}

/// Observer injected into the analysis pipeline.
///
/// Implementations must tolerate being called once per unit of work;
/// throttling is the sink's concern, not the caller's, which keeps the
/// parsing algorithms synchronous and free of timing dependencies.
pub trait ProgressSink {
    /// A new phase begins with `total_units` units of work.
    fn report_phase(&mut self, phase: Phase, total_units: usize);

    /// `units_done` units of the current phase are complete. Every
    /// phase ends with a call where `units_done == total_units`.
    fn report_progress(&mut self, units_done: usize);

    /// Polled at unit boundaries; returning true makes the pipeline
    /// abort with [`AnalyzeError::Cancelled`](crate::AnalyzeError::Cancelled).
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Sink that discards all updates. Useful for tests and embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report_phase(&mut self, _phase: Phase, _total_units: usize) {}

    fn report_progress(&mut self, _units_done: usize) {}
}

/// Rate-limited sink that forwards an overall completion fraction
/// (`0.0..=1.0`) to a callback.
///
/// Updates are dropped unless the configured interval has elapsed since
/// the last emission. Phase starts and 100%-of-phase updates always
/// emit, so every phase is guaranteed a visible final update no matter
/// how fast it ran.
pub struct ThrottledProgress<F: FnMut(f64)> {
    emit: F,
    interval: Duration,
    last_emit: Option<Instant>,
    phase_index: usize,
    phase_total: usize,
}

impl<F: FnMut(f64)> ThrottledProgress<F> {
    /// Create a sink with the default update interval.
    pub fn new(emit: F) -> Self {
        Self::with_interval(emit, PROGRESS_UPDATE_INTERVAL)
    }

    /// Create a sink with an explicit update interval.
    pub fn with_interval(emit: F, interval: Duration) -> Self {
        Self {
            emit,
            interval,
            last_emit: None,
            phase_index: 0,
            phase_total: 1,
        }
    }

    fn fraction(&self, units_done: usize) -> f64 {
        let within = if self.phase_total == 0 {
            1.0
        } else {
            (units_done as f64 / self.phase_total as f64).min(1.0)
        };
        (self.phase_index as f64 + within) / Phase::COUNT as f64
    }
}

impl<F: FnMut(f64)> ProgressSink for ThrottledProgress<F> {
    fn report_phase(&mut self, phase: Phase, total_units: usize) {
        self.phase_index = phase.index();
        self.phase_total = total_units;
        let fraction = self.fraction(0);
        (self.emit)(fraction);
        self.last_emit = Some(Instant::now());
    }

    fn report_progress(&mut self, units_done: usize) {
        let phase_complete = units_done >= self.phase_total;
        let due = match self.last_emit {
            Some(at) => at.elapsed() >= self.interval,
            None => true,
        };
        if phase_complete || due {
            let fraction = self.fraction(units_done);
            (self.emit)(fraction);
            self.last_emit = Some(Instant::now());
        }
    }
}
