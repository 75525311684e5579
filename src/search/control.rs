//! Cancellation and progress plumbing shared by every stage
//!
//! A `SearchControl` is created by the caller and may be cloned onto any
//! thread; `stop()` is level-triggered, so a stop issued before a stage starts
//! is still seen when it does. Progress goes through a per-invocation
//! `ProgressReporter` that only ever reports increasing values.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Thread-safe stop flag for one or more searches
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
}

impl SearchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search to stop at its next checkpoint
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Receives progress percentages (0..=100)
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Send + Sync,
{
    fn on_progress(&self, percent: u8) {
        self(percent)
    }
}

/// Sink that discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _percent: u8) {}
}

/// The three pipeline stages, each owning an equal share of the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Armor,
    Decoration,
    Charm,
}

impl Stage {
    const SHARE: f32 = 100.0 / 3.0;

    fn start(&self) -> f32 {
        match self {
            Stage::Armor => 0.0,
            Stage::Decoration => Self::SHARE,
            Stage::Charm => 2.0 * Self::SHARE,
        }
    }
}

/// Per-invocation progress forwarder
///
/// Invariants: values passed to the sink strictly increase, and nothing is
/// forwarded once the control has been stopped.
pub struct ProgressReporter<'r> {
    sink: &'r dyn ProgressSink,
    control: &'r SearchControl,
    last: Cell<Option<u8>>,
}

impl<'r> ProgressReporter<'r> {
    pub fn new(sink: &'r dyn ProgressSink, control: &'r SearchControl) -> Self {
        Self {
            sink,
            control,
            last: Cell::new(None),
        }
    }

    /// Report `fraction` (0.0..=1.0) of `stage` as done
    pub fn stage(&self, stage: Stage, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.report(stage.start() + fraction * Stage::SHARE);
    }

    /// Report a search that ran to completion
    pub fn finish(&self) {
        self.report(100.0);
    }

    fn report(&self, percent: f32) {
        if self.control.is_stopped() {
            return;
        }
        let percent = percent.clamp(0.0, 100.0) as u8;
        if self.last.get().map_or(true, |last| percent > last) {
            self.last.set(Some(percent));
            self.sink.on_progress(percent);
        }
    }
}
