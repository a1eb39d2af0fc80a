//! Progress-reporting collaborator.

use std::time::{Duration, Instant};

/// Receives per-item and overall progress during a mass action.
///
/// Implementations are expected to throttle their own redraws; [`Throttle`]
/// does the timing.
pub trait ProgressReporter {
    /// Report progress. `status` is the current activity ("Copying ..."),
    /// `info` optional extra lines (running totals).
    ///
    /// A call with both texts `None` and both percentages zero resets the
    /// reporter's internal state; the orchestrating side makes that call once
    /// after every mass action.
    fn update(
        &mut self,
        status: Option<&str>,
        item_percent: u8,
        overall_percent: u8,
        info: Option<&str>,
    );

    /// The reset call described on [`update`](Self::update).
    fn reset(&mut self) {
        self.update(None, 0, 0, None);
    }
}

/// A reporter that drops everything. Useful for non-interactive callers.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn update(&mut self, _: Option<&str>, _: u8, _: u8, _: Option<&str>) {}
}

/// Redraw limiter for reporter implementations.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Create a throttle permitting one redraw per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when enough time has passed since the last permitted redraw.
    /// The first call after construction or reset is always permitted.
    pub fn ready(&mut self) -> bool {
        match self.last {
            Some(at) if at.elapsed() < self.interval => false,
            _ => {
                self.last = Some(Instant::now());
                true
            }
        }
    }

    /// Forget the last redraw time.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
