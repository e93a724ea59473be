//! # Error-rate circuit breaker.
//!
//! [`BreakerPolicy`] decides when a child has misbehaved enough to be stopped.
//! Each child carries an [`ErrorWindow`]; every error notification is fed through
//! [`ErrorWindow::record`], which returns a [`Verdict`].
//!
//! ## Window rules
//! ```text
//! no window open          → open at now, count = 1           (Opened)
//! now - started > window  → restart at now, count = 1        (Restarted)
//! otherwise               → count += 1
//!                             count >  threshold → Tripped
//!                             count <= threshold → Counted
//! ```
//!
//! The comparison is strict: exactly `threshold` errors inside one window are tolerated,
//! the `threshold + 1`-th trips. Expired errors are discarded, never accumulated.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use tokio::time::Instant;
//! use hostvisor::{BreakerPolicy, ErrorWindow, Verdict};
//!
//! let policy = BreakerPolicy { threshold: 2, window: Duration::from_millis(1000) };
//! let mut w = ErrorWindow::default();
//! let t0 = Instant::now();
//!
//! assert_eq!(w.record(t0, &policy), Verdict::Opened);
//! assert_eq!(w.record(t0 + Duration::from_millis(100), &policy), Verdict::Counted);
//! assert!(matches!(w.record(t0 + Duration::from_millis(200), &policy), Verdict::Tripped { count: 3, .. }));
//! ```

use std::time::Duration;

use tokio::time::Instant;

/// Thresholds of the error-rate breaker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakerPolicy {
    /// Errors tolerated inside one window.
    pub threshold: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for BreakerPolicy {
    /// Returns `threshold = 10`, `window = 30s`.
    fn default() -> Self {
        Self {
            threshold: 10,
            window: Duration::from_millis(30_000),
        }
    }
}

/// Outcome of recording one error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// First error: a window was opened.
    Opened,
    /// Previous window expired; a new one was opened.
    Restarted,
    /// Counted inside the current window, still under threshold.
    Counted,
    /// Threshold exceeded: the child must be stopped.
    Tripped {
        /// Errors counted in the window, including this one.
        count: u32,
        /// Time between window start and this error.
        elapsed: Duration,
    },
}

impl Verdict {
    /// Returns true if the breaker tripped.
    #[inline]
    pub fn is_tripped(&self) -> bool {
        matches!(self, Verdict::Tripped { .. })
    }
}

/// Per-child error counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ErrorWindow {
    started: Option<Instant>,
    count: u32,
}

impl ErrorWindow {
    /// Records an error observed at `now`.
    pub fn record(&mut self, now: Instant, policy: &BreakerPolicy) -> Verdict {
        let Some(started) = self.started else {
            self.open(now);
            return Verdict::Opened;
        };

        let elapsed = now.saturating_duration_since(started);
        if elapsed > policy.window {
            self.open(now);
            return Verdict::Restarted;
        }

        self.count = self.count.saturating_add(1);
        if self.count > policy.threshold {
            Verdict::Tripped {
                count: self.count,
                elapsed,
            }
        } else {
            Verdict::Counted
        }
    }

    /// Errors counted in the current window.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Start of the current window, `None` until the first error.
    #[inline]
    pub fn started(&self) -> Option<Instant> {
        self.started
    }

    fn open(&mut self, now: Instant) {
        self.started = Some(now);
        self.count = 1;
    }
}
