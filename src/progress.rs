//! Progress reporting for long renders.  The compositor calls an
//! injected observer as rows complete instead of writing to a
//! process-wide stream, so the core stays pure and tests don't have
//! to capture stderr.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};

/// Receives percentage-complete reports while a field is computed.
/// Reports arrive from whichever worker finished a row, so under a
/// threaded render they may be momentarily out of order;
/// implementations must tolerate that.  Reporting is best-effort and
/// must never fail the computation.
pub trait Progress: Sync {
    /// Called after each completed row with percent complete, 0 to 100.
    fn report(&self, percent: u32);
}

/// Discards every report.  The right sink for tests and for callers
/// that poll results instead.
pub struct Silent;

impl Progress for Silent {
    fn report(&self, _percent: u32) {}
}

/// Writes a carriage-return percentage to stderr.  Out-of-order
/// reports from worker threads are dropped so the displayed number
/// only ever climbs, and write failures are swallowed.
pub struct StderrProgress {
    last: AtomicU32,
}

impl StderrProgress {
    /// A fresh reporter starting at 0%.
    pub fn new() -> StderrProgress {
        StderrProgress {
            last: AtomicU32::new(0),
        }
    }
}

impl Default for StderrProgress {
    fn default() -> StderrProgress {
        StderrProgress::new()
    }
}

impl Progress for StderrProgress {
    fn report(&self, percent: u32) {
        if self.last.fetch_max(percent, Ordering::SeqCst) < percent {
            let _ = write!(io::stderr(), "\r{}%", percent);
        }
    }
}
