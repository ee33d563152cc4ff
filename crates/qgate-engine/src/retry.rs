//! Simple wait primitives: a bounded re-check loop and a fixed settle
//! pause. Both take their timing explicitly so the timeout contract
//! stays testable.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use qgate_core::config::{CREATION_SETTLE, POLL_INTERVAL};

/// Timing knobs for the engine's waits.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Sleep between freshness polls.
    pub poll_interval: Duration,
    /// Pause after a project creation, giving the write room to propagate.
    pub settle: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            settle: CREATION_SETTLE,
        }
    }
}

#[cfg(test)]
impl Pacing {
    /// No sleeping; unit tests drive the loop shape, not the clock.
    pub(crate) fn immediate() -> Self {
        Self {
            poll_interval: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }
}

/// Why a bounded wait stopped without the probe reporting ready.
#[derive(Debug)]
pub enum WaitError<E> {
    /// Wall-clock budget exhausted; carries whole elapsed seconds.
    Budget { elapsed: u64 },
    /// The probe itself failed; never retried.
    Probe(E),
}

/// Re-run `probe` at a fixed interval until it reports ready or the
/// wall-clock budget runs out. The probe runs at least once; the thread
/// suspends between checks. Elapsed time is measured from loop start, so
/// slow probes count against the budget.
pub fn wait_until<E>(
    interval: Duration,
    budget: Duration,
    mut probe: impl FnMut() -> Result<bool, E>,
) -> Result<(), WaitError<E>> {
    let start = Instant::now();
    loop {
        if probe().map_err(WaitError::Probe)? {
            return Ok(());
        }
        let elapsed = start.elapsed();
        if elapsed > budget {
            return Err(WaitError::Budget {
                elapsed: elapsed.as_secs(),
            });
        }
        thread::sleep(interval);
    }
}

/// Fixed-duration settle pause. Nothing is verified afterwards; the wait
/// only gives the remote side time to propagate a write.
pub fn settle(duration: Duration) {
    debug!(?duration, "settle wait");
    thread::sleep(duration);
}
