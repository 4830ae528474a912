//! Collection loop: capture, extract, emit, sleep.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::emit::Emitter;
use crate::extract::Extractor;
use crate::source::Source;

/// Granularity of the inter-cycle wait. The sleep is sliced so a shutdown
/// request is observed within one slice rather than a full interval.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Drives the capture → extract → emit cycle until shutdown.
///
/// Each cycle takes a single epoch timestamp up front; every record emitted
/// in that cycle carries it. A failed capture abandons the cycle (no records)
/// and the loop continues at the next interval — capture errors are never
/// fatal. There is no drift compensation: the actual period is work time
/// plus the fixed sleep.
pub struct Scheduler<S: Source, W: Write> {
    source: S,
    extractor: Extractor,
    emitter: Emitter<W>,
    interval: Duration,
    max_cycles: Option<u64>,
}

impl<S: Source, W: Write> Scheduler<S, W> {
    pub fn new(source: S, extractor: Extractor, emitter: Emitter<W>, interval: Duration) -> Self {
        Self {
            source,
            extractor,
            emitter,
            interval,
            max_cycles: None,
        }
    }

    /// Bounds the loop to a fixed number of cycles (`--once`, tests).
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Runs the loop until `running` is cleared or the cycle bound is hit.
    ///
    /// Returns the number of cycles performed.
    pub fn run(&mut self, running: &AtomicBool) -> u64 {
        let mut cycles: u64 = 0;

        while running.load(Ordering::SeqCst) {
            let timestamp = epoch_seconds();

            match self.source.capture() {
                Ok(text) => {
                    let records = self.extractor.extract(&text, timestamp);
                    debug!(cycle = cycles + 1, records = records.len(), "extracted records");
                    for record in &records {
                        if let Err(e) = self.emitter.emit(record) {
                            // Output stream is broken; drop the rest of this
                            // cycle's records and let the next cycle retry.
                            warn!("failed to write record: {}", e);
                            break;
                        }
                    }
                }
                Err(e) => {
                    warn!(cycle = cycles + 1, "capture failed: {}", e);
                }
            }

            cycles += 1;
            if self.max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }
            sleep_interruptible(self.interval, running);
        }

        cycles
    }

    /// Consumes the scheduler, returning the emitter (and its stream).
    pub fn into_emitter(self) -> Emitter<W> {
        self.emitter
    }
}

/// Epoch seconds, taken once at the start of each cycle.
fn epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Sleeps for `duration` in slices, returning early once `running` clears.
fn sleep_interruptible(duration: Duration, running: &AtomicBool) {
    let mut remaining = duration;
    while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
        let step = remaining.min(SLEEP_SLICE);
        std::thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}
