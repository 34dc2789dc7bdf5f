//! Task watchdog and scheduler for running the capture on a host thread.

use std::thread;
use std::time::{Duration, Instant};

use adc_mic_core::traits::task::{Scheduler, Watchdog};

use crate::journal::{Journal, SimEvent};

/// Default task watchdog timeout of the reference firmware.
pub const DEFAULT_WATCHDOG_TIMEOUT: Duration = Duration::from_secs(5);

/// Task watchdog that tracks the longest gap between resets.
///
/// A gap longer than the timeout is counted as a starvation; real hardware
/// would panic or reset at that point.
pub struct SimWatchdog {
    timeout: Duration,
    last_reset: Option<Instant>,
    longest_gap: Duration,
    starvations: usize,
    resets: usize,
    journal: Journal,
}

impl SimWatchdog {
    pub fn new(timeout: Duration, journal: Journal) -> Self {
        Self {
            timeout,
            last_reset: None,
            longest_gap: Duration::ZERO,
            starvations: 0,
            resets: 0,
            journal,
        }
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn starvations(&self) -> usize {
        self.starvations
    }

    pub fn longest_gap(&self) -> Duration {
        self.longest_gap
    }
}

impl Watchdog for SimWatchdog {
    fn reset_deadline(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_reset {
            let gap = now.duration_since(last);
            self.longest_gap = self.longest_gap.max(gap);
            if gap > self.timeout {
                self.starvations += 1;
                log::warn!(
                    "sim watchdog: {:?} since last reset exceeds {:?}",
                    gap,
                    self.timeout
                );
            }
        }
        self.last_reset = Some(now);
        self.resets += 1;
        self.journal.record(SimEvent::WatchdogReset);
    }
}

/// Scheduler that yields by sleeping the current thread.
///
/// With sleeping disabled the yields are only recorded, which keeps tests
/// fast.
pub struct ThreadScheduler {
    sleep: bool,
    total_yielded: Duration,
    journal: Journal,
}

impl ThreadScheduler {
    pub fn sleeping(journal: Journal) -> Self {
        Self {
            sleep: true,
            total_yielded: Duration::ZERO,
            journal,
        }
    }

    pub fn recording(journal: Journal) -> Self {
        Self {
            sleep: false,
            total_yielded: Duration::ZERO,
            journal,
        }
    }

    /// Sum of all requested yield durations.
    pub fn total_yielded(&self) -> Duration {
        self.total_yielded
    }
}

impl Scheduler for ThreadScheduler {
    fn yield_for(&mut self, duration: Duration) {
        self.journal.record(SimEvent::Yield(duration));
        self.total_yielded += duration;
        if self.sleep {
            thread::sleep(duration);
        } else {
            thread::yield_now();
        }
    }
}
