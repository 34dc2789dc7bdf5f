//! # adc-mic-sim
//!
//! Host simulation backend for adc-mic-core.
//!
//! Provides:
//! - `SimCodecDriver`: codec/ADC driver producing a test tone or a fixed
//!   pattern, with per-step fault injection
//! - `SimHeap`: heap region with a byte budget and optional external RAM
//! - `SimWatchdog` / `ThreadScheduler`: task watchdog and cooperative yield
//!   on a host thread
//! - `Journal`: shared, ordered record of every collaborator call
//!
//! ## Usage
//! ```ignore
//! use adc_mic_core::{Attenuation, CaptureRequest};
//! use adc_mic_sim::SimBoard;
//!
//! let (mut mic, journal) = SimBoard::new().build();
//! let request = CaptureRequest::new(256, 0, vec![0, 1], 2, 16000, Attenuation::Db0);
//! let capture = mic.read(&request)?;
//! assert_eq!(capture.data.len(), 1024);
//! ```

use std::time::Duration;

use adc_mic_core::AdcMic;

pub mod journal;
pub mod sim_codec;
pub mod sim_heap;
pub mod sim_task;

pub use journal::{Journal, SimEvent};
pub use sim_codec::{FaultPlan, SampleSource, SimCodecDriver};
pub use sim_heap::SimHeap;
pub use sim_task::{SimWatchdog, ThreadScheduler};

/// Capture session wired to the simulated collaborators.
pub type SimAdcMic = AdcMic<SimCodecDriver, SimHeap, SimWatchdog, ThreadScheduler>;

/// Builder for a simulated board.
#[derive(Debug, Clone)]
pub struct SimBoard {
    source: SampleSource,
    faults: FaultPlan,
    internal_bytes: usize,
    spiram_bytes: usize,
    watchdog_timeout: Duration,
    sleep: bool,
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            source: SampleSource::default(),
            faults: FaultPlan::none(),
            internal_bytes: sim_heap::DEFAULT_INTERNAL_BYTES,
            spiram_bytes: 0,
            watchdog_timeout: sim_task::DEFAULT_WATCHDOG_TIMEOUT,
            sleep: false,
        }
    }

    pub fn source(mut self, source: SampleSource) -> Self {
        self.source = source;
        self
    }

    pub fn faults(mut self, faults: FaultPlan) -> Self {
        self.faults = faults;
        self
    }

    pub fn internal_bytes(mut self, bytes: usize) -> Self {
        self.internal_bytes = bytes;
        self
    }

    pub fn spiram_bytes(mut self, bytes: usize) -> Self {
        self.spiram_bytes = bytes;
        self
    }

    pub fn watchdog_timeout(mut self, timeout: Duration) -> Self {
        self.watchdog_timeout = timeout;
        self
    }

    /// Sleep for real on each yield instead of only recording it.
    pub fn sleep(mut self, sleep: bool) -> Self {
        self.sleep = sleep;
        self
    }

    /// Build the session and return it with the journal all parts share.
    pub fn build(self) -> (SimAdcMic, Journal) {
        log::debug!(
            "sim board: {} bytes internal, {} bytes spiram, faults {:?}",
            self.internal_bytes,
            self.spiram_bytes,
            self.faults
        );
        let journal = Journal::new();
        let driver = SimCodecDriver::new(self.source, self.faults, journal.clone());
        let heap = SimHeap::new(self.internal_bytes, journal.clone()).with_spiram(self.spiram_bytes);
        let watchdog = SimWatchdog::new(self.watchdog_timeout, journal.clone());
        let scheduler = if self.sleep {
            ThreadScheduler::sleeping(journal.clone())
        } else {
            ThreadScheduler::recording(journal.clone())
        };
        (AdcMic::new(driver, heap, watchdog, scheduler), journal)
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}
