//! # adc-mic-core
//!
//! Platform-agnostic ADC microphone capture core.
//!
//! Validates a capture request, drives a codec/ADC device through its
//! create → open → read → close → delete lifecycle, reads a bounded number of
//! chunks into a buffer allocated from a designated heap region while
//! servicing the watchdog, and returns the last chunk with running min/max
//! statistics. Hardware backends implement the collaborator traits and plug
//! into the generic `AdcMic` session.
//!
//! ## Architecture
//!
//! ```text
//! adc-mic-core (this crate)
//! ├── traits/       ← CodecDriver, RegionAllocator, Watchdog, Scheduler, DiagnosticSink
//! ├── models/       ← CaptureError, CaptureRequest, CaptureOptions, DeviceConfig, Capture, etc.
//! ├── pipeline/     ← validator, DeviceSession, SampleBuffer, acquisition loop
//! ├── processing/   ← 16-bit PCM encoding, WAV header generation
//! ├── session/      ← AdcMic (one-shot capture orchestrator)
//! └── storage/      ← WAV export, metadata sidecar
//! ```

pub mod models;
pub mod pipeline;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::board::AdcPin;
pub use models::capture::{Capture, CaptureMetadata};
pub use models::config::{
    CaptureOptions, DeviceConfig, MemoryCaps, StatisticsScope, StreamFormat, MAX_CHANNELS,
};
pub use models::error::{CaptureError, InitStage};
pub use models::request::{AdcUnit, Attenuation, CaptureRequest};
pub use models::state::AcquisitionState;
pub use models::statistics::CaptureStatistics;
pub use processing::wav_format::WavSpec;
pub use session::adc_mic::AdcMic;
pub use traits::codec_driver::{CodecDriver, STATUS_OK};
pub use traits::diagnostics::DiagnosticSink;
pub use traits::region_allocator::RegionAllocator;
pub use traits::task::{Scheduler, Watchdog};
