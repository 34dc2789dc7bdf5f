use crate::models::config::DeviceConfig;
use crate::models::statistics::CaptureStatistics;

/// Number of leading samples handed to [`DiagnosticSink::on_chunk_preview`].
pub const PREVIEW_SAMPLES: usize = 16;

/// Optional observer of a capture call.
///
/// Purely a side channel: a capture behaves identically with or without a
/// sink. All methods are called from the capturing task. Every method has an
/// empty default so implementations pick what they need.
pub trait DiagnosticSink: Send + Sync {
    /// Called once the device configuration is built.
    fn on_config(&self, _config: &DeviceConfig) {}

    /// Called with the first samples of each previewed chunk.
    fn on_chunk_preview(&self, _chunk: usize, _samples: &[i16]) {}

    /// Called when a read fails and the loop stops early.
    fn on_read_failed(&self, _chunk: usize, _status: i32) {}

    /// Called after the loop ends, before teardown.
    fn on_finished(&self, _chunks_completed: usize, _statistics: &CaptureStatistics) {}
}
