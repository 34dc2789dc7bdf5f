use std::sync::Arc;

use crate::models::capture::Capture;
use crate::models::config::CaptureOptions;
use crate::models::error::CaptureError;
use crate::models::request::CaptureRequest;
use crate::pipeline::acquisition;
use crate::pipeline::buffer::SampleBuffer;
use crate::pipeline::device::DeviceSession;
use crate::pipeline::validator;
use crate::traits::codec_driver::CodecDriver;
use crate::traits::diagnostics::DiagnosticSink;
use crate::traits::region_allocator::RegionAllocator;
use crate::traits::task::{Scheduler, Watchdog};

/// One-shot ADC microphone capture.
///
/// Generic over the driver, heap region allocator, watchdog and scheduler.
/// Each [`read`](AdcMic::read) runs the whole pipeline:
/// ```text
/// validate → data interface → device → open → buffer
///          → N × (watchdog reset, read, yield, min/max) → snapshot
///          → free buffer → close → delete device → delete data interface
/// ```
/// Every handle acquired during a call is released before it returns, on
/// success and on every error path.
pub struct AdcMic<D, A, W, S> {
    driver: D,
    allocator: A,
    watchdog: W,
    scheduler: S,
    options: CaptureOptions,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl<D, A, W, S> AdcMic<D, A, W, S>
where
    D: CodecDriver,
    A: RegionAllocator,
    W: Watchdog,
    S: Scheduler,
{
    pub fn new(driver: D, allocator: A, watchdog: W, scheduler: S) -> Self {
        Self {
            driver,
            allocator,
            watchdog,
            scheduler,
            options: CaptureOptions::default(),
            sink: None,
        }
    }

    /// Replace the loop options. Rejects a zero repeat count or yield.
    pub fn with_options(mut self, options: CaptureOptions) -> Result<Self, CaptureError> {
        options.validate().map_err(CaptureError::InvalidArgument)?;
        self.options = options;
        Ok(self)
    }

    pub fn set_sink(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.sink = Some(sink);
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Capture and return the raw bytes of the last chunk.
    pub fn read_bytes(&mut self, request: &CaptureRequest) -> Result<Vec<u8>, CaptureError> {
        self.read(request).map(Capture::into_bytes)
    }

    /// Capture `repeat_count` chunks and return the last one with statistics.
    ///
    /// A read failure is not an error: the returned [`Capture`] is then
    /// `Aborted` and its data is empty unless the final chunk was already
    /// snapshotted.
    pub fn read(&mut self, request: &CaptureRequest) -> Result<Capture, CaptureError> {
        let config = validator::device_config(request)?;
        let size = validator::buffer_size(request.chunk_samples, request.channel_num).ok_or_else(
            || CaptureError::InvalidArgument("chunk size overflows".into()),
        )?;

        log::debug!(
            "Config created for unit {}, channels {}, sample rate {}, atten {}",
            config.unit_id(),
            config.channel_num(),
            config.sample_rate_hz(),
            config.attenuation().code()
        );
        let sink = self.sink.as_deref();
        if let Some(sink) = sink {
            sink.on_config(&config);
        }

        let mut session = DeviceSession::open(&mut self.driver, &config)?;
        let mut buffer = SampleBuffer::allocate(&mut self.allocator, size, self.options.memory_caps)?;

        let capture = acquisition::run(
            &mut session,
            &mut buffer,
            &mut self.watchdog,
            &mut self.scheduler,
            &self.options,
            request.chunk_samples,
            sink,
        );

        buffer.release();
        session.close_and_release();

        if capture.statistics.is_empty() {
            log::info!("Capture finished with no chunks read ({:?})", capture.state);
        } else {
            log::info!(
                "Captured {} chunks: min {}, max {}, range {}",
                capture.chunks_completed,
                capture.statistics.global_min,
                capture.statistics.global_max,
                capture.statistics.range()
            );
        }
        Ok(capture)
    }
}
