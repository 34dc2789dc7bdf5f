//! Bounded read loop: watchdog reset → blocking read → yield → min/max →
//! snapshot of the final chunk.

use crate::models::capture::Capture;
use crate::models::config::{CaptureOptions, StatisticsScope};
use crate::models::state::AcquisitionState;
use crate::models::statistics::CaptureStatistics;
use crate::pipeline::buffer::SampleBuffer;
use crate::pipeline::device::DeviceSession;
use crate::traits::codec_driver::CodecDriver;
use crate::traits::diagnostics::{DiagnosticSink, PREVIEW_SAMPLES};
use crate::traits::region_allocator::RegionAllocator;
use crate::traits::task::{Scheduler, Watchdog};

/// Run `options.repeat_count` iterations against an opened device.
///
/// A failed read stops the loop without raising: statistics gathered so far
/// are kept and the result holds whatever was snapshotted before the failure.
/// Teardown is left to the caller.
pub fn run<D, A, W, S>(
    session: &mut DeviceSession<'_, D>,
    buffer: &mut SampleBuffer<'_, A>,
    watchdog: &mut W,
    scheduler: &mut S,
    options: &CaptureOptions,
    chunk_samples: usize,
    sink: Option<&dyn DiagnosticSink>,
) -> Capture
where
    D: CodecDriver,
    A: RegionAllocator,
    W: Watchdog,
    S: Scheduler,
{
    let target = options.repeat_count;
    // Nothing to read for a zero target: no chunk completes, so nothing is returned.
    let mut state = if target == 0 {
        AcquisitionState::Done
    } else {
        AcquisitionState::Iterating { chunk: 0 }
    };
    let mut statistics = CaptureStatistics::new();
    let mut chunks_completed = 0;
    let mut data = Vec::new();

    log::debug!(
        "Reading {} chunks of {} samples each ({} bytes per chunk)",
        target,
        chunk_samples,
        buffer.size()
    );

    while let AcquisitionState::Iterating { chunk } = state {
        // The read can block for a full conversion cycle.
        watchdog.reset_deadline();

        let ret = session.read(buffer.as_mut_slice());
        if ret < 0 {
            log::warn!("Read failed at chunk {}: {}", chunk, ret);
            if let Some(sink) = sink {
                sink.on_read_failed(chunk, ret);
            }
            state = state.abort(ret);
            break;
        }

        scheduler.yield_for(options.yield_interval);

        let samples = buffer.as_slice();
        let examined = match options.statistics_scope {
            StatisticsScope::AllSamples => samples,
            StatisticsScope::LeadingSamples => &samples[..chunk_samples.min(samples.len())],
        };
        statistics.update(examined);

        if chunk < options.preview_chunks {
            if let Some(sink) = sink {
                sink.on_chunk_preview(chunk, &samples[..PREVIEW_SAMPLES.min(samples.len())]);
            }
        }

        chunks_completed += 1;
        if chunk + 1 == target {
            data = buffer.snapshot();
        }
        state = state.advance(target);
    }

    if let Some(sink) = sink {
        sink.on_finished(chunks_completed, &statistics);
    }

    Capture {
        data,
        statistics,
        chunks_completed,
        state,
    }
}
