use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use adc_mic_core::storage::{metadata, wav_export};
use adc_mic_core::{
    AcquisitionState, AdcPin, Attenuation, CaptureError, CaptureOptions, CaptureRequest,
    CaptureStatistics, DeviceConfig, DiagnosticSink, InitStage, MemoryCaps, StatisticsScope,
    StreamFormat,
};
use adc_mic_sim::{FaultPlan, SampleSource, SimBoard, SimEvent};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stereo_request() -> CaptureRequest {
    CaptureRequest::new(256, 0, vec![0, 1], 2, 16000, Attenuation::Db0)
}

/// -100, -99, …, 100, -100, … over the whole interleaved buffer.
fn ramp() -> SampleSource {
    SampleSource::Pattern((-100..=100).collect())
}

fn is_release(event: &SimEvent) -> bool {
    matches!(
        event,
        SimEvent::Close { .. }
            | SimEvent::DeleteDevice { .. }
            | SimEvent::DeleteDataInterface { .. }
            | SimEvent::Free { .. }
    )
}

#[test]
fn stereo_chunk_reports_pattern_extremes() {
    init_logging();
    let (mut mic, journal) = SimBoard::new().source(ramp()).build();

    let capture = mic.read(&stereo_request()).unwrap();

    assert_eq!(capture.state, AcquisitionState::Done);
    assert_eq!(capture.data.len(), 256 * 2 * 2);
    assert_eq!(capture.statistics.global_min, -100);
    assert_eq!(capture.statistics.global_max, 100);
    assert_eq!(capture.statistics.samples_examined, 512);
    assert_eq!(capture.samples()[..3], [-100, -99, -98]);

    let format = StreamFormat {
        sample_rate_hz: 16000,
        channel_count: 2,
        bits_per_sample: 16,
    };
    let caps = MemoryCaps::INTERNAL | MemoryCaps::EIGHT_BIT;
    assert_eq!(
        journal.events(),
        vec![
            SimEvent::CreateDataInterface { id: 1, ok: true },
            SimEvent::CreateDevice { id: 2, data_if: 1, ok: true },
            SimEvent::Open { device: 2, format, status: 0 },
            SimEvent::Allocate { size: 1024, caps, ok: true },
            SimEvent::WatchdogReset,
            SimEvent::Read { device: 2, bytes: 1024, status: 1024 },
            SimEvent::Yield(Duration::from_millis(1)),
            SimEvent::Free { size: 1024 },
            SimEvent::Close { device: 2 },
            SimEvent::DeleteDevice { id: 2 },
            SimEvent::DeleteDataInterface { id: 1 },
        ]
    );
    assert_eq!(mic.driver().live_handles(), 0);
    assert_eq!(mic.allocator().live_blocks(), 0);
}

#[test]
fn every_returned_sample_lies_within_min_and_max() {
    init_logging();
    let (mic, _journal) = SimBoard::new().build();
    let mut mic = mic
        .with_options(CaptureOptions {
            repeat_count: 5,
            ..Default::default()
        })
        .unwrap();

    let capture = mic.read(&stereo_request()).unwrap();
    assert_eq!(capture.data.len(), 1024);
    assert!(!capture.statistics.is_empty());
    for sample in capture.samples() {
        assert!(capture.statistics.global_min <= sample);
        assert!(sample <= capture.statistics.global_max);
    }
    assert!(capture.statistics.peak_level() <= 16000.0 / 32768.0 + f32::EPSILON);
}

#[test]
fn too_many_channels_is_rejected_before_any_resource() {
    init_logging();
    let (mut mic, journal) = SimBoard::new().build();
    let request = CaptureRequest::new(256, 0, (0..11).collect(), 11, 16000, Attenuation::Db0);

    let err = mic.read(&request).unwrap_err();
    assert!(matches!(err, CaptureError::InvalidArgument(_)));
    assert!(journal.is_empty());
}

#[test]
fn short_channel_list_is_rejected_before_any_resource() {
    init_logging();
    let (mut mic, journal) = SimBoard::new().build();
    let request = CaptureRequest::new(256, 0, vec![0, 1], 3, 16000, Attenuation::Db0);

    assert!(matches!(
        mic.read(&request),
        Err(CaptureError::InvalidArgument(_))
    ));
    assert!(journal.is_empty());
}

#[test]
fn channel_id_wider_than_eight_bits_is_rejected() {
    let (mut mic, journal) = SimBoard::new().build();
    let request = CaptureRequest::new(16, 0, vec![300], 1, 16000, Attenuation::Db0);

    assert!(matches!(
        mic.read(&request),
        Err(CaptureError::InvalidArgument(_))
    ));
    assert!(journal.is_empty());
}

#[test]
fn data_interface_failure_touches_nothing_else() {
    init_logging();
    let (mut mic, journal) = SimBoard::new()
        .faults(FaultPlan::fail_data_interface())
        .build();

    let err = mic.read(&stereo_request()).unwrap_err();
    assert_eq!(
        err,
        CaptureError::ResourceInit {
            stage: InitStage::DataInterface,
            status: None
        }
    );
    assert_eq!(
        journal.events(),
        vec![SimEvent::CreateDataInterface { id: 1, ok: false }]
    );
}

#[test]
fn device_failure_deletes_data_interface_once() {
    init_logging();
    let (mut mic, journal) = SimBoard::new().faults(FaultPlan::fail_device()).build();

    let err = mic.read(&stereo_request()).unwrap_err();
    assert!(err.is_resource_init());
    assert_eq!(
        journal.count(|e| matches!(e, SimEvent::DeleteDataInterface { .. })),
        1
    );
    assert_eq!(journal.count(|e| matches!(e, SimEvent::DeleteDevice { .. })), 0);
    assert_eq!(journal.count(|e| matches!(e, SimEvent::Allocate { .. })), 0);
    assert_eq!(mic.driver().live_handles(), 0);
}

#[test]
fn open_failure_deletes_both_handles_without_close() {
    init_logging();
    let (mut mic, journal) = SimBoard::new().faults(FaultPlan::fail_open(-3)).build();

    let err = mic.read(&stereo_request()).unwrap_err();
    assert_eq!(err.driver_status(), Some(-3));
    assert_eq!(err.to_string(), "device open failed: -3");

    assert_eq!(journal.count(|e| matches!(e, SimEvent::Close { .. })), 0);
    assert_eq!(journal.count(|e| matches!(e, SimEvent::DeleteDevice { .. })), 1);
    assert_eq!(
        journal.count(|e| matches!(e, SimEvent::DeleteDataInterface { .. })),
        1
    );
    assert_eq!(journal.count(|e| matches!(e, SimEvent::Allocate { .. })), 0);
    assert_eq!(journal.reads(), 0);
}

#[test]
fn allocation_failure_closes_and_deletes_without_reading() {
    init_logging();
    let (mut mic, journal) = SimBoard::new().internal_bytes(512).build();

    assert_eq!(
        mic.read(&stereo_request()).unwrap_err(),
        CaptureError::OutOfMemory { requested: 1024 }
    );
    assert_eq!(journal.reads(), 0);
    assert_eq!(journal.count(|e| *e == SimEvent::WatchdogReset), 0);

    let events = journal.events();
    assert_eq!(
        events[events.len() - 3..],
        [
            SimEvent::Close { device: 2 },
            SimEvent::DeleteDevice { id: 2 },
            SimEvent::DeleteDataInterface { id: 1 },
        ]
    );
    assert_eq!(journal.count(|e| matches!(e, SimEvent::Free { .. })), 0);
}

#[test]
fn read_failure_returns_empty_chunk_and_releases_everything() {
    init_logging();
    let (mut mic, journal) = SimBoard::new().faults(FaultPlan::fail_read(0, -1)).build();

    let capture = mic.read(&stereo_request()).unwrap();
    assert!(capture.is_empty());
    assert_eq!(
        capture.state,
        AcquisitionState::Aborted {
            at_chunk: 0,
            status: -1
        }
    );
    assert!(capture.statistics.is_empty());

    let first_release = journal.position(is_release).unwrap();
    let events = journal.events();
    assert!(events[first_release..].iter().all(is_release));
    assert_eq!(events[first_release], SimEvent::Free { size: 1024 });
    assert_eq!(journal.count(|e| matches!(e, SimEvent::Yield(_))), 0);
    assert_eq!(mic.driver().live_handles(), 0);
    assert_eq!(mic.allocator().live_blocks(), 0);
}

#[test]
fn each_resource_is_released_at_most_once() {
    init_logging();
    let plans = [
        FaultPlan::none(),
        FaultPlan::fail_device(),
        FaultPlan::fail_open(-2),
        FaultPlan::fail_read(0, -5),
    ];

    for plan in plans {
        let (mut mic, journal) = SimBoard::new().source(ramp()).faults(plan.clone()).build();
        let _ = mic.read(&stereo_request());

        let creates_di = journal.count(|e| matches!(e, SimEvent::CreateDataInterface { ok: true, .. }));
        let deletes_di = journal.count(|e| matches!(e, SimEvent::DeleteDataInterface { .. }));
        let creates_dev = journal.count(|e| matches!(e, SimEvent::CreateDevice { ok: true, .. }));
        let deletes_dev = journal.count(|e| matches!(e, SimEvent::DeleteDevice { .. }));
        let allocs = journal.count(|e| matches!(e, SimEvent::Allocate { ok: true, .. }));
        let frees = journal.count(|e| matches!(e, SimEvent::Free { .. }));

        assert_eq!(creates_di, deletes_di, "{:?}", plan);
        assert_eq!(creates_dev, deletes_dev, "{:?}", plan);
        assert_eq!(allocs, frees, "{:?}", plan);
        assert!(journal.count(|e| matches!(e, SimEvent::Close { .. })) <= 1);
    }
}

#[test]
fn repeated_chunks_reset_watchdog_before_every_read() {
    init_logging();
    let (mic, journal) = SimBoard::new().source(ramp()).build();
    let mut mic = mic
        .with_options(CaptureOptions {
            repeat_count: 4,
            yield_interval: Duration::from_millis(2),
            ..Default::default()
        })
        .unwrap();

    let capture = mic.read(&stereo_request()).unwrap();
    assert_eq!(capture.chunks_completed, 4);
    assert_eq!(capture.data.len(), 1024);
    assert_eq!(journal.reads(), 4);
    assert_eq!(mic.watchdog().resets(), 4);
    assert_eq!(mic.scheduler().total_yielded(), Duration::from_millis(8));

    let events = journal.events();
    for (i, event) in events.iter().enumerate() {
        if matches!(event, SimEvent::Read { .. }) {
            assert_eq!(events[i - 1], SimEvent::WatchdogReset);
            assert_eq!(events[i + 1], SimEvent::Yield(Duration::from_millis(2)));
        }
    }
}

#[test]
fn failure_before_last_chunk_keeps_statistics_but_no_data() {
    init_logging();
    let (mic, journal) = SimBoard::new()
        .source(ramp())
        .faults(FaultPlan::fail_read(2, -7))
        .build();
    let mut mic = mic
        .with_options(CaptureOptions {
            repeat_count: 3,
            ..Default::default()
        })
        .unwrap();

    let capture = mic.read(&stereo_request()).unwrap();
    assert!(capture.is_empty());
    assert_eq!(capture.chunks_completed, 2);
    assert!(capture.state.is_aborted());
    assert_eq!(capture.statistics.global_min, -100);
    assert_eq!(capture.statistics.global_max, 100);
    assert_eq!(journal.reads(), 3);
}

#[test]
fn leading_samples_scope_ignores_later_channels() {
    let pattern: Vec<i16> = [vec![5; 4], vec![-9, 9]].concat();
    let (mic, _journal) = SimBoard::new().source(SampleSource::Pattern(pattern)).build();
    let mut mic = mic
        .with_options(CaptureOptions {
            statistics_scope: StatisticsScope::LeadingSamples,
            ..Default::default()
        })
        .unwrap();
    let request = CaptureRequest::new(4, 0, vec![0, 1, 2], 3, 16000, Attenuation::Db0);

    let capture = mic.read(&request).unwrap();
    assert_eq!(capture.statistics.global_min, 5);
    assert_eq!(capture.statistics.global_max, 5);
    assert_eq!(capture.statistics.samples_examined, 4);
    assert_eq!(capture.data.len(), 4 * 3 * 2);
}

#[test]
fn spiram_buffer_needs_external_ram() {
    let request = stereo_request();
    let options = CaptureOptions {
        memory_caps: MemoryCaps::SPIRAM,
        ..Default::default()
    };

    let (mic, _) = SimBoard::new().build();
    let mut mic = mic.with_options(options.clone()).unwrap();
    assert!(matches!(
        mic.read(&request),
        Err(CaptureError::OutOfMemory { .. })
    ));

    let (mic, _) = SimBoard::new().spiram_bytes(8 * 1024).build();
    let mut mic = mic.with_options(options).unwrap();
    assert_eq!(mic.read(&request).unwrap().data.len(), 1024);
}

#[test]
fn sleeping_scheduler_yields_for_real() {
    let (mut mic, _) = SimBoard::new().sleep(true).build();
    mic.read(&stereo_request()).unwrap();
    assert_eq!(mic.scheduler().total_yielded(), Duration::from_millis(1));
    assert_eq!(mic.watchdog().starvations(), 0);
}

#[derive(Default)]
struct RecordingSink {
    configs: Mutex<Vec<Vec<u8>>>,
    previews: Mutex<Vec<(usize, Vec<i16>)>>,
    failures: Mutex<Vec<(usize, i32)>>,
    finished: Mutex<Option<(usize, CaptureStatistics)>>,
}

impl DiagnosticSink for RecordingSink {
    fn on_config(&self, config: &DeviceConfig) {
        self.configs.lock().push(config.channels().to_vec());
    }

    fn on_chunk_preview(&self, chunk: usize, samples: &[i16]) {
        self.previews.lock().push((chunk, samples.to_vec()));
    }

    fn on_read_failed(&self, chunk: usize, status: i32) {
        self.failures.lock().push((chunk, status));
    }

    fn on_finished(&self, chunks_completed: usize, statistics: &CaptureStatistics) {
        *self.finished.lock() = Some((chunks_completed, *statistics));
    }
}

#[test]
fn diagnostic_sink_sees_config_previews_and_summary() {
    init_logging();
    let sink = Arc::new(RecordingSink::default());
    let (mic, _) = SimBoard::new().source(ramp()).build();
    let mut mic = mic
        .with_options(CaptureOptions {
            repeat_count: 3,
            preview_chunks: 2,
            ..Default::default()
        })
        .unwrap();
    mic.set_sink(sink.clone());

    let with_sink = mic.read(&stereo_request()).unwrap();

    assert_eq!(*sink.configs.lock(), vec![vec![0, 1]]);
    let previews = sink.previews.lock();
    assert_eq!(previews.len(), 2);
    assert_eq!(previews[0].0, 0);
    assert_eq!(previews[1].0, 1);
    assert_eq!(previews[0].1.len(), 16);
    assert_eq!(previews[0].1[0], -100);
    assert!(sink.failures.lock().is_empty());

    let (chunks, statistics) = sink.finished.lock().unwrap();
    assert_eq!(chunks, 3);
    assert_eq!(statistics, with_sink.statistics);

    let (plain, _) = SimBoard::new().source(ramp()).build();
    let mut plain = plain
        .with_options(CaptureOptions {
            repeat_count: 3,
            preview_chunks: 2,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(plain.read(&stereo_request()).unwrap(), with_sink);
}

#[test]
fn diagnostic_sink_sees_read_failure() {
    let sink = Arc::new(RecordingSink::default());
    let (mut mic, _) = SimBoard::new().faults(FaultPlan::fail_read(0, -4)).build();
    mic.set_sink(sink.clone());

    mic.read(&stereo_request()).unwrap();
    assert_eq!(*sink.failures.lock(), vec![(0, -4)]);
    assert_eq!(sink.finished.lock().map(|(chunks, _)| chunks), Some(0));
}

#[test]
fn microphone_pin_capture_exports_wav_and_sidecar() {
    init_logging();
    let pin = AdcPin::from_gpio(2).unwrap();
    let request = CaptureRequest::from_raw(
        128,
        i64::from(pin.unit_id()),
        &[i64::from(pin.channel)],
        1,
        16000,
        Attenuation::Db12.code().into(),
    )
    .unwrap();

    let (mut mic, _) = SimBoard::new().build();
    let capture = mic.read(&request).unwrap();
    assert_eq!(capture.data.len(), 256);

    let path = std::env::temp_dir().join("adc_mic_sim_test_pin2.wav");
    let meta = wav_export::export_capture(&request, &capture, &path).unwrap();
    assert_eq!(meta.channels, vec![1]);
    assert_eq!(meta.byte_len, 256);
    assert_eq!(metadata::read_metadata(&path).unwrap(), meta);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 44 + 256);

    std::fs::remove_file(&path).ok();
    std::fs::remove_file(path.with_extension("metadata.json")).ok();
}
