//! Simulated codec/ADC driver.
//!
//! Produces synthetic 16-bit samples instead of touching hardware. Each
//! lifecycle step can be made to fail through a [`FaultPlan`], and every call
//! is recorded in the shared [`Journal`].

use std::f64::consts::PI;

use adc_mic_core::models::config::{DeviceConfig, StreamFormat};
use adc_mic_core::traits::codec_driver::{CodecDriver, STATUS_OK, STATUS_WRONG_STATE};

use crate::journal::{Journal, SimEvent};

/// Test tone of the desktop simulation: A4 at roughly half scale.
pub const DEFAULT_TONE_HZ: f64 = 440.0;
pub const DEFAULT_TONE_AMPLITUDE: f64 = 16000.0;

/// What the simulated ADC delivers on each read.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSource {
    /// Same sine value on every channel of a frame, phase-continuous across
    /// reads.
    Sine { frequency_hz: f64, amplitude: f64 },
    /// Interleaved pattern repeated to fill the buffer, restarting each read.
    Pattern(Vec<i16>),
    /// Constant value.
    Constant(i16),
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::Sine {
            frequency_hz: DEFAULT_TONE_HZ,
            amplitude: DEFAULT_TONE_AMPLITUDE,
        }
    }
}

/// Failures to inject into the driver lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    pub fail_data_interface: bool,
    pub fail_device: bool,
    /// Non-zero status returned by `open`.
    pub open_status: Option<i32>,
    /// Zero-based read index that fails, and the status it returns.
    pub fail_read_at: Option<(usize, i32)>,
}

impl FaultPlan {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fail_data_interface() -> Self {
        Self {
            fail_data_interface: true,
            ..Default::default()
        }
    }

    pub fn fail_device() -> Self {
        Self {
            fail_device: true,
            ..Default::default()
        }
    }

    pub fn fail_open(status: i32) -> Self {
        Self {
            open_status: Some(status),
            ..Default::default()
        }
    }

    pub fn fail_read(index: usize, status: i32) -> Self {
        Self {
            fail_read_at: Some((index, status)),
            ..Default::default()
        }
    }
}

/// Data interface handle of the simulation.
#[derive(Debug)]
pub struct SimDataInterface {
    id: u32,
    config: DeviceConfig,
}

impl SimDataInterface {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }
}

/// Device handle of the simulation.
#[derive(Debug)]
pub struct SimDevice {
    id: u32,
    channels: usize,
    format: Option<StreamFormat>,
}

impl SimDevice {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn format(&self) -> Option<&StreamFormat> {
        self.format.as_ref()
    }
}

/// Host stand-in for the ADC codec device driver.
pub struct SimCodecDriver {
    source: SampleSource,
    faults: FaultPlan,
    journal: Journal,
    next_id: u32,
    reads: usize,
    frame_cursor: u64,
    live_handles: usize,
}

impl SimCodecDriver {
    pub fn new(source: SampleSource, faults: FaultPlan, journal: Journal) -> Self {
        Self {
            source,
            faults,
            journal,
            next_id: 1,
            reads: 0,
            frame_cursor: 0,
            live_handles: 0,
        }
    }

    pub fn set_faults(&mut self, faults: FaultPlan) {
        self.faults = faults;
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Data interfaces and devices created and not yet deleted.
    pub fn live_handles(&self) -> usize {
        self.live_handles
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn fill(&mut self, buf: &mut [i16], channels: usize, sample_rate_hz: u32) {
        match &self.source {
            SampleSource::Sine {
                frequency_hz,
                amplitude,
            } => {
                let channels = channels.max(1);
                let rate = f64::from(sample_rate_hz.max(1));
                for (i, sample) in buf.iter_mut().enumerate() {
                    let frame = self.frame_cursor + (i / channels) as u64;
                    let t = frame as f64 / rate;
                    let value = amplitude * (2.0 * PI * frequency_hz * t).sin();
                    *sample = value.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16;
                }
                self.frame_cursor += (buf.len() / channels) as u64;
            }
            SampleSource::Pattern(pattern) if !pattern.is_empty() => {
                for (dst, src) in buf.iter_mut().zip(pattern.iter().cycle()) {
                    *dst = *src;
                }
            }
            SampleSource::Pattern(_) => buf.fill(0),
            SampleSource::Constant(value) => buf.fill(*value),
        }
    }
}

impl CodecDriver for SimCodecDriver {
    type DataInterface = SimDataInterface;
    type Device = SimDevice;

    fn create_data_interface(&mut self, config: &DeviceConfig) -> Option<SimDataInterface> {
        let id = self.allocate_id();
        let ok = !self.faults.fail_data_interface;
        self.journal.record(SimEvent::CreateDataInterface { id, ok });
        if !ok {
            return None;
        }
        self.live_handles += 1;
        Some(SimDataInterface {
            id,
            config: config.clone(),
        })
    }

    fn delete_data_interface(&mut self, data_if: SimDataInterface) {
        self.live_handles -= 1;
        self.journal
            .record(SimEvent::DeleteDataInterface { id: data_if.id });
    }

    fn create_device(&mut self, data_if: &SimDataInterface) -> Option<SimDevice> {
        let id = self.allocate_id();
        let ok = !self.faults.fail_device;
        self.journal.record(SimEvent::CreateDevice {
            id,
            data_if: data_if.id,
            ok,
        });
        if !ok {
            return None;
        }
        self.live_handles += 1;
        Some(SimDevice {
            id,
            channels: data_if.config.channel_num(),
            format: None,
        })
    }

    fn delete_device(&mut self, device: SimDevice) {
        self.live_handles -= 1;
        self.journal.record(SimEvent::DeleteDevice { id: device.id });
    }

    fn open(&mut self, device: &mut SimDevice, format: &StreamFormat) -> i32 {
        let status = self.faults.open_status.unwrap_or(STATUS_OK);
        self.journal.record(SimEvent::Open {
            device: device.id,
            format: *format,
            status,
        });
        if status == STATUS_OK {
            device.format = Some(*format);
            self.frame_cursor = 0;
        }
        status
    }

    fn read(&mut self, device: &mut SimDevice, buf: &mut [i16]) -> i32 {
        let index = self.reads;
        self.reads += 1;
        let bytes = buf.len() * 2;

        let status = match (self.faults.fail_read_at, device.format) {
            (Some((at, status)), _) if at == index => status,
            (_, None) => STATUS_WRONG_STATE,
            (_, Some(format)) => {
                self.fill(buf, device.channels, format.sample_rate_hz);
                i32::try_from(bytes).unwrap_or(i32::MAX)
            }
        };

        self.journal.record(SimEvent::Read {
            device: device.id,
            bytes,
            status,
        });
        status
    }

    fn close(&mut self, device: &mut SimDevice) {
        device.format = None;
        self.journal.record(SimEvent::Close { device: device.id });
    }
}
