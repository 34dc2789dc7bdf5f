use std::ops::BitOr;
use std::time::Duration;

use heapless::Vec as BoundedVec;
use serde::{Deserialize, Serialize};

use super::request::Attenuation;

/// Hardware ceiling on channels multiplexed into one stream.
pub const MAX_CHANNELS: usize = 10;

/// Driver-side store buffer size in bytes.
pub const MAX_STORE_BUF_SIZE: usize = 1024 * 2;

/// Driver-side conversion frame size in bytes.
pub const CONV_FRAME_SIZE: usize = 1024;

pub const BITS_PER_SAMPLE: u16 = 16;
pub const BYTES_PER_SAMPLE: usize = 2;

/// Channel codes narrowed to 8 bits, bounded by [`MAX_CHANNELS`].
pub type ChannelCodes = BoundedVec<u8, MAX_CHANNELS>;

/// Capability flags selecting the heap region a buffer is allocated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryCaps(u32);

impl MemoryCaps {
    pub const DEFAULT: Self = Self(1 << 0);
    pub const INTERNAL: Self = Self(1 << 1);
    pub const EIGHT_BIT: Self = Self(1 << 2);
    pub const SPIRAM: Self = Self(1 << 3);
    pub const DMA: Self = Self(1 << 4);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MemoryCaps {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Which samples of each chunk feed the running min/max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatisticsScope {
    /// Every interleaved sample of every channel.
    #[default]
    AllSamples,
    /// Only the first `chunk_samples` entries of the buffer, regardless of
    /// channel count.
    LeadingSamples,
}

/// Knobs of the acquisition loop that are not part of the call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Number of chunks read per call (default: 1). Only the last one is
    /// returned.
    pub repeat_count: usize,

    /// Cooperative yield after each read (default: 1 ms). Must be non-zero.
    pub yield_interval: Duration,

    /// Region the sample buffer is allocated from (default: internal, 8-bit
    /// accessible).
    pub memory_caps: MemoryCaps,

    pub statistics_scope: StatisticsScope,

    /// Number of leading chunks previewed on the diagnostic sink (default: 0).
    pub preview_chunks: usize,
}

impl CaptureOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.repeat_count == 0 {
            return Err("repeat count must be at least 1".into());
        }
        if self.yield_interval.is_zero() {
            return Err("yield interval must be non-zero".into());
        }
        Ok(())
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            repeat_count: 1,
            yield_interval: Duration::from_millis(1),
            memory_caps: MemoryCaps::INTERNAL | MemoryCaps::EIGHT_BIT,
            statistics_scope: StatisticsScope::AllSamples,
            preview_chunks: 0,
        }
    }
}

/// ADC data-interface configuration, built once from a validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    max_store_buf_size: usize,
    conv_frame_size: usize,
    unit_id: i32,
    channels: ChannelCodes,
    sample_rate_hz: u32,
    attenuation: Attenuation,
}

impl DeviceConfig {
    pub(crate) fn new(
        unit_id: i32,
        channels: ChannelCodes,
        sample_rate_hz: u32,
        attenuation: Attenuation,
    ) -> Self {
        Self {
            max_store_buf_size: MAX_STORE_BUF_SIZE,
            conv_frame_size: CONV_FRAME_SIZE,
            unit_id,
            channels,
            sample_rate_hz,
            attenuation,
        }
    }

    pub fn max_store_buf_size(&self) -> usize {
        self.max_store_buf_size
    }

    pub fn conv_frame_size(&self) -> usize {
        self.conv_frame_size
    }

    pub fn unit_id(&self) -> i32 {
        self.unit_id
    }

    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    pub fn channel_num(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    /// Stream format the device is opened with.
    pub fn stream_format(&self) -> StreamFormat {
        StreamFormat {
            sample_rate_hz: self.sample_rate_hz,
            // Bounded by MAX_CHANNELS.
            channel_count: self.channels.len() as u16,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }
}

/// Sample format requested when opening the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamFormat {
    pub sample_rate_hz: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
}
