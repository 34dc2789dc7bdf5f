use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// ADC input attenuation (input range / gain) applied to every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Attenuation {
    #[default]
    Db0 = 0,
    Db2_5 = 1,
    Db6 = 2,
    Db12 = 3,
}

impl Attenuation {
    /// Hardware enumerant passed to the driver.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i64> for Attenuation {
    type Error = CaptureError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Db0),
            1 => Ok(Self::Db2_5),
            2 => Ok(Self::Db6),
            3 => Ok(Self::Db12),
            other => Err(CaptureError::InvalidArgument(format!(
                "unknown attenuation: {}",
                other
            ))),
        }
    }
}

/// ADC peripheral selected by `unit_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdcUnit {
    Unit1,
    Unit2,
}

impl AdcUnit {
    pub fn from_id(unit_id: i32) -> Option<Self> {
        match unit_id {
            0 => Some(Self::Unit1),
            1 => Some(Self::Unit2),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            Self::Unit1 => 0,
            Self::Unit2 => 1,
        }
    }
}

/// Arguments of a single capture call.
///
/// Only the first `channel_num` entries of `channel_list` are used. Shape
/// constraints are checked by the validator before any resource is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Samples per channel in one chunk.
    pub chunk_samples: usize,

    /// Hardware ADC unit selector, passed through to the driver.
    pub unit_id: i32,

    /// Channel identifiers, in interleave order.
    pub channel_list: Vec<i64>,

    /// Number of channels to capture (1..=10).
    pub channel_num: usize,

    pub sample_rate_hz: u32,

    pub attenuation: Attenuation,
}

impl CaptureRequest {
    pub fn new(
        chunk_samples: usize,
        unit_id: i32,
        channel_list: Vec<i64>,
        channel_num: usize,
        sample_rate_hz: u32,
        attenuation: Attenuation,
    ) -> Self {
        Self {
            chunk_samples,
            unit_id,
            channel_list,
            channel_num,
            sample_rate_hz,
            attenuation,
        }
    }

    /// Build a request from the untyped integer call contract.
    ///
    /// Rejects values that do not fit their field and unknown attenuation
    /// enumerants. Channel count and list length are left to the validator.
    pub fn from_raw(
        chunk_samples: i64,
        unit_id: i64,
        channel_list: &[i64],
        channel_num: i64,
        sample_rate_hz: i64,
        attenuation: i64,
    ) -> Result<Self, CaptureError> {
        let chunk_samples = usize::try_from(chunk_samples).map_err(|_| {
            CaptureError::InvalidArgument(format!("chunk_samples out of range: {}", chunk_samples))
        })?;
        let unit_id = i32::try_from(unit_id)
            .map_err(|_| CaptureError::InvalidArgument(format!("unit_id out of range: {}", unit_id)))?;
        let channel_num = usize::try_from(channel_num).map_err(|_| {
            CaptureError::InvalidArgument(format!("channel_num out of range: {}", channel_num))
        })?;
        let sample_rate_hz = u32::try_from(sample_rate_hz).map_err(|_| {
            CaptureError::InvalidArgument(format!("sample_rate_hz out of range: {}", sample_rate_hz))
        })?;

        Ok(Self {
            chunk_samples,
            unit_id,
            channel_list: channel_list.to_vec(),
            channel_num,
            sample_rate_hz,
            attenuation: Attenuation::try_from(attenuation)?,
        })
    }

    /// Size in bytes of one interleaved chunk, `None` if it overflows.
    pub fn chunk_bytes(&self) -> Option<usize> {
        crate::pipeline::validator::buffer_size(self.chunk_samples, self.channel_num)
    }
}
