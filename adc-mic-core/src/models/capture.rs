use serde::{Deserialize, Serialize};

use super::request::CaptureRequest;
use super::state::AcquisitionState;
use super::statistics::CaptureStatistics;
use crate::processing::wav_format;

/// Outcome of one capture call.
///
/// `data` holds the raw little-endian bytes of the last successfully read
/// chunk, or nothing if no chunk completed. It is never a partial chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub data: Vec<u8>,
    pub statistics: CaptureStatistics,
    pub chunks_completed: usize,
    pub state: AcquisitionState,
}

impl Capture {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Decode the returned bytes into interleaved samples.
    pub fn samples(&self) -> Vec<i16> {
        wav_format::decode_pcm16(&self.data)
    }
}

/// Metadata describing an exported chunk.
///
/// Serializable for the JSON sidecar written next to a WAV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub id: String,
    pub created_at: String,
    pub unit_id: i32,
    pub channels: Vec<i64>,
    pub sample_rate_hz: u32,
    pub chunk_samples: usize,
    pub byte_len: usize,
    pub checksum: String,
    pub global_min: i16,
    pub global_max: i16,
}

impl CaptureMetadata {
    pub fn new(request: &CaptureRequest, capture: &Capture, checksum: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            unit_id: request.unit_id,
            channels: request
                .channel_list
                .iter()
                .take(request.channel_num)
                .copied()
                .collect(),
            sample_rate_hz: request.sample_rate_hz,
            chunk_samples: request.chunk_samples,
            byte_len: capture.data.len(),
            checksum: checksum.to_string(),
            global_min: capture.statistics.global_min,
            global_max: capture.statistics.global_max,
        }
    }
}
