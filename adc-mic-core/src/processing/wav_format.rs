//! 16-bit PCM and WAV header helpers for captured chunks.

use crate::models::config::StreamFormat;

/// Size of the canonical PCM RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Largest data chunk whose RIFF size (`36 + data_size`) still fits in 32 bits.
pub const MAX_DATA_SIZE: u32 = u32::MAX - 36;

const PCM_FORMAT_TAG: u16 = 1;
const FMT_CHUNK_SIZE: u32 = 16;

/// Layout of the PCM stream described by a WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl WavSpec {
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate_hz * u32::from(self.block_align())
    }

    /// Build the header for `data_size` bytes of interleaved samples.
    ///
    /// Sizes above [`MAX_DATA_SIZE`] saturate the RIFF size field; callers
    /// reject them first.
    ///
    /// ```text
    /// "RIFF" <36 + data_size> "WAVE"
    /// "fmt " <16> <1> <channels> <rate> <byte_rate> <block_align> <bits>
    /// "data" <data_size>
    /// ```
    pub fn header(&self, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];
        let fields: [&[u8]; 13] = [
            b"RIFF",
            &data_size.saturating_add(36).to_le_bytes(),
            b"WAVE",
            b"fmt ",
            &FMT_CHUNK_SIZE.to_le_bytes(),
            &PCM_FORMAT_TAG.to_le_bytes(),
            &self.channels.to_le_bytes(),
            &self.sample_rate_hz.to_le_bytes(),
            &self.byte_rate().to_le_bytes(),
            &self.block_align().to_le_bytes(),
            &self.bits_per_sample.to_le_bytes(),
            b"data",
            &data_size.to_le_bytes(),
        ];
        let mut at = 0;
        for field in fields {
            header[at..at + field.len()].copy_from_slice(field);
            at += field.len();
        }
        header
    }

    /// Parse a canonical 44-byte PCM header. Returns the stream layout and data size.
    pub fn parse(header: &[u8]) -> Option<(Self, u32)> {
        let header = header.get(..WAV_HEADER_SIZE)?;
        if &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" || &header[36..40] != b"data" {
            return None;
        }
        let u16_at = |i: usize| u16::from_le_bytes([header[i], header[i + 1]]);
        let u32_at =
            |i: usize| u32::from_le_bytes([header[i], header[i + 1], header[i + 2], header[i + 3]]);
        if u16_at(20) != PCM_FORMAT_TAG {
            return None;
        }
        let spec = Self {
            channels: u16_at(22),
            sample_rate_hz: u32_at(24),
            bits_per_sample: u16_at(34),
        };
        Some((spec, u32_at(40)))
    }
}

impl From<StreamFormat> for WavSpec {
    fn from(format: StreamFormat) -> Self {
        Self {
            sample_rate_hz: format.sample_rate_hz,
            channels: format.channel_count,
            bits_per_sample: format.bits_per_sample,
        }
    }
}

/// Serialize samples as little-endian 16-bit PCM. Output is `2 * len` bytes.
pub fn encode_pcm16(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Inverse of [`encode_pcm16`]. A trailing odd byte is ignored.
pub fn decode_pcm16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
