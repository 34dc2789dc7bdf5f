use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::models::capture::{Capture, CaptureMetadata};
use crate::models::config::BITS_PER_SAMPLE;
use crate::models::error::CaptureError;
use crate::models::request::CaptureRequest;
use crate::processing::wav_format::{self, WavSpec};
use crate::storage::metadata;

/// Write a captured chunk as a 16-bit PCM WAV file.
///
/// ```text
/// [44-byte WAV header]
/// [interleaved little-endian 16-bit PCM]
/// ```
///
/// Returns the SHA-256 hex digest of the written file. An empty capture is
/// rejected rather than producing a header-only file.
pub fn write_wav(capture: &Capture, spec: WavSpec, path: &Path) -> Result<String, CaptureError> {
    if capture.is_empty() {
        return Err(CaptureError::StorageError("capture holds no samples".into()));
    }
    let data_size = wav_data_size(capture.data.len())?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;
    }

    let header = spec.header(data_size);

    let mut file = File::create(path)
        .map_err(|e| CaptureError::StorageError(format!("failed to create file: {}", e)))?;
    file.write_all(&header)
        .map_err(|e| CaptureError::StorageError(format!("write failed: {}", e)))?;
    file.write_all(&capture.data)
        .map_err(|e| CaptureError::StorageError(format!("write failed: {}", e)))?;
    file.flush().map_err(|e| CaptureError::StorageError(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(header);
    hasher.update(&capture.data);
    let checksum = hex_encode(&hasher.finalize());

    log::debug!(
        "Wrote {} bytes of PCM to {} (sha256 {})",
        capture.data.len(),
        path.display(),
        checksum
    );
    Ok(checksum)
}

/// Write the chunk as `path` plus its `.metadata.json` sidecar.
pub fn export_capture(
    request: &CaptureRequest,
    capture: &Capture,
    path: &Path,
) -> Result<CaptureMetadata, CaptureError> {
    let channels = u16::try_from(request.channel_num)
        .map_err(|_| CaptureError::InvalidArgument("channel count out of range".into()))?;
    let spec = WavSpec {
        sample_rate_hz: request.sample_rate_hz,
        channels,
        bits_per_sample: BITS_PER_SAMPLE,
    };
    let checksum = write_wav(capture, spec, path)?;
    let meta = CaptureMetadata::new(request, capture, &checksum);
    metadata::write_metadata(&meta, path)?;
    Ok(meta)
}

/// Data chunk size for `len` PCM bytes, bounded so the RIFF size fits 32 bits.
fn wav_data_size(len: usize) -> Result<u32, CaptureError> {
    u32::try_from(len)
        .ok()
        .filter(|&size| size <= wav_format::MAX_DATA_SIZE)
        .ok_or_else(|| {
            CaptureError::StorageError(format!("capture of {} bytes too large for WAV", len))
        })
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
