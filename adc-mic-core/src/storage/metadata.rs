use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::capture::CaptureMetadata;
use crate::models::error::CaptureError;
use crate::storage::wav_export::hex_encode;

/// Sidecar location for a WAV export: `capture.wav` → `capture.metadata.json`.
pub fn sidecar_path(wav_path: &Path) -> PathBuf {
    wav_path.with_extension("metadata.json")
}

pub fn write_metadata(metadata: &CaptureMetadata, wav_path: &Path) -> Result<(), CaptureError> {
    let path = sidecar_path(wav_path);
    let file = File::create(&path)
        .map_err(|e| CaptureError::StorageError(format!("cannot create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, metadata)
        .map_err(|e| CaptureError::StorageError(format!("metadata encode: {}", e)))?;
    writer
        .flush()
        .map_err(|e| CaptureError::StorageError(e.to_string()))
}

pub fn read_metadata(wav_path: &Path) -> Result<CaptureMetadata, CaptureError> {
    let path = sidecar_path(wav_path);
    let file = File::open(&path)
        .map_err(|e| CaptureError::StorageError(format!("cannot open {}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| CaptureError::StorageError(format!("metadata decode: {}", e)))
}

/// Recompute the SHA-256 of the WAV file and compare it with its sidecar.
pub fn verify_export(wav_path: &Path) -> Result<bool, CaptureError> {
    let metadata = read_metadata(wav_path)?;
    let bytes = std::fs::read(wav_path)
        .map_err(|e| CaptureError::StorageError(format!("cannot read {}: {}", wav_path.display(), e)))?;
    let actual = hex_encode(&Sha256::digest(&bytes));
    if actual != metadata.checksum {
        log::warn!(
            "Checksum mismatch for {}: sidecar {}, file {}",
            wav_path.display(),
            metadata.checksum,
            actual
        );
    }
    Ok(actual == metadata.checksum)
}
