use crate::models::config::{ChannelCodes, DeviceConfig, BYTES_PER_SAMPLE, MAX_CHANNELS};
use crate::models::error::CaptureError;
use crate::models::request::CaptureRequest;

/// Check the request shape and narrow the used channel ids to 8-bit codes.
///
/// Pure: runs before any allocator or driver call.
pub fn validate(request: &CaptureRequest) -> Result<ChannelCodes, CaptureError> {
    if request.channel_num > MAX_CHANNELS {
        return Err(CaptureError::InvalidArgument(format!(
            "too many channels (max {})",
            MAX_CHANNELS
        )));
    }
    if request.channel_list.len() < request.channel_num {
        return Err(CaptureError::InvalidArgument(
            "channel list shorter than channel_num".into(),
        ));
    }
    if request.channel_num == 0 {
        return Err(CaptureError::InvalidArgument(
            "at least one channel is required".into(),
        ));
    }
    if request.chunk_samples == 0 {
        return Err(CaptureError::InvalidArgument(
            "chunk_samples must be positive".into(),
        ));
    }
    if request.sample_rate_hz == 0 {
        return Err(CaptureError::InvalidArgument(
            "sample rate must be positive".into(),
        ));
    }
    buffer_size(request.chunk_samples, request.channel_num).ok_or_else(|| {
        CaptureError::InvalidArgument(format!(
            "chunk of {} samples x {} channels is too large",
            request.chunk_samples, request.channel_num
        ))
    })?;

    let mut channels = ChannelCodes::new();
    for &id in request.channel_list.iter().take(request.channel_num) {
        let code = u8::try_from(id).map_err(|_| {
            CaptureError::InvalidArgument(format!("channel id {} does not fit 8 bits", id))
        })?;
        channels
            .push(code)
            .map_err(|_| CaptureError::InvalidArgument("channel capacity exceeded".into()))?;
    }
    Ok(channels)
}

/// Validate `request` and build the data-interface configuration for it.
pub fn device_config(request: &CaptureRequest) -> Result<DeviceConfig, CaptureError> {
    let channels = validate(request)?;
    Ok(DeviceConfig::new(
        request.unit_id,
        channels,
        request.sample_rate_hz,
        request.attenuation,
    ))
}

/// Byte size of one interleaved 16-bit chunk, `None` on overflow.
pub fn buffer_size(chunk_samples: usize, channel_num: usize) -> Option<usize> {
    chunk_samples
        .checked_mul(BYTES_PER_SAMPLE)?
        .checked_mul(channel_num)
}
