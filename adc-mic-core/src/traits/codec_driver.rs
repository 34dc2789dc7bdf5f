use crate::models::config::{DeviceConfig, StreamFormat};

/// Driver status meaning success.
pub const STATUS_OK: i32 = 0;

/// Driver status for an operation on a device in the wrong state.
pub const STATUS_WRONG_STATE: i32 = -6;

/// Low-level codec/ADC driver.
///
/// Handles move into the delete calls, so each one can be released at most
/// once. Implemented by:
/// - `SimCodecDriver` (host simulation)
/// - Future: an ESP-IDF `esp_codec_dev` binding
pub trait CodecDriver {
    /// Framing/buffering object describing how raw ADC samples are delivered.
    type DataInterface;

    /// Readable input device bound to a data interface.
    type Device;

    /// Create the ADC data interface, or `None` if the driver refuses.
    fn create_data_interface(&mut self, config: &DeviceConfig) -> Option<Self::DataInterface>;

    fn delete_data_interface(&mut self, data_if: Self::DataInterface);

    /// Create an input device on top of `data_if`, or `None` on failure.
    fn create_device(&mut self, data_if: &Self::DataInterface) -> Option<Self::Device>;

    fn delete_device(&mut self, device: Self::Device);

    /// Open the device with `format`. Returns [`STATUS_OK`] or a driver error.
    fn open(&mut self, device: &mut Self::Device, format: &StreamFormat) -> i32;

    /// Blocking read filling all of `buf`.
    ///
    /// Returns the number of bytes read, or a negative driver error.
    fn read(&mut self, device: &mut Self::Device, buf: &mut [i16]) -> i32;

    fn close(&mut self, device: &mut Self::Device);
}
