//! Device lifecycle: data interface → device → open, with reverse unwind.

use crate::models::config::DeviceConfig;
use crate::models::error::{CaptureError, InitStage};
use crate::traits::codec_driver::{CodecDriver, STATUS_OK, STATUS_WRONG_STATE};

/// An opened codec device together with the data interface it reads from.
///
/// Dropping the session (or calling [`close_and_release`]) closes the device
/// if it was opened, deletes it, then deletes the data interface. Steps that
/// never happened are skipped, and each handle is released at most once.
///
/// [`close_and_release`]: DeviceSession::close_and_release
pub struct DeviceSession<'d, D: CodecDriver> {
    driver: &'d mut D,
    data_if: Option<D::DataInterface>,
    device: Option<D::Device>,
    opened: bool,
}

impl<'d, D: CodecDriver> DeviceSession<'d, D> {
    /// Create the data interface and device, then open the device.
    ///
    /// A failure at any step releases the steps already completed, in
    /// reverse order, before the error is returned.
    pub fn open(driver: &'d mut D, config: &DeviceConfig) -> Result<Self, CaptureError> {
        let Some(data_if) = driver.create_data_interface(config) else {
            log::error!("Failed to initialize ADC data interface");
            return Err(CaptureError::ResourceInit {
                stage: InitStage::DataInterface,
                status: None,
            });
        };
        log::debug!("ADC data interface created for unit {}", config.unit_id());

        let mut session = Self {
            driver,
            data_if: Some(data_if),
            device: None,
            opened: false,
        };

        let created = match session.data_if.as_ref() {
            Some(data_if) => session.driver.create_device(data_if),
            None => None,
        };
        let Some(mut device) = created else {
            log::error!("Failed to create codec device");
            return Err(CaptureError::ResourceInit {
                stage: InitStage::Device,
                status: None,
            });
        };

        let format = config.stream_format();
        let status = session.driver.open(&mut device, &format);
        session.device = Some(device);
        if status != STATUS_OK {
            log::error!("Codec device open failed: {}", status);
            return Err(CaptureError::ResourceInit {
                stage: InitStage::Open,
                status: Some(status),
            });
        }
        session.opened = true;

        log::debug!(
            "Codec device opened: {} Hz, {} channels, {} bits",
            format.sample_rate_hz,
            format.channel_count,
            format.bits_per_sample
        );
        Ok(session)
    }

    /// Blocking read into `buf`. Returns bytes read or a negative status.
    pub fn read(&mut self, buf: &mut [i16]) -> i32 {
        match self.device.as_mut() {
            Some(device) if self.opened => self.driver.read(device, buf),
            _ => STATUS_WRONG_STATE,
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn device(&self) -> Option<&D::Device> {
        self.device.as_ref()
    }

    pub fn data_interface(&self) -> Option<&D::DataInterface> {
        self.data_if.as_ref()
    }

    /// Close the device and delete both handles.
    pub fn close_and_release(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut device) = self.device.take() {
            if self.opened {
                self.driver.close(&mut device);
                self.opened = false;
            }
            self.driver.delete_device(device);
        }
        if let Some(data_if) = self.data_if.take() {
            self.driver.delete_data_interface(data_if);
        }
    }
}

impl<D: CodecDriver> Drop for DeviceSession<'_, D> {
    fn drop(&mut self) {
        self.release();
    }
}
