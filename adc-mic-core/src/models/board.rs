//! ESP32-S3 GPIO to ADC routing.
//!
//! GPIO1–GPIO10 are ADC1 channels 0–9, GPIO11–GPIO20 are ADC2 channels 0–9.

use super::error::CaptureError;
use super::request::AdcUnit;

/// Analog input selected by a GPIO number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdcPin {
    pub gpio: u8,
    pub unit: AdcUnit,
    pub channel: u8,
}

impl AdcPin {
    pub fn from_gpio(gpio: u8) -> Result<Self, CaptureError> {
        let (unit, channel) = match gpio {
            1..=10 => (AdcUnit::Unit1, gpio - 1),
            11..=20 => (AdcUnit::Unit2, gpio - 11),
            _ => {
                return Err(CaptureError::InvalidArgument(format!(
                    "GPIO{} is not an ADC input",
                    gpio
                )))
            }
        };
        Ok(Self {
            gpio,
            unit,
            channel,
        })
    }

    pub fn unit_id(&self) -> i32 {
        self.unit.id()
    }
}
