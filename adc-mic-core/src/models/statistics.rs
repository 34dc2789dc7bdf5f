use serde::{Deserialize, Serialize};

/// Running min/max over every sample examined during a capture.
///
/// Starts inverted (`min = i16::MAX`, `max = i16::MIN`) so the first sample
/// always replaces both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStatistics {
    pub global_min: i16,
    pub global_max: i16,
    pub samples_examined: u64,
}

impl CaptureStatistics {
    pub fn new() -> Self {
        Self {
            global_min: i16::MAX,
            global_max: i16::MIN,
            samples_examined: 0,
        }
    }

    /// Fold a block of samples into the running bounds.
    pub fn update(&mut self, samples: &[i16]) {
        for &s in samples {
            if s < self.global_min {
                self.global_min = s;
            }
            if s > self.global_max {
                self.global_max = s;
            }
        }
        self.samples_examined += samples.len() as u64;
    }

    pub fn is_empty(&self) -> bool {
        self.samples_examined == 0
    }

    /// Peak-to-peak range, or 0 if nothing was examined.
    pub fn range(&self) -> i32 {
        if self.is_empty() {
            return 0;
        }
        i32::from(self.global_max) - i32::from(self.global_min)
    }

    /// Largest absolute excursion normalised to 0.0–1.0.
    pub fn peak_level(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let peak = i32::from(self.global_min)
            .unsigned_abs()
            .max(i32::from(self.global_max).unsigned_abs());
        (peak as f32 / 32768.0).min(1.0)
    }

    /// Whether `sample` lies within the observed bounds.
    pub fn contains(&self, sample: i16) -> bool {
        self.global_min <= sample && sample <= self.global_max
    }
}

impl Default for CaptureStatistics {
    fn default() -> Self {
        Self::new()
    }
}
