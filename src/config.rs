//! Pipeline configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tracker::DEFAULT_PPM;

/// Cadences and calibration consumed by the frame loop.
///
/// Every field is optional in YAML; missing ones take their default.
///
/// ```yaml
/// detection_interval: 10
/// skip_factor: 2
/// ppm: 8.8
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run the detector on every Nth frame
    pub detection_interval: u32,
    /// Emit every Nth frame to the output
    pub skip_factor: u32,
    /// Pixels per metre
    pub ppm: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection_interval: 10,
            skip_factor: 2,
            ppm: DEFAULT_PPM,
        }
    }
}

impl PipelineConfig {
    pub fn with_detection_interval(mut self, detection_interval: u32) -> Self {
        self.detection_interval = detection_interval;
        self
    }

    pub fn with_skip_factor(mut self, skip_factor: u32) -> Self {
        self.skip_factor = skip_factor;
        self
    }

    pub fn with_ppm(mut self, ppm: f64) -> Self {
        self.ppm = ppm;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detection_interval == 0 {
            return Err(ConfigError::ZeroDetectionInterval);
        }
        if self.skip_factor == 0 {
            return Err(ConfigError::ZeroSkipFactor);
        }
        if !(self.ppm.is_finite() && self.ppm > 0.0) {
            return Err(ConfigError::InvalidPpm(self.ppm));
        }
        Ok(())
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Frame rate of the emitted video for a given input frame rate.
    pub fn output_fps(&self, input_fps: f64) -> f64 {
        input_fps / self.skip_factor as f64
    }

    /// Whether frame `frame_index` goes to the output. A zero skip factor
    /// emits nothing.
    pub fn is_emission_frame(&self, frame_index: u64) -> bool {
        frame_index.checked_rem(self.skip_factor as u64) == Some(0)
    }
}
