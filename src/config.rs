//! Configuration management for swing position analysis

use crate::candidates::CandidateConfig;
use crate::constants::{DEFAULT_FPS, DEFAULT_TOLERANCE_FRAMES};
use crate::detection::{Algorithm, DetectionParams, PositionDetector};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detector configuration
    pub detector: DetectorConfig,

    /// Evaluation configuration
    pub evaluation: EvaluationConfig,

    /// Candidate generation configuration
    pub candidates: CandidateConfig,

    /// Input configuration
    pub input: InputConfig,
}

/// Detector selection and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Algorithm name (`threshold` or `peak`)
    pub algorithm: String,

    /// Thresholds and confidences
    #[serde(flatten)]
    pub params: DetectionParams,
}

/// Ground-truth matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Frames either side of an annotation that still count as a match
    pub tolerance_frames: u64,
}

/// Posetrack input handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Frame rate assumed when a posetrack does not state one
    pub default_fps: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Peak.to_string(),
            params: DetectionParams::default(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            tolerance_frames: DEFAULT_TOLERANCE_FRAMES,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { default_fps: DEFAULT_FPS }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `ConfigError` if it is
    /// not valid YAML for this schema.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text does not match the schema
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails and `Io` if the file
    /// cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Selected detector algorithm
    ///
    /// # Errors
    ///
    /// Returns `UnknownAlgorithm` for an unrecognised name
    pub fn algorithm(&self) -> Result<Algorithm> {
        self.detector.algorithm.parse()
    }

    /// Create a detector from configuration
    ///
    /// # Errors
    ///
    /// Returns `UnknownAlgorithm` for an unrecognised name and `ConfigError`
    /// for detection parameters that fail validation
    pub fn create_detector(&self) -> Result<PositionDetector> {
        let algorithm = self.algorithm()?;
        self.detector.params.validate()?;
        Ok(PositionDetector::with_params(algorithm, self.detector.params))
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first problem found as `UnknownAlgorithm` or `ConfigError`
    pub fn validate(&self) -> Result<()> {
        self.algorithm()?;
        self.detector.params.validate()?;
        self.candidates.validate()?;

        if !(self.input.default_fps.is_finite() && self.input.default_fps > 0.0) {
            return Err(Error::ConfigError("Default FPS must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Swing Position Detection Configuration

# Detector selection and tuning
detector:
  algorithm: "peak"
  top_spine_max: 25.0
  bottom_spine_min: 60.0
  release_spine_max: 45.0
  bottom_confidence_span: 30.0
  peak_confidence: 0.9
  transition_confidence: 0.5
  spine_peak_min: 50.0
  refractory_frames: 10
  slope_threshold: 2.0
  history_len: 10

# Ground-truth matching
evaluation:
  tolerance_frames: 2

# Annotation candidate generation
candidates:
  smoothing_window: 5
  min_distance: 15
  top_max_spine: 30.0
  top_min_arm_height: -80.0
  bottom_min_spine: 50.0

# Posetrack input
input:
  default_fps: 30.0
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_yaml("detector:\n  algorithm: threshold\n  refractory_frames: 20\n").unwrap();
        assert_eq!(config.algorithm().unwrap(), Algorithm::Threshold);
        assert_eq!(config.detector.params.refractory_frames, 20);
        assert_eq!(config.detector.params.history_len, 10);
        assert_eq!(config.evaluation.tolerance_frames, 2);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let config = Config::from_yaml("detector:\n  algorithm: neural\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::UnknownAlgorithm(_))));
        assert!(config.create_detector().is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.input.default_fps = 0.0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.candidates.smoothing_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(Config::from_yaml("detector: [1, 2"), Err(Error::ConfigError(_))));
    }
}
