//! Configuration file handling

use swing_position_detection::{
    config::{Config, EXAMPLE_CONFIG},
    detection::Algorithm,
    Error,
};
use tempfile::NamedTempFile;

#[test]
fn test_config_file_round_trip() {
    let mut config = Config::default();
    config.detector.algorithm = "threshold".to_string();
    config.detector.params.top_spine_max = 20.0;
    config.detector.params.refractory_frames = 15;
    config.evaluation.tolerance_frames = 3;
    config.candidates.min_distance = 20;
    config.input.default_fps = 60.0;

    let file = NamedTempFile::new().unwrap();
    config.to_file(file.path()).unwrap();
    let loaded = Config::from_file(file.path()).unwrap();

    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_detector_params_are_flat_in_yaml() {
    let yaml = serde_yaml::to_string(&Config::default()).unwrap();
    assert!(yaml.contains("refractory_frames: 10"));
    assert!(!yaml.contains("params"));
}

#[test]
fn test_example_config_creates_peak_detector() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    let detector = config.create_detector().unwrap();
    assert_eq!(detector.algorithm(), Algorithm::Peak);
    assert_eq!(detector.params(), &config.detector.params);
}

#[test]
fn test_configured_thresholds_change_labels() {
    use swing_position_detection::angles::AngleProfile;
    use swing_position_detection::detection::Position;

    let config = Config::from_yaml("detector:\n  algorithm: threshold\n  top_spine_max: 40.0\n").unwrap();
    let mut detector = config.create_detector().unwrap();
    let profile = AngleProfile {
        spine: 30.0,
        ..AngleProfile::default()
    };
    let result = detector.detect_profile(0, 0.0, profile);
    assert_eq!(result.detected_position, Some(Position::Top));
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{}\n").unwrap();
    assert_eq!(Config::from_file(file.path()).unwrap(), Config::default());
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file("/nonexistent/swing-positions.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_invalid_detector_settings() {
    let config = Config::from_yaml("detector:\n  history_len: 2\n").unwrap();
    match config.validate() {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("History length")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }

    let config = Config::from_yaml("detector:\n  transition_confidence: -0.5\n").unwrap();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

    let config = Config::from_yaml("detector:\n  refractory_frames: many\n");
    assert!(matches!(config, Err(Error::ConfigError(_))));
}

#[test]
fn test_create_detector_rejects_short_history() {
    let config = Config::from_yaml("detector:\n  algorithm: peak\n  history_len: 2\n").unwrap();
    match config.create_detector() {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("History length")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }

    let config = Config::from_yaml("detector:\n  algorithm: kalman\n  history_len: 2\n").unwrap();
    assert!(matches!(config.create_detector(), Err(Error::UnknownAlgorithm(_))));
}
