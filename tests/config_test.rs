//! Configuration loading, saving and validation

use body_pointer::{
    config::{Config, EXAMPLE_CONFIG},
    geom::Point3D,
    operation::{InteractionMechanism, PointingMechanism},
    screen::{EnvironmentPreset, ScreenConfig},
    tracking::BodySelection,
    Error,
};

fn rejected(config: &Config) -> String {
    match config.validate() {
        Err(Error::ConfigError(message)) => message,
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    config.validate().unwrap();
    assert_eq!(config.environment.preset, EnvironmentPreset::SingleAbove);
    assert_eq!(config.interaction.jitter_threshold_px, 6);
    assert_eq!(config.interaction.min_pointer_separation_px, 80.0);
    assert_eq!(config.interaction.hand_state_window, 5);
    assert_eq!(config.tracker.camera_tilt_deg, -6.0);
    assert!(!config.touch.enabled);
    assert_eq!(config.output.messages, "stdout");
}

#[test]
fn test_example_config_parses() {
    let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
    config.validate().unwrap();
}

#[test]
fn test_save_and_load() {
    let mut config = Config::default();
    config.environment.preset = EnvironmentPreset::Curved;
    config.interaction.mechanism = InteractionMechanism::SelectLeftPanRight;
    config.interaction.pointing = PointingMechanism::ObjectToPointer;
    config.tracker.body_selection = BodySelection::First;
    config.filter.beta = 0.007;
    config.touch.enabled = true;

    let path = std::env::temp_dir().join(format!("body_pointer_config_{}.yaml", std::process::id()));
    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_and_bad_yaml() {
    assert!(matches!(Config::from_file("/nonexistent/body_pointer.yaml"), Err(Error::IoError(_))));

    let path = std::env::temp_dir().join(format!("body_pointer_bad_{}.yaml", std::process::id()));
    std::fs::write(&path, "interaction: [not, a, map]\n").unwrap();
    let result = Config::from_file(&path);
    std::fs::remove_file(&path).ok();
    match result {
        Err(Error::ConfigError(message)) => assert!(message.starts_with("Failed to parse config")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_yaml_enum_names() {
    let yaml = "
environment:
  preset: wrap_around
interaction:
  mechanism: select_both_pan_both
  pointing: object_to_pointer
tracker:
  body_selection: first
";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.environment.preset, EnvironmentPreset::WrapAround);
    assert_eq!(config.interaction.mechanism, InteractionMechanism::SelectBothPanBoth);
    assert_eq!(config.interaction.pointing, PointingMechanism::ObjectToPointer);
    assert_eq!(config.tracker.body_selection, BodySelection::First);
    assert_eq!(config.screen_environment().unwrap().screens().len(), 4);
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = Config::default();
    config.interaction.hand_state_window = 0;
    assert!(rejected(&config).contains("Hand state window"));

    let mut config = Config::default();
    config.interaction.fine_slowdown = 1.5;
    assert!(rejected(&config).contains("Fine slowdown"));

    let mut config = Config::default();
    config.interaction.fine_slowdown = 0.0;
    rejected(&config);

    let mut config = Config::default();
    config.interaction.jitter_threshold_px = -1;
    rejected(&config);

    let mut config = Config::default();
    config.filter.min_cutoff = 0.0;
    assert!(rejected(&config).contains("cutoff"));

    let mut config = Config::default();
    config.filter.beta = -0.5;
    rejected(&config);

    let mut config = Config::default();
    config.filter.kind = "kalman".to_string();
    assert!(rejected(&config).contains("Invalid filter"));

    let mut config = Config::default();
    config.display.status_interval_frames = 0;
    rejected(&config);
}

#[test]
fn test_validation_rejects_bad_screens() {
    let screen = ScreenConfig {
        id: 1,
        corner_a: Point3D::new(825.0, -1080.0, 0.0),
        corner_b: Point3D::new(-825.0, -150.0, 0.0),
        px_width: 1920,
        px_height: 1080,
    };

    let mut config = Config::default();
    config.environment.screens = vec![screen, screen];
    assert!(rejected(&config).contains("Duplicate screen id 1"));

    let mut config = Config::default();
    config.environment.screens = vec![ScreenConfig { px_height: 0, ..screen }];
    assert!(rejected(&config).contains("non-zero pixel size"));

    let mut config = Config::default();
    config.environment.screens = vec![screen];
    config.validate().unwrap();
    assert_eq!(config.screen_environment().unwrap().name(), "custom");
}

#[test]
fn test_settings_follow_sections() {
    let mut config = Config::default();
    config.interaction.select_debounce_secs = 0.5;
    config.filter.kind = "none".to_string();
    config.tracker.orientation_correction = false;

    let controller = config.controller_settings();
    assert_eq!(controller.select_debounce_secs, 0.5);
    assert!(!controller.touch_enabled);

    let tracker = config.tracker_settings();
    assert_eq!(tracker.filter_kind, "none");
    assert!(!tracker.orientation_correction);
    assert_eq!(tracker.filter, config.filter_params());
}
