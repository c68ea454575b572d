//! Configuration management for the body pointing application

use crate::{
    constants::{
        DEFAULT_CAMERA_TILT_DEG, DEFAULT_FINE_SLOWDOWN, DEFAULT_HAND_STATE_WINDOW, DEFAULT_JITTER_THRESHOLD_PX,
        DEFAULT_MIN_POINTER_SEPARATION_PX, DEFAULT_SELECT_DEBOUNCE_SECS, DEFAULT_SELECT_MAX_CHEST_APPROACH_MM,
        DEFAULT_SELECT_MAX_HEIGHT_DRIFT_MM, DEFAULT_SELECT_MIN_APPROACH_MM, DEFAULT_STATUS_INTERVAL_FRAMES,
    },
    controller::{ControllerSettings, SelectionThresholds},
    filters::{create_filter, one_euro::OneEuroParams},
    message::{JsonLinesSink, MessageSink},
    operation::{InteractionMechanism, PointingMechanism},
    screen::{EnvironmentPreset, ScreenConfig, ScreenEnvironment},
    tracking::{BodySelection, TrackerSettings},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Screen installation
    pub environment: EnvironmentConfig,

    /// Gesture interaction
    pub interaction: InteractionConfig,

    /// Joint smoothing
    pub filter: FilterConfig,

    /// Body tracking
    pub tracker: TrackerConfig,

    /// Touch injection
    pub touch: TouchConfig,

    /// Display and status output
    pub display: DisplayConfig,

    /// Device files
    pub device: DeviceConfig,

    /// Pointer message output
    pub output: OutputConfig,
}

/// Screen installation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Built-in installation, used when `screens` is empty
    pub preset: EnvironmentPreset,

    /// Explicit screen list in flattening order
    pub screens: Vec<ScreenConfig>,
}

/// Gesture interaction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Which hand selects and which pans
    pub mechanism: InteractionMechanism,

    /// Moving cursor or fixed centre reticle
    pub pointing: PointingMechanism,

    /// Pixel offset below which a coarse pointer stands still
    pub jitter_threshold_px: i32,

    /// Minimum distance between both pointers
    pub min_pointer_separation_px: f64,

    /// Damping of angular motion in fine pointing mode (0-1]
    pub fine_slowdown: f64,

    /// Minimum seconds between two taps
    pub select_debounce_secs: f64,

    /// Net horizontal approach of a push gesture
    pub select_min_approach_mm: f64,

    /// Allowed hand height drift during a push
    pub select_max_height_drift_mm: f64,

    /// Chest approach above which a push is taken for walking
    pub select_max_chest_approach_mm: f64,

    /// Frames of hand states used for majority voting
    pub hand_state_window: usize,
}

/// Joint smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter kind: "one_euro" or "none"
    pub kind: String,

    /// 1€ minimum cutoff frequency
    pub min_cutoff: f64,

    /// 1€ speed coefficient
    pub beta: f64,

    /// 1€ derivative cutoff frequency
    pub d_cutoff: f64,
}

/// Body tracking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Body to follow when several are tracked
    pub body_selection: BodySelection,

    /// Fixed downward tilt of the depth camera in degrees
    pub camera_tilt_deg: f64,

    /// Level skeletons using the accelerometer
    pub orientation_correction: bool,
}

/// Touch injection configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    /// Emit synthetic touch input
    pub enabled: bool,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Forward color frames to a viewer
    pub show_camera_feed: bool,

    /// Frames between two status reports
    pub status_interval_frames: u64,
}

/// Device file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Body tracking SDK installation
    pub sdk_path: PathBuf,

    /// Hand classification model
    pub model_path: PathBuf,
}

/// Pointer message output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// "stdout" or a file path for JSON lines
    pub messages: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            mechanism: InteractionMechanism::default(),
            pointing: PointingMechanism::default(),
            jitter_threshold_px: DEFAULT_JITTER_THRESHOLD_PX,
            min_pointer_separation_px: DEFAULT_MIN_POINTER_SEPARATION_PX,
            fine_slowdown: DEFAULT_FINE_SLOWDOWN,
            select_debounce_secs: DEFAULT_SELECT_DEBOUNCE_SECS,
            select_min_approach_mm: DEFAULT_SELECT_MIN_APPROACH_MM,
            select_max_height_drift_mm: DEFAULT_SELECT_MAX_HEIGHT_DRIFT_MM,
            select_max_chest_approach_mm: DEFAULT_SELECT_MAX_CHEST_APPROACH_MM,
            hand_state_window: DEFAULT_HAND_STATE_WINDOW,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        let params = OneEuroParams::default();
        Self {
            kind: "one_euro".to_string(),
            min_cutoff: params.min_cutoff,
            beta: params.beta,
            d_cutoff: params.d_cutoff,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            body_selection: BodySelection::default(),
            camera_tilt_deg: DEFAULT_CAMERA_TILT_DEG,
            orientation_correction: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_camera_feed: false,
            status_interval_frames: DEFAULT_STATUS_INTERVAL_FRAMES,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sdk_path: PathBuf::from("/usr/lib/x86_64-linux-gnu/libk4abt.so"),
            model_path: PathBuf::from("assets/keypoint_classifier.onnx"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            messages: "stdout".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or written
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Serialize to YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Build the configured screen environment
    ///
    /// # Errors
    ///
    /// Returns an error for invalid explicit screens
    pub fn screen_environment(&self) -> Result<ScreenEnvironment> {
        if self.environment.screens.is_empty() {
            ScreenEnvironment::preset(self.environment.preset)
        } else {
            ScreenEnvironment::from_configs("custom", &self.environment.screens)
        }
    }

    /// Interaction controller settings
    #[must_use]
    pub fn controller_settings(&self) -> ControllerSettings {
        let interaction = &self.interaction;
        ControllerSettings {
            mechanism: interaction.mechanism,
            pointing: interaction.pointing,
            jitter_threshold_px: interaction.jitter_threshold_px,
            min_pointer_separation_px: interaction.min_pointer_separation_px,
            fine_slowdown: interaction.fine_slowdown,
            select_debounce_secs: interaction.select_debounce_secs,
            selection: SelectionThresholds {
                min_approach_mm: interaction.select_min_approach_mm,
                max_height_drift_mm: interaction.select_max_height_drift_mm,
                max_chest_approach_mm: interaction.select_max_chest_approach_mm,
            },
            touch_enabled: self.touch.enabled,
        }
    }

    /// Filter tuning
    #[must_use]
    pub const fn filter_params(&self) -> OneEuroParams {
        OneEuroParams {
            min_cutoff: self.filter.min_cutoff,
            beta: self.filter.beta,
            d_cutoff: self.filter.d_cutoff,
        }
    }

    /// Body tracker settings
    #[must_use]
    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            body_selection: self.tracker.body_selection,
            camera_tilt_deg: self.tracker.camera_tilt_deg,
            orientation_correction: self.tracker.orientation_correction,
            filter_kind: self.filter.kind.clone(),
            filter: self.filter_params(),
        }
    }

    /// Open the configured pointer message output
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be created
    pub fn message_sink(&self) -> Result<Box<dyn MessageSink>> {
        match self.output.messages.as_str() {
            "stdout" | "-" => Ok(Box::new(JsonLinesSink::stdout())),
            path => Ok(Box::new(JsonLinesSink::create(path)?)),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let interaction = &self.interaction;

        // Validate interaction thresholds
        if interaction.jitter_threshold_px < 0 {
            return Err(Error::ConfigError("Jitter threshold must not be negative".to_string()));
        }
        if !(interaction.min_pointer_separation_px >= 0.0) {
            return Err(Error::ConfigError("Pointer separation must not be negative".to_string()));
        }
        if !(interaction.fine_slowdown > 0.0 && interaction.fine_slowdown <= 1.0) {
            return Err(Error::ConfigError("Fine slowdown must be in (0, 1]".to_string()));
        }
        if !(interaction.select_debounce_secs >= 0.0) {
            return Err(Error::ConfigError("Select debounce must not be negative".to_string()));
        }
        if !(interaction.select_min_approach_mm > 0.0) {
            return Err(Error::ConfigError("Select approach must be greater than 0".to_string()));
        }
        if !(interaction.select_max_height_drift_mm >= 0.0 && interaction.select_max_chest_approach_mm >= 0.0) {
            return Err(Error::ConfigError("Select tolerances must not be negative".to_string()));
        }
        if interaction.hand_state_window == 0 {
            return Err(Error::ConfigError(
                "Hand state window must be greater than 0".to_string(),
            ));
        }

        // Validate filter parameters
        create_filter(&self.filter.kind, self.filter_params())
            .map_err(|e| Error::ConfigError(format!("Invalid filter: {e}")))?;
        if !(self.filter.min_cutoff > 0.0 && self.filter.d_cutoff > 0.0) {
            return Err(Error::ConfigError("Filter cutoffs must be greater than 0".to_string()));
        }
        if !(self.filter.beta >= 0.0) {
            return Err(Error::ConfigError("Filter beta must not be negative".to_string()));
        }

        // Validate tracker settings
        if !(-90.0..=90.0).contains(&self.tracker.camera_tilt_deg) {
            return Err(Error::ConfigError(
                "Camera tilt must be between -90 and 90 degrees".to_string(),
            ));
        }
        if self.display.status_interval_frames == 0 {
            return Err(Error::ConfigError(
                "Status interval must be greater than 0".to_string(),
            ));
        }

        // Validate explicit screens
        let mut ids = HashSet::new();
        for screen in &self.environment.screens {
            if !ids.insert(screen.id) {
                return Err(Error::ConfigError(format!("Duplicate screen id {}", screen.id)));
            }
            if screen.px_width == 0 || screen.px_height == 0 {
                return Err(Error::ConfigError(format!(
                    "Screen {} must have a non-zero pixel size",
                    screen.id
                )));
            }
        }
        self.screen_environment()
            .map_err(|e| Error::ConfigError(format!("Invalid screen environment: {e}")))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Body Pointer Configuration

# Screen installation: a preset, or an explicit list of screens
environment:
  preset: single_above   # single_above, single_below, curved, wrap_around
  screens: []
  # screens:
  #   - id: 0
  #     corner_a: { x: 825.0, y: -1080.0, z: 0.0 }
  #     corner_b: { x: -825.0, y: -150.0, z: 0.0 }
  #     px_width: 1920
  #     px_height: 1080

# Gesture interaction
interaction:
  mechanism: select_right_pan_left   # select_left_pan_right, select_both_pan_both
  pointing: pointer_to_object        # object_to_pointer
  jitter_threshold_px: 6
  min_pointer_separation_px: 80.0
  fine_slowdown: 0.15
  select_debounce_secs: 1.0
  select_min_approach_mm: 40.0
  select_max_height_drift_mm: 25.0
  select_max_chest_approach_mm: 10.0
  hand_state_window: 5

# Joint smoothing
filter:
  kind: "one_euro"   # one_euro, none
  min_cutoff: 1.0
  beta: 0.0
  d_cutoff: 1.0

# Body tracking
tracker:
  body_selection: closest   # closest, first
  camera_tilt_deg: -6.0
  orientation_correction: true

# Touch injection
touch:
  enabled: false

# Display settings
display:
  show_camera_feed: false
  status_interval_frames: 30

# Device files
device:
  sdk_path: "/usr/lib/x86_64-linux-gnu/libk4abt.so"
  model_path: "assets/keypoint_classifier.onnx"

# Pointer messages as JSON lines
output:
  messages: "stdout"
"#;
