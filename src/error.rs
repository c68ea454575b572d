//! Error types for the body pointing library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Geometric operation impossible because two directions are parallel
    #[error("Parallel geometry: {0}")]
    Parallel(String),

    /// Point lies outside the physical rectangle (or plane) of a screen
    #[error("Point is not on screen {screen_id}: {reason}")]
    NotOnScreen {
        /// Identifier of the rejecting screen
        screen_id: u32,
        /// Which check failed
        reason: String,
    },

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Pitch/roll correction refused because an angle exceeds ±90°
    #[error("Cannot correct orientation, danger of gimbal lock (pitch {pitch:.3} rad, roll {roll:.3} rad)")]
    GimbalLock {
        /// Effective pitch correction angle in radians
        pitch: f64,
        /// Effective roll correction angle in radians
        roll: f64,
    },

    /// Exactly one depth camera must be connected
    #[error("Expected exactly one connected camera, found {0}")]
    CameraCount(usize),

    /// Body tracking SDK binaries are missing
    #[error("Body tracking SDK not found at {}", .0.display())]
    SdkNotFound(PathBuf),

    /// Hand classification model file is missing
    #[error("Hand classification model not found at {}", .0.display())]
    ModelNotFound(PathBuf),

    /// Tracking source failed while running
    #[error("Tracker error: {0}")]
    Tracker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Start-up failures the caller can fix and retry
    #[must_use]
    pub const fn is_device_setup(&self) -> bool {
        matches!(self, Self::CameraCount(_) | Self::SdkNotFound(_) | Self::ModelNotFound(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
