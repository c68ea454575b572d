//! Body pointing library: turns depth-camera body and hand tracking into
//! on-screen pointer positions and touch gestures.
//!
//! The pipeline for each tracker frame:
//! 1. Body selection and per-joint 1€ smoothing ([`tracking`])
//! 2. Orientation correction from the camera accelerometer
//! 3. Pointer rays from shoulder through hand, intersected with the screens
//!    of a [`screen::ScreenEnvironment`]
//! 4. Gesture interpretation into an [`operation::Operation`] by the
//!    [`controller::InteractionController`]
//! 5. Touch commands and a pointer message for the frame
//!
//! # Examples
//!
//! ## Replaying a recording
//!
//! ```no_run
//! use body_pointer::{app::PointingApp, config::Config, source::ReplaySource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ReplaySource::open("session.jsonl")?;
//! let mut app = PointingApp::new(Config::default(), Box::new(source))?;
//! app.start()?;
//! let summary = app.run()?;
//! println!("{} frames, last operation {}", summary.frames, summary.last_operation);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving the controller directly
//!
//! ```no_run
//! use body_pointer::{
//!     controller::{ControllerSettings, InteractionController},
//!     history::InteractionHistory,
//!     screen::{EnvironmentPreset, ScreenEnvironment},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let environment = ScreenEnvironment::preset(EnvironmentPreset::Curved)?;
//! let mut controller = InteractionController::new(environment, ControllerSettings::default());
//! let mut history = InteractionHistory::default();
//!
//! // No body in this frame: pointers disappear and the operation is IDLE
//! let outcome = controller.process_frame(None, &mut history);
//! assert!(!outcome.message.right.present);
//! # Ok(())
//! # }
//! ```

/// Points, vectors, lines and planes in tracker space
pub mod geom;

/// Signal filtering algorithms for smoothing joint coordinates
pub mod filters;

/// Screens and multi-screen environments
pub mod screen;

/// Skeletons, hand states and per-frame body results
pub mod body;

/// Body selection, smoothing and orientation correction
pub mod tracking;

/// Short histories of hand positions and states
pub mod history;

/// Operations and the transitions between them
pub mod operation;

/// Gesture state machine
pub mod controller;

/// Synthetic touch input
pub mod touch;

/// Pointer and status messages
pub mod message;

/// Background hand classification
pub mod hands;

/// Sources of tracker frames
pub mod source;

/// Utility functions for numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
