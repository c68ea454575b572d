//! Constants used throughout the application

/// Default tolerance for parallel/orthogonal checks and plane containment
pub const GEOMETRY_EPSILON: f64 = 1e-4;

/// Number of joints reported per tracked body
pub const JOINT_COUNT: usize = 32;

/// Frames of hand-tip coordinates kept for selection detection
pub const COORDINATE_HISTORY_LEN: usize = 3;

/// Frames of classified hand states kept for majority voting
pub const DEFAULT_HAND_STATE_WINDOW: usize = 5;

/// Pixel offset below which a coarse pointer keeps its previous value
pub const DEFAULT_JITTER_THRESHOLD_PX: i32 = 6;

/// Minimum distance between both pointers while both are on screen
pub const DEFAULT_MIN_POINTER_SEPARATION_PX: f64 = 80.0;

/// Damping applied to angular displacement in fine pointing mode
pub const DEFAULT_FINE_SLOWDOWN: f64 = 0.15;

/// Minimum seconds between two taps
pub const DEFAULT_SELECT_DEBOUNCE_SECS: f64 = 1.0;

/// Net horizontal approach (mm) a push must cover over the history window
pub const DEFAULT_SELECT_MIN_APPROACH_MM: f64 = 40.0;

/// Allowed vertical drift (mm) of the hand during a push
pub const DEFAULT_SELECT_MAX_HEIGHT_DRIFT_MM: f64 = 25.0;

/// Allowed chest approach (mm) during a push, beyond it the user is walking
pub const DEFAULT_SELECT_MAX_CHEST_APPROACH_MM: f64 = 10.0;

/// Default 1€ filter minimum cutoff (Hz)
pub const DEFAULT_MIN_CUTOFF: f64 = 1.0;

/// Default 1€ filter speed coefficient
pub const DEFAULT_BETA: f64 = 0.0;

/// Default 1€ filter derivative cutoff (Hz)
pub const DEFAULT_D_CUTOFF: f64 = 1.0;

/// Depth camera is mounted tilted downwards by this many degrees
pub const DEFAULT_CAMERA_TILT_DEG: f64 = -6.0;

/// Frames between two status reports
pub const DEFAULT_STATUS_INTERVAL_FRAMES: u64 = 30;
