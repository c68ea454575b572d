//! Body selection, joint smoothing and camera orientation correction.
//!
//! [`BodyTracker`] turns raw [`TrackerFrame`]s into [`BodyResult`]s: it picks
//! one body, runs every joint coordinate through its own filter and rotates
//! the skeleton so that it is expressed in a level frame.

use crate::{
    body::{BodyResult, HandStates, Joint, Skeleton, TrackerFrame},
    constants::{DEFAULT_CAMERA_TILT_DEG, JOINT_COUNT},
    filters::{create_filter, one_euro::OneEuroParams, SignalFilter},
    geom::Point3D,
    Error, Result,
};
use log::{debug, info, warn};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Which body to follow when several are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySelection {
    /// Body whose chest is closest to the camera
    #[default]
    Closest,
    /// First body reported
    First,
}

impl BodySelection {
    /// Index of the selected body, `None` for an empty list
    #[must_use]
    pub fn select(self, bodies: &[Skeleton]) -> Option<usize> {
        match self {
            Self::First => (!bodies.is_empty()).then_some(0),
            Self::Closest => bodies
                .iter()
                .map(|body| body.joint(Joint::SpineChest).squared_norm())
                .enumerate()
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(index, _)| index),
        }
    }
}

/// Device orientation derived from the accelerometer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Rotation about the device x axis, radians
    pub pitch: f64,
    /// Rotation about the device z axis, radians
    pub roll: f64,
}

impl Orientation {
    /// Orientation from an accelerometer sample `[ax, ay, az]`; `None` if
    /// the sample gives no usable gravity direction
    #[must_use]
    pub fn from_accel(accel: [f64; 3]) -> Option<Self> {
        let [ax, ay, az] = accel;
        let magnitude = ax.hypot(ay).hypot(az);
        let pitch = (ax / magnitude).asin();
        let roll = (ay / az).atan();
        (pitch.is_finite() && roll.is_finite()).then_some(Self { pitch, roll })
    }

    /// Rotation that levels joints measured by a camera tilted by `tilt`
    /// radians in this orientation
    ///
    /// # Errors
    ///
    /// Returns `GimbalLock` if a correction angle exceeds ±90°
    pub fn correction(&self, tilt: f64) -> Result<Rotation3<f64>> {
        let pitch = tilt - self.pitch;
        let roll = -self.roll;
        if pitch.abs() > FRAC_PI_2 || roll.abs() > FRAC_PI_2 {
            return Err(Error::GimbalLock { pitch, roll });
        }
        Ok(Rotation3::from_axis_angle(&Vector3::z_axis(), roll) * Rotation3::from_axis_angle(&Vector3::x_axis(), pitch))
    }
}

/// One filter per joint coordinate
pub struct JointFilterBank {
    filters: Vec<[Box<dyn SignalFilter>; 3]>,
}

impl JointFilterBank {
    /// Create filters of the given kind for every joint
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown filter kind
    pub fn new(kind: &str, params: OneEuroParams) -> Result<Self> {
        let filters = (0..JOINT_COUNT)
            .map(|_| -> Result<[Box<dyn SignalFilter>; 3]> {
                Ok([
                    create_filter(kind, params)?,
                    create_filter(kind, params)?,
                    create_filter(kind, params)?,
                ])
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { filters })
    }

    /// Start every filter from the joints of `skeleton`
    pub fn prime(&mut self, timestamp: f64, skeleton: &Skeleton) {
        self.reset();
        let mut copy = skeleton.clone();
        self.apply(timestamp, &mut copy);
    }

    /// Filter every joint of `skeleton` in place
    pub fn apply(&mut self, timestamp: f64, skeleton: &mut Skeleton) {
        for (filters, joint) in self.filters.iter_mut().zip(skeleton.joints_mut()) {
            *joint = Point3D::new(
                filters[0].apply(timestamp, joint.x),
                filters[1].apply(timestamp, joint.y),
                filters[2].apply(timestamp, joint.z),
            );
        }
    }

    /// Change the tuning of every filter
    pub fn tune(&mut self, min_cutoff: f64, beta: f64) {
        self.filters
            .iter_mut()
            .flat_map(|set| set.iter_mut())
            .for_each(|filter| filter.tune(min_cutoff, beta));
    }

    /// Forget all filter state
    pub fn reset(&mut self) {
        self.filters
            .iter_mut()
            .flat_map(|set| set.iter_mut())
            .for_each(|filter| filter.reset());
    }
}

/// Settings of the body tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    /// Which body to follow
    pub body_selection: BodySelection,
    /// Fixed downward tilt of the depth camera, degrees
    pub camera_tilt_deg: f64,
    /// Level the skeleton using the accelerometer
    pub orientation_correction: bool,
    /// Filter kind, see [`create_filter`]
    pub filter_kind: String,
    /// Filter tuning
    pub filter: OneEuroParams,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            body_selection: BodySelection::default(),
            camera_tilt_deg: DEFAULT_CAMERA_TILT_DEG,
            orientation_correction: true,
            filter_kind: "one_euro".to_string(),
            filter: OneEuroParams::default(),
        }
    }
}

/// Turns tracker frames into body results
pub struct BodyTracker {
    settings: TrackerSettings,
    filters: JointFilterBank,
    primed: bool,
    orientation: Option<Orientation>,
    tracked_bodies: usize,
}

impl BodyTracker {
    /// Create a tracker
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown filter kind
    pub fn new(settings: TrackerSettings) -> Result<Self> {
        let filters = JointFilterBank::new(&settings.filter_kind, settings.filter)?;
        info!(
            "Body tracker: {} filter (min_cutoff {}, beta {}), {:?} body",
            settings.filter_kind, settings.filter.min_cutoff, settings.filter.beta, settings.body_selection
        );
        Ok(Self {
            settings,
            filters,
            primed: false,
            orientation: None,
            tracked_bodies: 0,
        })
    }

    /// Process one frame.
    ///
    /// Yields no result when nobody is tracked, and on the first frame a body
    /// appears while its filters are being primed.
    pub fn process(&mut self, frame: &TrackerFrame, hands: HandStates) -> Option<BodyResult> {
        if let Some(accel) = frame.accel {
            self.orientation = Orientation::from_accel(accel).or(self.orientation);
        }
        self.tracked_bodies = frame.bodies.len();

        let Some(index) = self.settings.body_selection.select(&frame.bodies) else {
            if self.primed {
                debug!("Body lost, filters reset");
            }
            self.primed = false;
            self.filters.reset();
            return None;
        };
        let mut skeleton = frame.bodies[index].clone();

        if !self.primed {
            self.filters.prime(frame.timestamp, &skeleton);
            self.primed = true;
            debug!("Body found, filters primed");
            return None;
        }
        self.filters.apply(frame.timestamp, &mut skeleton);

        if self.settings.orientation_correction {
            if let Some(orientation) = self.orientation {
                match orientation.correction(self.settings.camera_tilt_deg.to_radians()) {
                    Ok(rotation) => Self::rotate(&rotation, &mut skeleton),
                    Err(e) => warn!("Skipping orientation correction: {e}"),
                }
            }
        }

        Some(BodyResult::new(frame.timestamp, &skeleton, hands))
    }

    fn rotate(rotation: &Rotation3<f64>, skeleton: &mut Skeleton) {
        for joint in skeleton.joints_mut() {
            let rotated = rotation * joint.coords();
            *joint = Point3D::new(rotated.x, rotated.y, rotated.z);
        }
    }

    /// Retune every joint filter, keeping their state
    pub fn tune(&mut self, min_cutoff: f64, beta: f64) {
        self.settings.filter.min_cutoff = min_cutoff;
        self.settings.filter.beta = beta;
        self.filters.tune(min_cutoff, beta);
    }

    /// Current filter tuning
    #[must_use]
    pub const fn filter_params(&self) -> OneEuroParams {
        self.settings.filter
    }

    /// Last known device orientation
    #[must_use]
    pub const fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Number of bodies in the last frame
    #[must_use]
    pub const fn tracked_bodies(&self) -> usize {
        self.tracked_bodies
    }
}
