//! Tracker frames, skeletons and the per-frame body result.

use crate::{constants::JOINT_COUNT, geom::{Line, Point3D}, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Skeleton joints in the order the body tracker reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Joint {
    Pelvis = 0,
    SpineNavel,
    SpineChest,
    Neck,
    ClavicleLeft,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    HandTipLeft,
    ThumbLeft,
    ClavicleRight,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HandTipRight,
    ThumbRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    Head,
    Nose,
    EyeLeft,
    EarLeft,
    EyeRight,
    EarRight,
}

impl Joint {
    /// Position of the joint in a [`Skeleton`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Joint positions of one tracked body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point3D>", into = "Vec<Point3D>")]
pub struct Skeleton {
    joints: Vec<Point3D>,
}

impl Skeleton {
    /// Create a skeleton from exactly [`JOINT_COUNT`] joint positions
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for any other number of joints
    pub fn new(joints: Vec<Point3D>) -> Result<Self> {
        if joints.len() != JOINT_COUNT {
            return Err(Error::InvalidInput(format!(
                "A skeleton has {JOINT_COUNT} joints, got {}",
                joints.len()
            )));
        }
        Ok(Self { joints })
    }

    /// Position of a joint
    #[must_use]
    pub fn joint(&self, joint: Joint) -> Point3D {
        self.joints[joint.index()]
    }

    /// All joint positions in tracker order
    #[must_use]
    pub fn joints(&self) -> &[Point3D] {
        &self.joints
    }

    /// Mutable access for in-place filtering and correction
    pub fn joints_mut(&mut self) -> &mut [Point3D] {
        &mut self.joints
    }

    /// Overwrite a single joint
    pub fn set_joint(&mut self, joint: Joint, position: Point3D) {
        self.joints[joint.index()] = position;
    }
}

impl TryFrom<Vec<Point3D>> for Skeleton {
    type Error = Error;

    fn try_from(joints: Vec<Point3D>) -> Result<Self> {
        Self::new(joints)
    }
}

impl From<Skeleton> for Vec<Point3D> {
    fn from(skeleton: Skeleton) -> Self {
        skeleton.joints
    }
}

/// Discrete hand configuration reported by the hand classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandState {
    /// Flat open hand
    Open,
    /// Fist
    Closed,
    /// Index finger extended
    Pointer,
    /// No hand found
    #[default]
    Untracked,
}

impl HandState {
    /// Map a keypoint classifier output index to a state
    #[must_use]
    pub const fn from_classification(class: i64) -> Self {
        match class {
            0 => Self::Open,
            1 => Self::Closed,
            2 => Self::Pointer,
            _ => Self::Untracked,
        }
    }

    /// Upper-case state name as shown in status reports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Pointer => "POINTER",
            Self::Untracked => "UNTRACKED",
        }
    }
}

impl fmt::Display for HandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which hand an observation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// The user's left hand
    Left,
    /// The user's right hand
    Right,
}

/// One classified hand in a color frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    /// Hand label
    pub handedness: Handedness,
    /// Classified state
    pub state: HandState,
    /// Bounding box `[x, y, width, height]` in image pixels
    #[serde(default)]
    pub bbox: Option<[u32; 4]>,
}

/// Latest classified state of both hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandStates {
    /// Left hand
    pub left: HandState,
    /// Right hand
    pub right: HandState,
}

impl HandStates {
    /// Collapse classifier output into one state per hand; a hand without
    /// observation is untracked, a repeated label keeps the last one
    #[must_use]
    pub fn from_observations(observations: &[HandObservation]) -> Self {
        observations.iter().fold(Self::default(), |mut states, observation| {
            match observation.handedness {
                Handedness::Left => states.left = observation.state,
                Handedness::Right => states.right = observation.state,
            }
            states
        })
    }

    /// State of one hand
    #[must_use]
    pub const fn get(&self, hand: Handedness) -> HandState {
        match hand {
            Handedness::Left => self.left,
            Handedness::Right => self.right,
        }
    }
}

/// Raw color image handed to the hand classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFrame {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Packed RGB bytes, shared between the tracking loop and the hand worker
    pub data: Arc<Vec<u8>>,
}

/// One synchronised capture from the tracking source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerFrame {
    /// Capture time in seconds
    pub timestamp: f64,
    /// Tracked bodies, possibly none
    #[serde(default)]
    pub bodies: Vec<Skeleton>,
    /// Accelerometer sample `[ax, ay, az]`
    #[serde(default)]
    pub accel: Option<[f64; 3]>,
    /// Pre-classified hands, present in recordings
    #[serde(default)]
    pub hands: Option<Vec<HandObservation>>,
    /// Color image for the hand classifier
    #[serde(skip)]
    pub color: Option<ColorFrame>,
}

/// Joints of one arm plus the derived pointer ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    /// Classified hand state
    pub state: HandState,
    /// Tip of the hand
    pub tip: Point3D,
    /// Hand centre
    pub hand: Point3D,
    /// Elbow
    pub elbow: Point3D,
    /// Shoulder
    pub shoulder: Point3D,
    /// Ray from shoulder through hand, absent if both coincide
    pub pointer: Option<Line>,
}

impl HandPose {
    fn from_skeleton(skeleton: &Skeleton, hand: Handedness, state: HandState) -> Self {
        let (tip, center, elbow, shoulder) = match hand {
            Handedness::Left => (Joint::HandTipLeft, Joint::HandLeft, Joint::ElbowLeft, Joint::ShoulderLeft),
            Handedness::Right => (Joint::HandTipRight, Joint::HandRight, Joint::ElbowRight, Joint::ShoulderRight),
        };
        let shoulder = skeleton.joint(shoulder);
        let center = skeleton.joint(center);
        Self {
            state,
            tip: skeleton.joint(tip),
            hand: center,
            elbow: skeleton.joint(elbow),
            shoulder,
            pointer: Line::from_points(&shoulder, &center).ok(),
        }
    }

    /// Whether the hand is held above its shoulder (y grows downwards)
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.hand.y < self.shoulder.y
    }
}

/// Per-frame view of the selected body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyResult {
    /// Capture time in seconds
    pub timestamp: f64,
    /// Upper spine
    pub chest: Point3D,
    /// Nose
    pub nose: Point3D,
    /// Left arm
    pub left: HandPose,
    /// Right arm
    pub right: HandPose,
}

impl BodyResult {
    /// Derive the body result from a (filtered, corrected) skeleton
    #[must_use]
    pub fn new(timestamp: f64, skeleton: &Skeleton, states: HandStates) -> Self {
        Self {
            timestamp,
            chest: skeleton.joint(Joint::SpineChest),
            nose: skeleton.joint(Joint::Nose),
            left: HandPose::from_skeleton(skeleton, Handedness::Left, states.left),
            right: HandPose::from_skeleton(skeleton, Handedness::Right, states.right),
        }
    }

    /// Pose of one hand
    #[must_use]
    pub const fn hand(&self, hand: Handedness) -> &HandPose {
        match hand {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton() -> Skeleton {
        let joints = (0..JOINT_COUNT)
            .map(|i| Point3D::new(i as f64, -(i as f64), 2000.0))
            .collect();
        Skeleton::new(joints).unwrap()
    }

    #[test]
    fn test_skeleton_requires_all_joints() {
        assert!(Skeleton::new(vec![Point3D::origin(); 3]).is_err());
        assert_eq!(skeleton().joint(Joint::EarRight).x, 31.0);
    }

    #[test]
    fn test_skeleton_deserialize_rejects_short_list() {
        let result: std::result::Result<Skeleton, _> = serde_json::from_str(r#"[{"x":0,"y":0,"z":0}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_hand_state_classification() {
        assert_eq!(HandState::from_classification(1), HandState::Closed);
        assert_eq!(HandState::from_classification(7), HandState::Untracked);
        assert_eq!(HandState::Pointer.to_string(), "POINTER");
    }

    #[test]
    fn test_hand_states_from_observations() {
        let states = HandStates::from_observations(&[HandObservation {
            handedness: Handedness::Right,
            state: HandState::Closed,
            bbox: None,
        }]);
        assert_eq!(states.right, HandState::Closed);
        assert_eq!(states.left, HandState::Untracked);
    }

    #[test]
    fn test_body_result_pointer_runs_shoulder_to_hand() {
        let body = BodyResult::new(0.0, &skeleton(), HandStates::default());
        let pointer = body.right.pointer.unwrap();
        assert_eq!(pointer.origin(), Point3D::new(12.0, -12.0, 2000.0));
        assert_eq!(pointer.point_at(1.0), Point3D::new(15.0, -15.0, 2000.0));
        assert!(body.right.is_raised());
    }

    #[test]
    fn test_degenerate_pointer_is_absent() {
        let mut skeleton = skeleton();
        skeleton.set_joint(Joint::HandLeft, skeleton.joint(Joint::ShoulderLeft));
        let body = BodyResult::new(0.0, &skeleton, HandStates::default());
        assert!(body.left.pointer.is_none());
    }
}
