//! Helper functions and utilities for tests
#![allow(dead_code)]

use body_pointer::{
    body::{BodyResult, HandObservation, HandState, HandStates, Handedness, Joint, Skeleton, TrackerFrame},
    constants::JOINT_COUNT,
    geom::Point3D,
    screen::{EnvironmentPreset, ScreenEnvironment},
};

/// Distance of the synthetic user from the camera
pub const BODY_Z: f64 = 2000.0;

/// Shoulder height of the synthetic user
pub const SHOULDER_Y: f64 = -400.0;

/// Frame period of a 30 fps tracker
pub const FRAME_SECS: f64 = 1.0 / 30.0;

/// The single screen above the camera
pub fn single_screen() -> ScreenEnvironment {
    ScreenEnvironment::preset(EnvironmentPreset::SingleAbove).unwrap()
}

/// Point in the middle of pixel `(px, py)` of the single screen above the camera
pub fn screen_point(px: i32, py: i32) -> Point3D {
    let environment = single_screen();
    let screen = &environment.screens()[0];
    let mm_per_px_x = 1.0 / screen.px_per_mm_x();
    let mm_per_px_y = 1.0 / screen.px_per_mm_y();
    let left_edge = screen.mm_width() / 2.0;
    let top_edge = -1080.0;
    Point3D::new(
        left_edge - (f64::from(px) + 0.5) * mm_per_px_x,
        top_edge + (f64::from(py) + 0.5) * mm_per_px_y,
        0.0,
    )
}

fn lerp(from: Point3D, to: Point3D, s: f64) -> Point3D {
    Point3D::new(
        from.x + (to.x - from.x) * s,
        from.y + (to.y - from.y) * s,
        from.z + (to.z - from.z) * s,
    )
}

/// Builds synthetic bodies standing in front of the camera; both arms hang
/// down until told to point or raise
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    skeleton: Skeleton,
    states: HandStates,
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyBuilder {
    pub fn new() -> Self {
        let mut skeleton = Skeleton::new(vec![Point3D::new(0.0, -300.0, BODY_Z); JOINT_COUNT]).unwrap();
        skeleton.set_joint(Joint::SpineChest, Point3D::new(0.0, -300.0, BODY_Z));
        skeleton.set_joint(Joint::Nose, Point3D::new(0.0, -600.0, BODY_Z - 80.0));
        let mut builder = Self {
            skeleton,
            states: HandStates::default(),
        };
        builder = builder.lower(Handedness::Left).lower(Handedness::Right);
        builder
    }

    fn joints(hand: Handedness) -> (Joint, Joint, Joint, Joint) {
        match hand {
            Handedness::Left => (Joint::ShoulderLeft, Joint::ElbowLeft, Joint::HandLeft, Joint::HandTipLeft),
            Handedness::Right => (Joint::ShoulderRight, Joint::ElbowRight, Joint::HandRight, Joint::HandTipRight),
        }
    }

    /// Shoulder of a hand; the right shoulder is on the viewer's left (+x)
    pub fn shoulder(hand: Handedness) -> Point3D {
        match hand {
            Handedness::Left => Point3D::new(-200.0, SHOULDER_Y, BODY_Z),
            Handedness::Right => Point3D::new(200.0, SHOULDER_Y, BODY_Z),
        }
    }

    fn place_arm(mut self, hand: Handedness, toward: Point3D, reach: f64) -> Self {
        let (shoulder_joint, elbow, center, tip) = Self::joints(hand);
        let shoulder = Self::shoulder(hand);
        self.skeleton.set_joint(shoulder_joint, shoulder);
        self.skeleton.set_joint(elbow, lerp(shoulder, toward, reach * 0.5));
        self.skeleton.set_joint(center, lerp(shoulder, toward, reach));
        self.skeleton.set_joint(tip, lerp(shoulder, toward, reach + 0.03));
        self
    }

    /// Point `hand` at `target`; `reach` is the fraction of the way from the
    /// shoulder to the target where the hand is
    pub fn point(self, hand: Handedness, target: Point3D, reach: f64) -> Self {
        self.place_arm(hand, target, reach)
    }

    /// Point `hand` at the middle of pixel `(px, py)` of the single screen
    pub fn point_px(self, hand: Handedness, px: i32, py: i32) -> Self {
        self.point(hand, screen_point(px, py), 0.25)
    }

    /// Let the arm hang; its ray runs parallel to the screens
    pub fn lower(self, hand: Handedness) -> Self {
        let shoulder = Self::shoulder(hand);
        self.place_arm(hand, Point3D::new(shoulder.x, shoulder.y + 2000.0, shoulder.z), 0.25)
    }

    /// Hold the hand straight above the shoulder
    pub fn raise(self, hand: Handedness) -> Self {
        let shoulder = Self::shoulder(hand);
        self.place_arm(hand, Point3D::new(shoulder.x, shoulder.y - 2000.0, shoulder.z), 0.25)
    }

    /// Set the classified state of a hand
    pub fn state(mut self, hand: Handedness, state: HandState) -> Self {
        match hand {
            Handedness::Left => self.states.left = state,
            Handedness::Right => self.states.right = state,
        }
        self
    }

    /// Move the chest
    pub fn chest(mut self, chest: Point3D) -> Self {
        self.skeleton.set_joint(Joint::SpineChest, chest);
        self
    }

    pub fn skeleton(&self) -> Skeleton {
        self.skeleton.clone()
    }

    pub fn states(&self) -> HandStates {
        self.states
    }

    /// Body result as the tracker would produce it
    pub fn build(&self, timestamp: f64) -> BodyResult {
        BodyResult::new(timestamp, &self.skeleton, self.states)
    }

    /// Tracker frame carrying this body and its classified hands
    pub fn frame(&self, timestamp: f64) -> TrackerFrame {
        TrackerFrame {
            timestamp,
            bodies: vec![self.skeleton.clone()],
            hands: Some(vec![
                HandObservation {
                    handedness: Handedness::Left,
                    state: self.states.left,
                    bbox: None,
                },
                HandObservation {
                    handedness: Handedness::Right,
                    state: self.states.right,
                    bbox: None,
                },
            ]),
            ..TrackerFrame::default()
        }
    }
}

/// A frame in which nobody is tracked
pub fn empty_frame(timestamp: f64) -> TrackerFrame {
    TrackerFrame {
        timestamp,
        ..TrackerFrame::default()
    }
}
