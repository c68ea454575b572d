//! Interaction state machine.
//!
//! [`InteractionController::process_frame`] turns one [`BodyResult`] into the
//! current [`Operation`], the pointer message for that frame and, when touch
//! control is enabled, the touch commands to inject.
//!
//! Per frame:
//! 1. both pointer rays are intersected with the screen environment
//! 2. a hand whose partner is raised above its shoulder as a fist, pointing
//!    at no screen, points in fine mode relative to the reference captured
//!    on entry; the partner counts as not pointing
//! 3. coarse positions get jitter suppression, two positions are kept a
//!    minimum distance apart
//! 4. the operation is detected, the transition to it is looked up and its
//!    contacts are released and placed
//! 5. PAN and ZOOM emit per-frame move deltas, SELECT taps once (debounced)

use crate::{
    body::{BodyResult, HandPose, HandState, Handedness},
    constants::{
        DEFAULT_FINE_SLOWDOWN, DEFAULT_JITTER_THRESHOLD_PX, DEFAULT_MIN_POINTER_SEPARATION_PX,
        DEFAULT_SELECT_DEBOUNCE_SECS, DEFAULT_SELECT_MAX_CHEST_APPROACH_MM, DEFAULT_SELECT_MAX_HEIGHT_DRIFT_MM,
        DEFAULT_SELECT_MIN_APPROACH_MM,
    },
    geom::{Line, Point3D, Vector3D},
    history::{InteractionHistory, PointHistory},
    message::{HandPointer, PointerMessage},
    operation::{Engage, InteractionMechanism, Operation, OperationTransition, PointingMechanism, Release},
    screen::{PixelPos, ScreenEnvironment, ScreenHit},
    touch::TouchCommand,
    utils::safe_cast::round_to_i32,
};
use log::debug;

/// Thresholds of the push gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionThresholds {
    /// Net horizontal approach over the window
    pub min_approach_mm: f64,
    /// Largest allowed spread of hand height over the window
    pub max_height_drift_mm: f64,
    /// Chest approach at or above which the user is walking, not pushing
    pub max_chest_approach_mm: f64,
}

impl Default for SelectionThresholds {
    fn default() -> Self {
        Self {
            min_approach_mm: DEFAULT_SELECT_MIN_APPROACH_MM,
            max_height_drift_mm: DEFAULT_SELECT_MAX_HEIGHT_DRIFT_MM,
            max_chest_approach_mm: DEFAULT_SELECT_MAX_CHEST_APPROACH_MM,
        }
    }
}

/// Tunables of the interaction controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Which hand selects and which pans
    pub mechanism: InteractionMechanism,
    /// Cursor or centre reticle
    pub pointing: PointingMechanism,
    /// Per-axis pixel offset below which a coarse pointer stands still
    pub jitter_threshold_px: i32,
    /// Minimum distance of both pointers
    pub min_pointer_separation_px: f64,
    /// Damping of angular motion in fine mode
    pub fine_slowdown: f64,
    /// Minimum seconds between taps
    pub select_debounce_secs: f64,
    /// Push gesture thresholds
    pub selection: SelectionThresholds,
    /// Emit touch commands
    pub touch_enabled: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            mechanism: InteractionMechanism::default(),
            pointing: PointingMechanism::default(),
            jitter_threshold_px: DEFAULT_JITTER_THRESHOLD_PX,
            min_pointer_separation_px: DEFAULT_MIN_POINTER_SEPARATION_PX,
            fine_slowdown: DEFAULT_FINE_SLOWDOWN,
            select_debounce_secs: DEFAULT_SELECT_DEBOUNCE_SECS,
            selection: SelectionThresholds::default(),
            touch_enabled: false,
        }
    }
}

/// State captured when a hand enters fine pointing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FineReference {
    /// Screen the hand pointed at
    pub screen_index: usize,
    /// Hand position
    pub hand: Point3D,
    /// Pixel on that screen
    pub pixel: PixelPos,
    /// Ray intersection with the screen
    pub intersection: Point3D,
}

/// Result of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Operation detected in this frame
    pub operation: Operation,
    /// Change relative to the previous frame
    pub transition: OperationTransition,
    /// Pointer state to publish
    pub message: PointerMessage,
    /// Touch commands to inject, empty unless touch control is enabled
    pub commands: Vec<TouchCommand>,
}

#[derive(Debug, Clone, Copy)]
struct Aim {
    hit: ScreenHit,
    position: PixelPos,
    fine: bool,
}

/// Per-axis jitter suppression: an axis that moved less than `threshold`
/// keeps its previous value
#[must_use]
pub fn suppress_jitter(raw: PixelPos, previous: Option<PixelPos>, threshold: i32) -> PixelPos {
    let Some(previous) = previous else {
        return raw;
    };
    let keep = |new: i32, old: i32| if (new - old).abs() < threshold { old } else { new };
    PixelPos::new(keep(raw.x, previous.x), keep(raw.y, previous.y))
}

/// Push both pointers apart, symmetrically about their midpoint, until they
/// are at least `min_distance` apart. Coinciding pointers are split
/// horizontally with the right hand to the right.
#[must_use]
pub fn enforce_separation(right: PixelPos, left: PixelPos, min_distance: f64) -> (PixelPos, PixelPos) {
    let distance = right.distance(&left);
    if distance >= min_distance {
        return (right, left);
    }

    let mid_x = f64::from(right.x + left.x) / 2.0;
    let mid_y = f64::from(right.y + left.y) / 2.0;
    let (unit_x, unit_y) = if distance > 0.0 {
        (f64::from(right.x - left.x) / distance, f64::from(right.y - left.y) / distance)
    } else {
        (1.0, 0.0)
    };

    let place = |half: f64| {
        (
            PixelPos::new(round_to_i32(unit_x.mul_add(half, mid_x)), round_to_i32(unit_y.mul_add(half, mid_y))),
            PixelPos::new(round_to_i32(unit_x.mul_add(-half, mid_x)), round_to_i32(unit_y.mul_add(-half, mid_y))),
        )
    };
    let (right, left) = place(min_distance / 2.0);
    if right.distance(&left) >= min_distance {
        (right, left)
    } else {
        place(min_distance / 2.0 + 1.0)
    }
}

/// Whether the tip window shows a deliberate push towards `target`.
///
/// The hand must get horizontally closer to the target on every frame, by at
/// least `min_approach_mm` in total, while its height stays within
/// `max_height_drift_mm` and the chest approaches by less than
/// `max_chest_approach_mm`. Windows with gaps never match.
#[must_use]
pub fn is_push_gesture(tips: &PointHistory, chest: &PointHistory, target: &Point3D, thresholds: &SelectionThresholds) -> bool {
    let (Some(tips), Some(chest)) = (tips.complete(), chest.complete()) else {
        return false;
    };
    let (Some(first), Some(last)) = (tips.first(), tips.last()) else {
        return false;
    };

    let distances: Vec<f64> = tips.iter().map(|tip| tip.horizontal_distance(target)).collect();
    if !distances.windows(2).all(|pair| pair[1] < pair[0]) {
        return false;
    }
    if first.horizontal_distance(target) - last.horizontal_distance(target) < thresholds.min_approach_mm {
        return false;
    }

    let lowest = tips.iter().map(|tip| tip.y).fold(f64::INFINITY, f64::min);
    let highest = tips.iter().map(|tip| tip.y).fold(f64::NEG_INFINITY, f64::max);
    if highest - lowest > thresholds.max_height_drift_mm {
        return false;
    }

    match (chest.first(), chest.last()) {
        (Some(start), Some(end)) => {
            start.horizontal_distance(target) - end.horizontal_distance(target) < thresholds.max_chest_approach_mm
        }
        _ => false,
    }
}

/// Signed horizontal angle, vertical angle and reference distance between the
/// ray towards `reference` and the current pointer direction, all measured
/// at the pointer origin. The horizontal angle is positive towards `across`,
/// the vertical one towards +y.
#[must_use]
pub fn angular_offset(pointer: &Line, reference: &Point3D, across: &Vector3D) -> (f64, f64, f64) {
    let to_reference = Vector3D::from_points(&pointer.origin(), reference);
    let direction = pointer.direction();

    let reference_flat = to_reference.horizontal();
    let direction_flat = direction.horizontal();
    let horizontal = if reference_flat.is_zero() || direction_flat.is_zero() {
        0.0
    } else {
        let turn = direction_flat.scale(1.0 / direction_flat.magnitude())
            - reference_flat.scale(1.0 / reference_flat.magnitude());
        let angle = reference_flat.angle(&direction_flat);
        if turn.dot(across) < 0.0 {
            -angle
        } else {
            angle
        }
    };

    let elevation = |v: &Vector3D| v.y().atan2(v.x().hypot(v.z()));
    let vertical = elevation(&direction) - elevation(&to_reference);

    (horizontal, vertical, to_reference.magnitude())
}

/// The pointing and gesture state machine
#[derive(Debug, Clone)]
pub struct InteractionController {
    environment: ScreenEnvironment,
    settings: ControllerSettings,
    current: Operation,
    previous: Operation,
    last_tap: Option<f64>,
    published_left: Option<PixelPos>,
    published_right: Option<PixelPos>,
    fine_left: Option<FineReference>,
    fine_right: Option<FineReference>,
}

impl InteractionController {
    /// Create an idle controller
    #[must_use]
    pub const fn new(environment: ScreenEnvironment, settings: ControllerSettings) -> Self {
        Self {
            environment,
            settings,
            current: Operation::Idle,
            previous: Operation::Idle,
            last_tap: None,
            published_left: None,
            published_right: None,
            fine_left: None,
            fine_right: None,
        }
    }

    /// Active screen environment
    #[must_use]
    pub const fn environment(&self) -> &ScreenEnvironment {
        &self.environment
    }

    /// Switch to another screen environment; pointer state starts over
    pub fn set_environment(&mut self, environment: ScreenEnvironment) {
        self.environment = environment;
        self.published_left = None;
        self.published_right = None;
        self.fine_left = None;
        self.fine_right = None;
    }

    /// Current settings
    #[must_use]
    pub const fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Settings, adjustable between frames
    pub fn settings_mut(&mut self) -> &mut ControllerSettings {
        &mut self.settings
    }

    /// Operation of the last frame
    #[must_use]
    pub const fn current_operation(&self) -> Operation {
        self.current
    }

    /// Operation of the frame before
    #[must_use]
    pub const fn previous_operation(&self) -> Operation {
        self.previous
    }

    /// Fine pointing reference of a hand, if it is in fine mode
    #[must_use]
    pub const fn fine_reference(&self, hand: Handedness) -> Option<&FineReference> {
        match hand {
            Handedness::Left => self.fine_left.as_ref(),
            Handedness::Right => self.fine_right.as_ref(),
        }
    }

    /// Last published pointer position of a hand
    #[must_use]
    pub const fn published(&self, hand: Handedness) -> Option<PixelPos> {
        match hand {
            Handedness::Left => self.published_left,
            Handedness::Right => self.published_right,
        }
    }

    /// Process one frame; `body` is `None` when nobody is tracked
    pub fn process_frame(&mut self, body: Option<&BodyResult>, history: &mut InteractionHistory) -> FrameOutcome {
        history.record_body(body);

        let (mut left, mut right) = match body {
            Some(body) => self.aim_hands(body, history),
            None => {
                self.leave_fine(Handedness::Left);
                self.leave_fine(Handedness::Right);
                (None, None)
            }
        };
        if let (Some(l), Some(r)) = (left.as_mut(), right.as_mut()) {
            let (right_pos, left_pos) =
                enforce_separation(r.position, l.position, self.settings.min_pointer_separation_px);
            r.position = right_pos;
            l.position = left_pos;
        }

        let (current, pre_gesture) = if left.is_none() && right.is_none() {
            (Operation::Idle, None)
        } else {
            self.detect_operation(left.as_ref(), right.as_ref(), history)
        };

        let previous = self.current;
        let transition = OperationTransition::between(previous, current);
        if transition != OperationTransition::Remains {
            debug!("Operation {previous} -> {current}");
        }
        self.previous = previous;
        self.current = current;

        let left_pos = left.map(|aim| aim.position);
        let right_pos = right.map(|aim| aim.position);

        let mut commands = Vec::new();
        if self.settings.touch_enabled {
            self.transition_commands(transition, left_pos, right_pos, &mut commands);
            self.operation_commands(transition, left_pos, right_pos, pre_gesture, body.map(|b| b.timestamp), &mut commands);
        }

        if left_pos.is_some() {
            self.published_left = left_pos;
        }
        if right_pos.is_some() {
            self.published_right = right_pos;
        }
        history.hand_mut(Handedness::Left).record_pixel(left_pos);
        history.hand_mut(Handedness::Right).record_pixel(right_pos);

        let pointer = |aim: Option<Aim>| aim.map_or_else(HandPointer::default, |a| HandPointer::at(a.position, a.fine));
        FrameOutcome {
            operation: current,
            transition,
            message: PointerMessage {
                centercross: self.settings.pointing == PointingMechanism::ObjectToPointer,
                right: pointer(right),
                left: pointer(left),
            },
            commands,
        }
    }

    /// Return to IDLE, lifting any held contacts
    pub fn release_all(&mut self) -> Vec<TouchCommand> {
        let transition = OperationTransition::between(self.current, Operation::Idle);
        self.previous = self.current;
        self.current = Operation::Idle;
        self.leave_fine(Handedness::Left);
        self.leave_fine(Handedness::Right);

        let mut commands = Vec::new();
        if self.settings.touch_enabled {
            self.transition_commands(transition, None, None, &mut commands);
        }
        commands
    }

    fn hit(&self, pose: &HandPose) -> Option<(Line, ScreenHit)> {
        let pointer = pose.pointer?;
        self.environment.intersect(&pointer).map(|hit| (pointer, hit))
    }

    fn aim_hands(&mut self, body: &BodyResult, history: &InteractionHistory) -> (Option<Aim>, Option<Aim>) {
        let is_modifier = |hand: Handedness| {
            body.hand(hand).is_raised() && history.hand(hand).majority_state() == HandState::Closed
        };

        let right_hit = self.hit(&body.right);
        let left_hit = self.hit(&body.left);
        // A hand that points at a screen itself is never the modifier
        let right_fine = right_hit.is_some() && left_hit.is_none() && is_modifier(Handedness::Left);
        let left_fine = !right_fine && left_hit.is_some() && right_hit.is_none() && is_modifier(Handedness::Right);

        let right = if left_fine {
            self.leave_fine(Handedness::Right);
            None
        } else {
            self.aim(Handedness::Right, &body.right, right_hit, right_fine)
        };
        let left = if right_fine {
            self.leave_fine(Handedness::Left);
            None
        } else {
            self.aim(Handedness::Left, &body.left, left_hit, left_fine)
        };
        (left, right)
    }

    fn aim(&mut self, hand: Handedness, pose: &HandPose, hit: Option<(Line, ScreenHit)>, fine: bool) -> Option<Aim> {
        let Some((pointer, hit)) = hit else {
            self.leave_fine(hand);
            return None;
        };

        if fine {
            let position = self.fine_position(hand, &pointer, pose, &hit);
            return Some(Aim { hit, position, fine });
        }

        self.leave_fine(hand);
        let position = suppress_jitter(hit.global, self.published(hand), self.settings.jitter_threshold_px);
        Some(Aim { hit, position, fine })
    }

    fn fine_slot(&mut self, hand: Handedness) -> &mut Option<FineReference> {
        match hand {
            Handedness::Left => &mut self.fine_left,
            Handedness::Right => &mut self.fine_right,
        }
    }

    fn leave_fine(&mut self, hand: Handedness) {
        if self.fine_slot(hand).take().is_some() {
            debug!("{hand:?} hand leaves fine pointing");
        }
    }

    fn fine_position(&mut self, hand: Handedness, pointer: &Line, pose: &HandPose, hit: &ScreenHit) -> PixelPos {
        let reference = *self.fine_slot(hand).get_or_insert_with(|| {
            debug!("{hand:?} hand enters fine pointing at {}", hit.global);
            FineReference {
                screen_index: hit.screen_index,
                hand: pose.hand,
                pixel: hit.local,
                intersection: hit.point,
            }
        });

        let Some(screen) = self.environment.screen(reference.screen_index) else {
            return hit.global;
        };
        let (horizontal, vertical, distance) = angular_offset(pointer, &reference.intersection, &screen.across());
        let slowdown = self.settings.fine_slowdown;
        let dx = distance * horizontal.tan() * slowdown * screen.px_per_mm_x();
        let dy = distance * vertical.tan() * slowdown * screen.px_per_mm_y();

        let local = screen.clamp_px(
            (f64::from(reference.pixel.x) + dx).round(),
            (f64::from(reference.pixel.y) + dy).round(),
        );
        self.environment.to_global(reference.screen_index, local)
    }

    fn detect_operation(
        &self,
        left: Option<&Aim>,
        right: Option<&Aim>,
        history: &mut InteractionHistory,
    ) -> (Operation, Option<PixelPos>) {
        let left_state = history.hand(Handedness::Left).majority_state();
        let right_state = history.hand(Handedness::Right).majority_state();

        if left.is_some() && right.is_some() && left_state == HandState::Closed && right_state == HandState::Closed {
            return (Operation::Zoom, None);
        }

        let aim_of = |hand: Handedness| match hand {
            Handedness::Left => left,
            Handedness::Right => right,
        };
        let state_of = |hand: Handedness| match hand {
            Handedness::Left => left_state,
            Handedness::Right => right_state,
        };
        // The raised fist holding a partner in fine mode takes no part in
        // the operation
        let modifier = match (left, right) {
            (_, Some(aim)) if aim.fine => Some(Handedness::Left),
            (Some(aim), _) if aim.fine => Some(Handedness::Right),
            _ => None,
        };
        let any_closed = [Handedness::Left, Handedness::Right]
            .into_iter()
            .any(|hand| modifier != Some(hand) && state_of(hand) == HandState::Closed);

        let roles: &[(Handedness, Handedness)] = match self.settings.mechanism {
            InteractionMechanism::SelectRightPanLeft => &[(Handedness::Right, Handedness::Left)],
            InteractionMechanism::SelectLeftPanRight => &[(Handedness::Left, Handedness::Right)],
            InteractionMechanism::SelectBothPanBoth => &[
                (Handedness::Right, Handedness::Left),
                (Handedness::Left, Handedness::Right),
            ],
        };

        for &(selector, panner) in roles {
            if let Some(aim) = aim_of(selector) {
                if !any_closed
                    && is_push_gesture(
                        history.hand(selector).tips(),
                        history.chest(),
                        &aim.hit.point,
                        &self.settings.selection,
                    )
                {
                    let pre_gesture = history.hand(selector).pre_gesture_pixel();
                    history.hand_mut(selector).reset_selection();
                    debug!("Push gesture of the {selector:?} hand");
                    return (Operation::select(selector), pre_gesture);
                }
            }
            if aim_of(panner).is_some() && state_of(panner) == HandState::Closed {
                return (Operation::pan(panner), None);
            }
        }

        (Operation::Idle, None)
    }

    fn transition_commands(
        &self,
        transition: OperationTransition,
        left: Option<PixelPos>,
        right: Option<PixelPos>,
        commands: &mut Vec<TouchCommand>,
    ) {
        let effects = transition.effects();
        match effects.release {
            Release::Nothing => {}
            Release::Finger => commands.push(TouchCommand::FingerUp),
            Release::TwoFingers => commands.push(TouchCommand::TwoFingersUp),
        }
        match effects.engage {
            Engage::Nothing => {}
            Engage::FingerDown(hand) => {
                let at = match hand {
                    Handedness::Left => left,
                    Handedness::Right => right,
                };
                if let Some(at) = at {
                    commands.push(TouchCommand::FingerDown { at });
                }
            }
            Engage::TwoFingersDown => {
                if let (Some(first), Some(second)) = (left, right) {
                    commands.push(TouchCommand::TwoFingersDown { first, second });
                }
            }
        }
    }

    fn operation_commands(
        &mut self,
        transition: OperationTransition,
        left: Option<PixelPos>,
        right: Option<PixelPos>,
        pre_gesture: Option<PixelPos>,
        timestamp: Option<f64>,
        commands: &mut Vec<TouchCommand>,
    ) {
        let delta = |now: Option<PixelPos>, before: Option<PixelPos>| {
            now.zip(before).map(|(now, before)| now.delta_from(&before))
        };

        match self.current {
            Operation::PanLeftHand | Operation::PanRightHand if transition == OperationTransition::Remains => {
                let (now, before) = if self.current == Operation::PanLeftHand {
                    (left, self.published_left)
                } else {
                    (right, self.published_right)
                };
                if let Some(delta) = delta(now, before).filter(|d| *d != (0, 0)) {
                    commands.push(TouchCommand::MoveFinger { delta });
                }
            }
            Operation::Zoom if transition == OperationTransition::Remains => {
                if let (Some(first), Some(second)) = (delta(left, self.published_left), delta(right, self.published_right)) {
                    if first != (0, 0) || second != (0, 0) {
                        commands.push(TouchCommand::MoveTwoFingers { first, second });
                    }
                }
            }
            Operation::SelectLeftHand | Operation::SelectRightHand => {
                let Some(now) = timestamp else {
                    return;
                };
                if self.last_tap.is_some_and(|last| now - last < self.settings.select_debounce_secs) {
                    debug!("Tap suppressed, last tap {:.2}s ago", now - self.last_tap.unwrap_or(now));
                    return;
                }
                let hand = if self.current == Operation::SelectLeftHand {
                    Handedness::Left
                } else {
                    Handedness::Right
                };
                let at = match self.settings.pointing {
                    PointingMechanism::PointerToObject => {
                        let current = if hand == Handedness::Left { left } else { right };
                        pre_gesture.or_else(|| self.published(hand)).or(current)
                    }
                    PointingMechanism::ObjectToPointer => Some(self.environment.center()),
                };
                if let Some(at) = at {
                    commands.push(TouchCommand::Tap { at });
                    self.last_tap = Some(now);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::EnvironmentPreset;

    #[test]
    fn test_jitter_keeps_small_offsets() {
        let previous = Some(PixelPos::new(100, 100));
        assert_eq!(suppress_jitter(PixelPos::new(103, 104), previous, 5), PixelPos::new(100, 100));
        assert_eq!(suppress_jitter(PixelPos::new(110, 100), previous, 5), PixelPos::new(110, 100));
        assert_eq!(suppress_jitter(PixelPos::new(110, 102), previous, 6), PixelPos::new(110, 100));
        assert_eq!(suppress_jitter(PixelPos::new(3, 4), None, 6), PixelPos::new(3, 4));
    }

    #[test]
    fn test_separation_is_symmetric() {
        let (right, left) = enforce_separation(PixelPos::new(500, 500), PixelPos::new(520, 500), 80.0);
        assert!(right.distance(&left) >= 80.0);
        assert_eq!(right.x + left.x, 1020);
        assert_eq!(right.y, 500);
        assert_eq!(left.y, 500);
    }

    #[test]
    fn test_separation_of_coinciding_pointers() {
        let (right, left) = enforce_separation(PixelPos::new(300, 200), PixelPos::new(300, 200), 80.0);
        assert_eq!(right, PixelPos::new(340, 200));
        assert_eq!(left, PixelPos::new(260, 200));
    }

    #[test]
    fn test_separation_leaves_distant_pointers() {
        let right = PixelPos::new(900, 100);
        let left = PixelPos::new(100, 100);
        assert_eq!(enforce_separation(right, left, 80.0), (right, left));
    }

    #[test]
    fn test_angular_offset_zero_on_reference_ray() {
        let pointer = Line::from_points(&Point3D::new(0.0, -300.0, 2000.0), &Point3D::new(0.0, -350.0, 1500.0)).unwrap();
        let reference = pointer.point_at(4.0);
        let (h, v, d) = angular_offset(&pointer, &reference, &Vector3D::new(-1.0, 0.0, 0.0));
        assert!(h.abs() < 1e-9);
        assert!(v.abs() < 1e-9);
        assert!((d - pointer.direction().magnitude() * 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_angular_offset_sign_follows_across() {
        let origin = Point3D::new(0.0, 0.0, 2000.0);
        let reference = Point3D::new(0.0, 0.0, 0.0);
        let turned = Line::from_points(&origin, &Point3D::new(-100.0, 0.0, 1000.0)).unwrap();
        let (h, _, _) = angular_offset(&turned, &reference, &Vector3D::new(-1.0, 0.0, 0.0));
        assert!(h > 0.0);
        let (h, _, _) = angular_offset(&turned, &reference, &Vector3D::new(1.0, 0.0, 0.0));
        assert!(h < 0.0);
    }

    #[test]
    fn test_push_gesture_requires_full_window() {
        let mut tips = PointHistory::new(3);
        let mut chest = PointHistory::new(3);
        let target = Point3D::new(0.0, -500.0, 0.0);
        for z in [1700.0, 1670.0] {
            tips.push(Some(Point3D::new(0.0, -400.0, z)));
            chest.push(Some(Point3D::new(0.0, -300.0, 2000.0)));
        }
        assert!(!is_push_gesture(&tips, &chest, &target, &SelectionThresholds::default()));

        tips.push(Some(Point3D::new(0.0, -400.0, 1640.0)));
        chest.push(Some(Point3D::new(0.0, -300.0, 2000.0)));
        assert!(is_push_gesture(&tips, &chest, &target, &SelectionThresholds::default()));
    }

    #[test]
    fn test_walking_is_not_a_push() {
        let mut tips = PointHistory::new(3);
        let mut chest = PointHistory::new(3);
        let target = Point3D::new(0.0, -500.0, 0.0);
        for (i, z) in [1700.0, 1670.0, 1640.0].into_iter().enumerate() {
            tips.push(Some(Point3D::new(0.0, -400.0, z)));
            chest.push(Some(Point3D::new(0.0, -300.0, 2000.0 - 30.0 * i as f64)));
        }
        assert!(!is_push_gesture(&tips, &chest, &target, &SelectionThresholds::default()));
    }

    #[test]
    fn test_new_controller_is_idle() {
        let environment = ScreenEnvironment::preset(EnvironmentPreset::SingleAbove).unwrap();
        let mut controller = InteractionController::new(environment, ControllerSettings::default());
        let mut history = InteractionHistory::default();
        let outcome = controller.process_frame(None, &mut history);
        assert_eq!(outcome.operation, Operation::Idle);
        assert_eq!(outcome.transition, OperationTransition::Remains);
        assert_eq!(outcome.message, PointerMessage::absent(false));
        assert!(outcome.commands.is_empty());
    }
}
