//! Short per-hand history buffers.
//!
//! Every buffer is refreshed exactly once per frame. Frames without data push
//! an explicit gap (`None` / `HandState::Untracked`) so the windows stay
//! aligned with frame time.

use crate::{
    body::{BodyResult, HandState, Handedness},
    constants::{COORDINATE_HISTORY_LEN, DEFAULT_HAND_STATE_WINDOW},
    geom::Point3D,
    screen::PixelPos,
};
use std::collections::VecDeque;

/// Bounded FIFO of optional values, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct Window<T> {
    capacity: usize,
    entries: VecDeque<Option<T>>,
}

impl<T: Copy> Window<T> {
    /// Create an empty window; a zero capacity is raised to one
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a frame, evicting the oldest when full
    pub fn push(&mut self, entry: Option<T>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Maximum number of frames kept
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of frames currently kept
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no frame has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full window, if every frame in it carries a value
    #[must_use]
    pub fn complete(&self) -> Option<Vec<T>> {
        if self.entries.len() < self.capacity {
            return None;
        }
        self.entries.iter().copied().collect()
    }

    /// Oldest frame that carries a value
    #[must_use]
    pub fn oldest(&self) -> Option<T> {
        self.entries.iter().flatten().next().copied()
    }

    /// Most recent frame, if it carries a value
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.entries.back().copied().flatten()
    }

    /// Replace every kept frame with a gap
    pub fn invalidate(&mut self) {
        self.entries.iter_mut().for_each(|entry| *entry = None);
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Recent positions of one joint
pub type PointHistory = Window<Point3D>;

/// Recent classified states of one hand, stabilised by majority vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateHistory {
    capacity: usize,
    states: VecDeque<HandState>,
}

impl StateHistory {
    /// Create an empty history voting over `capacity` frames
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            states: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a frame's state
    pub fn push(&mut self, state: HandState) {
        if self.states.len() >= self.capacity {
            self.states.pop_front();
        }
        self.states.push_back(state);
    }

    /// Most frequent state in the window.
    ///
    /// Ties go to the state seen most recently; an empty history is untracked.
    #[must_use]
    pub fn majority(&self) -> HandState {
        let mut best = HandState::Untracked;
        let mut best_count = 0;
        for (position, state) in self.states.iter().enumerate().rev() {
            if self.states.iter().skip(position + 1).any(|later| later == state) {
                continue;
            }
            let count = self.states.iter().filter(|s| *s == state).count();
            if count > best_count {
                best = *state;
                best_count = count;
            }
        }
        best
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

/// Everything remembered about one hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandHistory {
    tips: PointHistory,
    states: StateHistory,
    pixels: Window<PixelPos>,
}

impl HandHistory {
    /// Create an empty hand history
    #[must_use]
    pub fn new(coordinate_len: usize, state_window: usize) -> Self {
        Self {
            tips: PointHistory::new(coordinate_len),
            states: StateHistory::new(state_window),
            pixels: Window::new(coordinate_len),
        }
    }

    /// Recent hand-tip positions
    #[must_use]
    pub const fn tips(&self) -> &PointHistory {
        &self.tips
    }

    /// Majority-vote hand state
    #[must_use]
    pub fn majority_state(&self) -> HandState {
        self.states.majority()
    }

    /// Record where the hand pointed this frame
    pub fn record_pixel(&mut self, pixel: Option<PixelPos>) {
        self.pixels.push(pixel);
    }

    /// Pointer position from before the frames in the tip window
    #[must_use]
    pub fn pre_gesture_pixel(&self) -> Option<PixelPos> {
        self.pixels.oldest()
    }

    /// Forget the motion that led to a selection so it cannot fire again
    pub fn reset_selection(&mut self) {
        self.tips.invalidate();
        self.pixels.invalidate();
    }

    fn record(&mut self, tip: Option<Point3D>, state: HandState) {
        self.tips.push(tip.filter(|_| state != HandState::Untracked));
        self.states.push(state);
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.tips.clear();
        self.states.clear();
        self.pixels.clear();
    }
}

/// Histories of both hands and the chest, owned by the caller of the
/// interaction controller
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionHistory {
    left: HandHistory,
    right: HandHistory,
    chest: PointHistory,
}

impl Default for InteractionHistory {
    fn default() -> Self {
        Self::new(COORDINATE_HISTORY_LEN, DEFAULT_HAND_STATE_WINDOW)
    }
}

impl InteractionHistory {
    /// Create empty histories
    #[must_use]
    pub fn new(coordinate_len: usize, state_window: usize) -> Self {
        Self {
            left: HandHistory::new(coordinate_len, state_window),
            right: HandHistory::new(coordinate_len, state_window),
            chest: PointHistory::new(coordinate_len),
        }
    }

    /// Record the joints and hand states of a frame, or a gap if no body
    /// was tracked
    pub fn record_body(&mut self, body: Option<&BodyResult>) {
        match body {
            Some(body) => {
                self.left.record(Some(body.left.tip), body.left.state);
                self.right.record(Some(body.right.tip), body.right.state);
                self.chest.push(Some(body.chest));
            }
            None => {
                self.left.record(None, HandState::Untracked);
                self.right.record(None, HandState::Untracked);
                self.chest.push(None);
            }
        }
    }

    /// History of one hand
    #[must_use]
    pub const fn hand(&self, hand: Handedness) -> &HandHistory {
        match hand {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    /// Mutable history of one hand
    pub fn hand_mut(&mut self, hand: Handedness) -> &mut HandHistory {
        match hand {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    /// Recent chest positions
    #[must_use]
    pub const fn chest(&self) -> &PointHistory {
        &self.chest
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.chest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = Window::new(3);
        for i in 0..5 {
            window.push(Some(i));
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.complete(), Some(vec![2, 3, 4]));
        assert_eq!(window.oldest(), Some(2));
        assert_eq!(window.latest(), Some(4));
    }

    #[test]
    fn test_window_with_gap_is_incomplete() {
        let mut window = Window::new(3);
        window.push(Some(1));
        window.push(None);
        window.push(Some(3));
        assert_eq!(window.complete(), None);
        assert_eq!(window.oldest(), Some(1));

        window.invalidate();
        assert_eq!(window.len(), 3);
        assert_eq!(window.oldest(), None);
    }

    #[test]
    fn test_majority_vote() {
        let mut states = StateHistory::new(5);
        assert_eq!(states.majority(), HandState::Untracked);
        for state in [HandState::Closed, HandState::Open, HandState::Closed, HandState::Closed, HandState::Open] {
            states.push(state);
        }
        assert_eq!(states.majority(), HandState::Closed);
    }

    #[test]
    fn test_majority_tie_prefers_most_recent() {
        let mut states = StateHistory::new(4);
        for state in [HandState::Closed, HandState::Open, HandState::Closed, HandState::Open] {
            states.push(state);
        }
        assert_eq!(states.majority(), HandState::Open);
    }

    #[test]
    fn test_missing_body_records_gap() {
        let mut history = InteractionHistory::default();
        history.record_body(None);
        assert_eq!(history.hand(Handedness::Left).tips().latest(), None);
        assert_eq!(history.hand(Handedness::Right).majority_state(), HandState::Untracked);
        assert_eq!(history.chest().len(), 1);
    }

    #[test]
    fn test_untracked_hand_records_gap() {
        use crate::body::{HandStates, Joint, Skeleton};
        use crate::constants::JOINT_COUNT;

        let mut skeleton = Skeleton::new(vec![Point3D::new(0.0, -300.0, 2000.0); JOINT_COUNT]).unwrap();
        skeleton.set_joint(Joint::HandTipRight, Point3D::new(150.0, -450.0, 1500.0));
        skeleton.set_joint(Joint::HandTipLeft, Point3D::new(-150.0, -450.0, 1500.0));
        let states = HandStates {
            left: HandState::Untracked,
            right: HandState::Pointer,
        };
        let body = BodyResult::new(0.0, &skeleton, states);

        let mut history = InteractionHistory::default();
        history.record_body(Some(&body));
        assert_eq!(history.hand(Handedness::Left).tips().len(), 1);
        assert_eq!(history.hand(Handedness::Left).tips().latest(), None);
        assert_eq!(
            history.hand(Handedness::Right).tips().latest(),
            Some(Point3D::new(150.0, -450.0, 1500.0))
        );
        assert_eq!(history.chest().latest(), Some(Point3D::new(0.0, -300.0, 2000.0)));
    }

    #[test]
    fn test_reset_selection_clears_pre_gesture_pixel() {
        let mut hand = HandHistory::new(3, 5);
        hand.record_pixel(Some(PixelPos::new(10, 10)));
        hand.record_pixel(Some(PixelPos::new(12, 10)));
        assert_eq!(hand.pre_gesture_pixel(), Some(PixelPos::new(10, 10)));
        hand.reset_selection();
        assert_eq!(hand.pre_gesture_pixel(), None);
    }
}
