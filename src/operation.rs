//! Operations, operation transitions and the interaction switches.

use crate::body::Handedness;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is doing in the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    /// Pointing only, or nothing
    #[default]
    Idle,
    /// Dragging with the left hand
    PanLeftHand,
    /// Dragging with the right hand
    PanRightHand,
    /// Two-handed pinch
    Zoom,
    /// Push gesture of the left hand
    SelectLeftHand,
    /// Push gesture of the right hand
    SelectRightHand,
}

impl Operation {
    /// Every operation
    pub const ALL: [Self; 6] = [
        Self::Idle,
        Self::PanLeftHand,
        Self::PanRightHand,
        Self::Zoom,
        Self::SelectLeftHand,
        Self::SelectRightHand,
    ];

    /// Name as shown in status reports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::PanLeftHand => "PAN_LEFTHAND",
            Self::PanRightHand => "PAN_RIGHTHAND",
            Self::Zoom => "ZOOM",
            Self::SelectLeftHand => "SELECT_LEFTHAND",
            Self::SelectRightHand => "SELECT_RIGHTHAND",
        }
    }

    /// PAN operation of a hand
    #[must_use]
    pub const fn pan(hand: Handedness) -> Self {
        match hand {
            Handedness::Left => Self::PanLeftHand,
            Handedness::Right => Self::PanRightHand,
        }
    }

    /// SELECT operation of a hand
    #[must_use]
    pub const fn select(hand: Handedness) -> Self {
        match hand {
            Handedness::Left => Self::SelectLeftHand,
            Handedness::Right => Self::SelectRightHand,
        }
    }

    /// Contacts to lift when this operation ends
    #[must_use]
    pub const fn release(self) -> Release {
        match self {
            Self::PanLeftHand | Self::PanRightHand => Release::Finger,
            Self::Zoom => Release::TwoFingers,
            Self::Idle | Self::SelectLeftHand | Self::SelectRightHand => Release::Nothing,
        }
    }

    /// Contacts to place when this operation starts
    #[must_use]
    pub const fn engage(self) -> Engage {
        match self {
            Self::PanLeftHand => Engage::FingerDown(Handedness::Left),
            Self::PanRightHand => Engage::FingerDown(Handedness::Right),
            Self::Zoom => Engage::TwoFingersDown,
            Self::Idle | Self::SelectLeftHand | Self::SelectRightHand => Engage::Nothing,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Side effect of leaving an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Nothing is held
    Nothing,
    /// Lift the single finger
    Finger,
    /// Lift both fingers
    TwoFingers,
}

/// Side effect of entering an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engage {
    /// Nothing to place
    Nothing,
    /// Put one finger down where the given hand points
    FingerDown(Handedness),
    /// Put two fingers down where both hands point
    TwoFingersDown,
}

/// Side effects of a transition, applied release first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEffects {
    /// Contacts lifted for the previous operation
    pub release: Release,
    /// Contacts placed for the new operation
    pub engage: Engage,
}

/// Change of operation between two consecutive frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum OperationTransition {
    Remains,
    IdleToPanLeft,
    IdleToPanRight,
    IdleToZoom,
    IdleToSelectLeft,
    IdleToSelectRight,
    PanLeftToIdle,
    PanLeftToPanRight,
    PanLeftToZoom,
    PanLeftToSelectLeft,
    PanLeftToSelectRight,
    PanRightToIdle,
    PanRightToPanLeft,
    PanRightToZoom,
    PanRightToSelectLeft,
    PanRightToSelectRight,
    ZoomToIdle,
    ZoomToPanLeft,
    ZoomToPanRight,
    ZoomToSelectLeft,
    ZoomToSelectRight,
    SelectLeftToIdle,
    SelectLeftToPanLeft,
    SelectLeftToPanRight,
    SelectLeftToZoom,
    SelectLeftToSelectRight,
    SelectRightToIdle,
    SelectRightToPanLeft,
    SelectRightToPanRight,
    SelectRightToZoom,
    SelectRightToSelectLeft,
}

impl OperationTransition {
    /// Transition from `previous` to `current`
    #[must_use]
    pub const fn between(previous: Operation, current: Operation) -> Self {
        use Operation::{Idle, PanLeftHand, PanRightHand, SelectLeftHand, SelectRightHand, Zoom};

        match (previous, current) {
            (Idle, Idle)
            | (PanLeftHand, PanLeftHand)
            | (PanRightHand, PanRightHand)
            | (Zoom, Zoom)
            | (SelectLeftHand, SelectLeftHand)
            | (SelectRightHand, SelectRightHand) => Self::Remains,

            (Idle, PanLeftHand) => Self::IdleToPanLeft,
            (Idle, PanRightHand) => Self::IdleToPanRight,
            (Idle, Zoom) => Self::IdleToZoom,
            (Idle, SelectLeftHand) => Self::IdleToSelectLeft,
            (Idle, SelectRightHand) => Self::IdleToSelectRight,

            (PanLeftHand, Idle) => Self::PanLeftToIdle,
            (PanLeftHand, PanRightHand) => Self::PanLeftToPanRight,
            (PanLeftHand, Zoom) => Self::PanLeftToZoom,
            (PanLeftHand, SelectLeftHand) => Self::PanLeftToSelectLeft,
            (PanLeftHand, SelectRightHand) => Self::PanLeftToSelectRight,

            (PanRightHand, Idle) => Self::PanRightToIdle,
            (PanRightHand, PanLeftHand) => Self::PanRightToPanLeft,
            (PanRightHand, Zoom) => Self::PanRightToZoom,
            (PanRightHand, SelectLeftHand) => Self::PanRightToSelectLeft,
            (PanRightHand, SelectRightHand) => Self::PanRightToSelectRight,

            (Zoom, Idle) => Self::ZoomToIdle,
            (Zoom, PanLeftHand) => Self::ZoomToPanLeft,
            (Zoom, PanRightHand) => Self::ZoomToPanRight,
            (Zoom, SelectLeftHand) => Self::ZoomToSelectLeft,
            (Zoom, SelectRightHand) => Self::ZoomToSelectRight,

            (SelectLeftHand, Idle) => Self::SelectLeftToIdle,
            (SelectLeftHand, PanLeftHand) => Self::SelectLeftToPanLeft,
            (SelectLeftHand, PanRightHand) => Self::SelectLeftToPanRight,
            (SelectLeftHand, Zoom) => Self::SelectLeftToZoom,
            (SelectLeftHand, SelectRightHand) => Self::SelectLeftToSelectRight,

            (SelectRightHand, Idle) => Self::SelectRightToIdle,
            (SelectRightHand, PanLeftHand) => Self::SelectRightToPanLeft,
            (SelectRightHand, PanRightHand) => Self::SelectRightToPanRight,
            (SelectRightHand, Zoom) => Self::SelectRightToZoom,
            (SelectRightHand, SelectLeftHand) => Self::SelectRightToSelectLeft,
        }
    }

    /// The operations a transition connects, `None` for [`Self::Remains`]
    #[must_use]
    pub const fn endpoints(self) -> Option<(Operation, Operation)> {
        use Operation::{Idle, PanLeftHand, PanRightHand, SelectLeftHand, SelectRightHand, Zoom};

        let pair = match self {
            Self::Remains => return None,
            Self::IdleToPanLeft => (Idle, PanLeftHand),
            Self::IdleToPanRight => (Idle, PanRightHand),
            Self::IdleToZoom => (Idle, Zoom),
            Self::IdleToSelectLeft => (Idle, SelectLeftHand),
            Self::IdleToSelectRight => (Idle, SelectRightHand),
            Self::PanLeftToIdle => (PanLeftHand, Idle),
            Self::PanLeftToPanRight => (PanLeftHand, PanRightHand),
            Self::PanLeftToZoom => (PanLeftHand, Zoom),
            Self::PanLeftToSelectLeft => (PanLeftHand, SelectLeftHand),
            Self::PanLeftToSelectRight => (PanLeftHand, SelectRightHand),
            Self::PanRightToIdle => (PanRightHand, Idle),
            Self::PanRightToPanLeft => (PanRightHand, PanLeftHand),
            Self::PanRightToZoom => (PanRightHand, Zoom),
            Self::PanRightToSelectLeft => (PanRightHand, SelectLeftHand),
            Self::PanRightToSelectRight => (PanRightHand, SelectRightHand),
            Self::ZoomToIdle => (Zoom, Idle),
            Self::ZoomToPanLeft => (Zoom, PanLeftHand),
            Self::ZoomToPanRight => (Zoom, PanRightHand),
            Self::ZoomToSelectLeft => (Zoom, SelectLeftHand),
            Self::ZoomToSelectRight => (Zoom, SelectRightHand),
            Self::SelectLeftToIdle => (SelectLeftHand, Idle),
            Self::SelectLeftToPanLeft => (SelectLeftHand, PanLeftHand),
            Self::SelectLeftToPanRight => (SelectLeftHand, PanRightHand),
            Self::SelectLeftToZoom => (SelectLeftHand, Zoom),
            Self::SelectLeftToSelectRight => (SelectLeftHand, SelectRightHand),
            Self::SelectRightToIdle => (SelectRightHand, Idle),
            Self::SelectRightToPanLeft => (SelectRightHand, PanLeftHand),
            Self::SelectRightToPanRight => (SelectRightHand, PanRightHand),
            Self::SelectRightToZoom => (SelectRightHand, Zoom),
            Self::SelectRightToSelectLeft => (SelectRightHand, SelectLeftHand),
        };
        Some(pair)
    }

    /// Contacts to lift and place for this transition
    #[must_use]
    pub const fn effects(self) -> TransitionEffects {
        match self.endpoints() {
            Some((previous, current)) => TransitionEffects {
                release: previous.release(),
                engage: current.engage(),
            },
            None => TransitionEffects {
                release: Release::Nothing,
                engage: Engage::Nothing,
            },
        }
    }
}

/// Which hand may select and which may pan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMechanism {
    /// Right hand pushes to select, left hand pans
    #[default]
    SelectRightPanLeft,
    /// Left hand pushes to select, right hand pans
    SelectLeftPanRight,
    /// Either hand does either
    SelectBothPanBoth,
}

impl InteractionMechanism {
    /// Whether `hand` may trigger SELECT
    #[must_use]
    pub const fn can_select(self, hand: Handedness) -> bool {
        matches!(
            (self, hand),
            (Self::SelectBothPanBoth, _)
                | (Self::SelectRightPanLeft, Handedness::Right)
                | (Self::SelectLeftPanRight, Handedness::Left)
        )
    }

    /// Whether `hand` may trigger PAN
    #[must_use]
    pub const fn can_pan(self, hand: Handedness) -> bool {
        matches!(
            (self, hand),
            (Self::SelectBothPanBoth, _)
                | (Self::SelectRightPanLeft, Handedness::Left)
                | (Self::SelectLeftPanRight, Handedness::Right)
        )
    }
}

/// How the pointer relates to on-screen objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointingMechanism {
    /// The cursor follows the hand, taps land under the cursor
    #[default]
    PointerToObject,
    /// A fixed reticle sits at the screen centre, taps land there
    ObjectToPointer,
}
