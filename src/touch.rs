//! Synthetic touch commands and the injector seam.
//!
//! The controller only describes touch input as [`TouchCommand`] values; a
//! [`TouchInjector`] turns them into OS-level events. Injection is
//! fire-and-forget.

use crate::screen::PixelPos;
use log::debug;
use serde::{Deserialize, Serialize};

/// Pixel offset between two frames
pub type Delta = (i32, i32);

/// One synthetic touch action, in flattened pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TouchCommand {
    /// Put a single finger down
    FingerDown {
        /// Contact position
        at: PixelPos,
    },
    /// Lift the single finger
    FingerUp,
    /// Move the single finger by a delta
    MoveFinger {
        /// Offset since the last frame
        delta: Delta,
    },
    /// Put two fingers down
    TwoFingersDown {
        /// Left-hand contact
        first: PixelPos,
        /// Right-hand contact
        second: PixelPos,
    },
    /// Lift both fingers
    TwoFingersUp,
    /// Move both fingers
    MoveTwoFingers {
        /// Offset of the left-hand contact
        first: Delta,
        /// Offset of the right-hand contact
        second: Delta,
    },
    /// Touch down and up in place
    Tap {
        /// Tap position
        at: PixelPos,
    },
}

/// Receiver of synthetic touch input
pub trait TouchInjector: Send {
    /// Put a single finger down
    fn finger_down(&mut self, at: PixelPos);
    /// Lift the single finger
    fn finger_up(&mut self);
    /// Move the single finger
    fn move_finger(&mut self, delta: Delta);
    /// Put two fingers down
    fn two_fingers_down(&mut self, first: PixelPos, second: PixelPos);
    /// Lift both fingers
    fn two_fingers_up(&mut self);
    /// Move both fingers
    fn move_two_fingers(&mut self, first: Delta, second: Delta);
    /// Tap once
    fn tap(&mut self, at: PixelPos);

    /// Forward a command to the matching method
    fn dispatch(&mut self, command: &TouchCommand) {
        match *command {
            TouchCommand::FingerDown { at } => self.finger_down(at),
            TouchCommand::FingerUp => self.finger_up(),
            TouchCommand::MoveFinger { delta } => self.move_finger(delta),
            TouchCommand::TwoFingersDown { first, second } => self.two_fingers_down(first, second),
            TouchCommand::TwoFingersUp => self.two_fingers_up(),
            TouchCommand::MoveTwoFingers { first, second } => self.move_two_fingers(first, second),
            TouchCommand::Tap { at } => self.tap(at),
        }
    }
}

/// Injector that only logs, used when no touch backend is attached
#[derive(Debug, Default)]
pub struct LoggingInjector;

impl TouchInjector for LoggingInjector {
    fn finger_down(&mut self, at: PixelPos) {
        debug!("touch: finger down at {at}");
    }

    fn finger_up(&mut self) {
        debug!("touch: finger up");
    }

    fn move_finger(&mut self, delta: Delta) {
        debug!("touch: move finger by {delta:?}");
    }

    fn two_fingers_down(&mut self, first: PixelPos, second: PixelPos) {
        debug!("touch: two fingers down at {first} and {second}");
    }

    fn two_fingers_up(&mut self) {
        debug!("touch: two fingers up");
    }

    fn move_two_fingers(&mut self, first: Delta, second: Delta) {
        debug!("touch: move two fingers by {first:?} and {second:?}");
    }

    fn tap(&mut self, at: PixelPos) {
        debug!("touch: tap at {at}");
    }
}

/// Injector that keeps every command, for tests and recordings
#[derive(Debug, Default, Clone)]
pub struct TouchRecorder {
    commands: Vec<TouchCommand>,
}

impl TouchRecorder {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far
    #[must_use]
    pub fn commands(&self) -> &[TouchCommand] {
        &self.commands
    }

    /// Take the received commands, leaving the recorder empty
    pub fn take(&mut self) -> Vec<TouchCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl TouchInjector for TouchRecorder {
    fn finger_down(&mut self, at: PixelPos) {
        self.commands.push(TouchCommand::FingerDown { at });
    }

    fn finger_up(&mut self) {
        self.commands.push(TouchCommand::FingerUp);
    }

    fn move_finger(&mut self, delta: Delta) {
        self.commands.push(TouchCommand::MoveFinger { delta });
    }

    fn two_fingers_down(&mut self, first: PixelPos, second: PixelPos) {
        self.commands.push(TouchCommand::TwoFingersDown { first, second });
    }

    fn two_fingers_up(&mut self) {
        self.commands.push(TouchCommand::TwoFingersUp);
    }

    fn move_two_fingers(&mut self, first: Delta, second: Delta) {
        self.commands.push(TouchCommand::MoveTwoFingers { first, second });
    }

    fn tap(&mut self, at: PixelPos) {
        self.commands.push(TouchCommand::Tap { at });
    }
}
