//! Published messages: the per-frame pointer state and the status report.

use crate::{body::HandState, operation::Operation, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Stdout, Write};
use std::path::Path;

pub use crate::screen::PixelPos;

/// Pointer state of one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandPointer {
    /// Whether the hand points at a screen
    pub present: bool,
    /// Whether fine pointing is active
    pub fine: bool,
    /// Position in flattened pixel space
    pub position: PixelPos,
}

impl HandPointer {
    /// A hand pointing at `position`
    #[must_use]
    pub const fn at(position: PixelPos, fine: bool) -> Self {
        Self {
            present: true,
            fine,
            position,
        }
    }
}

/// Pointer state published once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerMessage {
    /// A fixed centre reticle is shown instead of moving cursors
    pub centercross: bool,
    /// Right hand
    pub right: HandPointer,
    /// Left hand
    pub left: HandPointer,
}

impl PointerMessage {
    /// Message with neither hand present
    #[must_use]
    pub const fn absent(centercross: bool) -> Self {
        Self {
            centercross,
            right: HandPointer {
                present: false,
                fine: false,
                position: PixelPos::new(0, 0),
            },
            left: HandPointer {
                present: false,
                fine: false,
                position: PixelPos::new(0, 0),
            },
        }
    }
}

/// Observability snapshot of the tracking loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Frames per second
    pub fps: f64,
    /// Bodies in the last frame
    pub bodies: usize,
    /// Camera pitch in degrees, one decimal
    pub pitch: f64,
    /// Camera roll in degrees, one decimal
    pub roll: f64,
    /// Left hand state
    pub left: HandState,
    /// Right hand state
    pub right: HandState,
    /// Current operation name
    pub operation: String,
    /// Filter minimum cutoff
    pub cut: f64,
    /// Filter speed coefficient
    pub beta: f64,
}

impl StatusReport {
    /// Status of a frame
    #[must_use]
    pub fn new(
        fps: f64,
        bodies: usize,
        (pitch, roll): (f64, f64),
        (left, right): (HandState, HandState),
        operation: Operation,
        (cut, beta): (f64, f64),
    ) -> Self {
        let degrees = |radians: f64| (radians.to_degrees() * 10.0).round() / 10.0;
        Self {
            fps,
            bodies,
            pitch: degrees(pitch),
            roll: degrees(roll),
            left,
            right,
            operation: operation.name().to_string(),
            cut,
            beta,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fps {:.1} | bodies {} | pitch {:.1}° roll {:.1}° | left {} right {} | {} | cut {} beta {}",
            self.fps, self.bodies, self.pitch, self.roll, self.left, self.right, self.operation, self.cut, self.beta
        )
    }
}

/// Destination of pointer messages
pub trait MessageSink: Send {
    /// Publish one message
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be written
    fn publish(&mut self, message: &PointerMessage) -> Result<()>;
}

/// Writes each message as one JSON line
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<Stdout> {
    /// Sink writing to standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Sink writing to a new file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Send> MessageSink for JsonLinesSink<W> {
    fn publish(&mut self, message: &PointerMessage) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_message_shape() {
        let message = PointerMessage {
            centercross: false,
            right: HandPointer::at(PixelPos::new(800, 400), true),
            left: HandPointer::default(),
        };
        let json = serde_json::to_value(message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "centercross": false,
                "right": {"present": true, "fine": true, "position": {"x": 800, "y": 400}},
                "left": {"present": false, "fine": false, "position": {"x": 0, "y": 0}}
            })
        );
    }

    #[test]
    fn test_json_lines_sink_writes_one_line_per_message() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.publish(&PointerMessage::absent(true)).unwrap();
        sink.publish(&PointerMessage::absent(false)).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"centercross":true"#));
    }

    #[test]
    fn test_status_report_rounds_degrees() {
        let report = StatusReport::new(
            30.0,
            1,
            (0.1, -0.05),
            (HandState::Open, HandState::Closed),
            Operation::PanRightHand,
            (1.0, 0.0),
        );
        assert!((report.pitch - 5.7).abs() < 1e-9);
        assert!((report.roll + 2.9).abs() < 1e-9);
        assert_eq!(report.operation, "PAN_RIGHTHAND");
        assert!(report.to_string().contains("right CLOSED"));
    }
}
