//! End-to-end runs of the application on replayed and synthetic frames

mod test_helpers;

use body_pointer::{
    app::PointingApp,
    body::{ColorFrame, HandObservation, HandState, Handedness, TrackerFrame},
    config::Config,
    hands::HandClassifier,
    message::{JsonLinesSink, PixelPos, PointerMessage},
    operation::{InteractionMechanism, Operation},
    source::{ReplaySource, TrackingSource},
    touch::{TouchCommand, TouchInjector},
    Result,
};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_helpers::{empty_frame, BodyBuilder, FRAME_SECS};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn messages(&self) -> Vec<PointerMessage> {
        let text = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
        text.lines().map(|line| serde_json::from_str(line).unwrap()).collect()
    }
}

#[derive(Clone, Default)]
struct SharedInjector(Arc<Mutex<Vec<TouchCommand>>>);

impl SharedInjector {
    fn commands(&self) -> Vec<TouchCommand> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, command: TouchCommand) {
        self.0.lock().unwrap().push(command);
    }
}

impl TouchInjector for SharedInjector {
    fn finger_down(&mut self, at: PixelPos) {
        self.push(TouchCommand::FingerDown { at });
    }

    fn finger_up(&mut self) {
        self.push(TouchCommand::FingerUp);
    }

    fn move_finger(&mut self, delta: (i32, i32)) {
        self.push(TouchCommand::MoveFinger { delta });
    }

    fn two_fingers_down(&mut self, first: PixelPos, second: PixelPos) {
        self.push(TouchCommand::TwoFingersDown { first, second });
    }

    fn two_fingers_up(&mut self) {
        self.push(TouchCommand::TwoFingersUp);
    }

    fn move_two_fingers(&mut self, first: (i32, i32), second: (i32, i32)) {
        self.push(TouchCommand::MoveTwoFingers { first, second });
    }

    fn tap(&mut self, at: PixelPos) {
        self.push(TouchCommand::Tap { at });
    }
}

fn recording(frames: &[TrackerFrame]) -> ReplaySource {
    let text: String = frames
        .iter()
        .map(|frame| serde_json::to_string(frame).unwrap() + "\n")
        .collect();
    ReplaySource::from_reader(Cursor::new(text))
}

fn pan_config() -> Config {
    let mut config = Config::default();
    config.touch.enabled = true;
    config.interaction.mechanism = InteractionMechanism::SelectLeftPanRight;
    config.filter.kind = "none".to_string();
    config
}

fn panning(px: i32) -> BodyBuilder {
    BodyBuilder::new()
        .point_px(Handedness::Right, px, 400)
        .state(Handedness::Right, HandState::Closed)
}

#[test]
fn test_replayed_pan_session() {
    let frames = [
        panning(800).frame(0.0),
        panning(800).frame(FRAME_SECS),
        panning(840).frame(2.0 * FRAME_SECS),
        empty_frame(3.0 * FRAME_SECS),
    ];
    let buffer = SharedBuffer::default();
    let injector = SharedInjector::default();

    let mut app = PointingApp::new(pan_config(), Box::new(recording(&frames)))
        .unwrap()
        .with_sink(Box::new(JsonLinesSink::new(buffer.clone())))
        .with_injector(Box::new(injector.clone()));
    app.start().unwrap();
    let summary = app.run().unwrap();

    assert_eq!(summary.frames, 4);
    assert_eq!(summary.last_operation, Operation::Idle);
    assert_eq!(
        injector.commands(),
        vec![
            TouchCommand::FingerDown { at: PixelPos::new(800, 400) },
            TouchCommand::MoveFinger { delta: (40, 0) },
            TouchCommand::FingerUp,
        ]
    );

    let messages = buffer.messages();
    assert_eq!(messages.len(), 5);
    // The first frame with a body only primes the filters
    assert!(!messages[0].right.present);
    assert_eq!(messages[1].right.position, PixelPos::new(800, 400));
    assert_eq!(messages[2].right.position, PixelPos::new(840, 400));
    assert!(!messages[3].right.present);
    assert_eq!(messages[4], PointerMessage::absent(false));
}

#[test]
fn test_shutdown_lifts_a_held_finger() {
    let frames = [panning(800).frame(0.0), panning(800).frame(FRAME_SECS)];
    let injector = SharedInjector::default();

    let mut app = PointingApp::new(pan_config(), Box::new(recording(&frames)))
        .unwrap()
        .with_sink(Box::new(JsonLinesSink::new(SharedBuffer::default())))
        .with_injector(Box::new(injector.clone()));
    app.start().unwrap();
    let summary = app.run().unwrap();

    assert_eq!(summary.last_operation, Operation::PanRightHand);
    assert_eq!(
        injector.commands(),
        vec![TouchCommand::FingerDown { at: PixelPos::new(800, 400) }, TouchCommand::FingerUp]
    );
}

#[test]
fn test_smoothing_keeps_a_still_pointer() {
    let mut config = pan_config();
    config.filter.kind = "one_euro".to_string();
    let frames: Vec<TrackerFrame> = (0..10).map(|i| panning(800).frame(f64::from(i) * FRAME_SECS)).collect();
    let buffer = SharedBuffer::default();

    let mut app = PointingApp::new(config, Box::new(recording(&frames)))
        .unwrap()
        .with_sink(Box::new(JsonLinesSink::new(buffer.clone())));
    app.start().unwrap();
    app.run().unwrap();

    let messages = buffer.messages();
    assert!(messages[1..10].iter().all(|m| m.right.position == PixelPos::new(800, 400)));
}

#[test]
fn test_status_report_after_run() {
    let frames = [panning(800).frame(0.0), panning(800).frame(FRAME_SECS)];
    let mut app = PointingApp::new(pan_config(), Box::new(recording(&frames)))
        .unwrap()
        .with_sink(Box::new(JsonLinesSink::new(SharedBuffer::default())));
    app.start().unwrap();
    app.step(&frames[0]).unwrap();
    app.step(&frames[1]).unwrap();

    let status = app.status();
    assert_eq!(status.bodies, 1);
    assert_eq!(status.operation, "PAN_RIGHTHAND");
    assert_eq!(status.right, HandState::Closed);
    assert_eq!(status.left, HandState::Untracked);
    assert_eq!(status.cut, 1.0);
}

/// Live-like source: frames carry a color image but no hand labels
struct ColorSource {
    remaining: u32,
    timestamp: f64,
}

impl TrackingSource for ColorSource {
    fn camera_count(&self) -> usize {
        1
    }

    fn needs_tracking_sdk(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<TrackerFrame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        self.timestamp += FRAME_SECS;
        std::thread::sleep(Duration::from_millis(2));

        let mut frame = BodyBuilder::new().point_px(Handedness::Right, 800, 400).frame(self.timestamp);
        frame.hands = None;
        frame.color = Some(ColorFrame {
            width: 2,
            height: 1,
            data: Arc::new(vec![0; 6]),
        });
        Ok(Some(frame))
    }

    fn stop(&mut self) {}
}

struct AlwaysFist;

impl HandClassifier for AlwaysFist {
    fn classify(&mut self, _frame: &ColorFrame) -> Result<Vec<HandObservation>> {
        Ok(vec![HandObservation {
            handedness: Handedness::Right,
            state: HandState::Closed,
            bbox: Some([0, 0, 1, 1]),
        }])
    }
}

#[test]
fn test_hand_worker_feeds_hand_states() {
    let mut config = pan_config();
    config.device.model_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
    let source = ColorSource {
        remaining: 200,
        timestamp: 0.0,
    };

    let mut app = PointingApp::new(config, Box::new(source))
        .unwrap()
        .with_sink(Box::new(JsonLinesSink::new(SharedBuffer::default())))
        .with_classifier(Box::new(AlwaysFist) as Box<dyn HandClassifier>);
    app.start().unwrap();
    let summary = app.run().unwrap();

    assert_eq!(summary.frames, 200);
    assert_eq!(summary.last_operation, Operation::PanRightHand);
    assert!(!app.is_started());
}
