//! Main application module for body pointing.
//!
//! [`PointingApp`] owns the per-frame pipeline: it polls a
//! [`TrackingSource`], runs the [`BodyTracker`] and the
//! [`InteractionController`], injects the resulting touch commands and
//! publishes the pointer message. Hand classification runs next to it on
//! a [`HandWorker`] when a classifier is attached.

use crate::{
    body::{HandStates, Handedness, TrackerFrame},
    config::Config,
    constants::COORDINATE_HISTORY_LEN,
    controller::{FrameOutcome, InteractionController},
    hands::{HandClassifier, HandWorker},
    history::InteractionHistory,
    message::{MessageSink, PointerMessage, StatusReport},
    operation::{Operation, PointingMechanism},
    screen::ScreenEnvironment,
    source::TrackingSource,
    touch::{LoggingInjector, TouchInjector},
    tracking::BodyTracker,
    Error, Result,
};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Frame rate measured over one-second windows
#[derive(Debug)]
struct FpsCounter {
    window_start: Instant,
    frames_in_window: u32,
    fps: f64,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames_in_window: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames_in_window += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.fps = f64::from(self.frames_in_window) / elapsed.as_secs_f64();
            self.frames_in_window = 0;
            self.window_start = Instant::now();
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames processed
    pub frames: u64,
    /// Operation of the last processed frame
    pub last_operation: Operation,
}

/// Main application struct
pub struct PointingApp {
    config: Config,
    source: Box<dyn TrackingSource>,
    injector: Box<dyn TouchInjector>,
    sink: Box<dyn MessageSink>,
    classifier: Option<Arc<Mutex<dyn HandClassifier>>>,
    hand_worker: Option<HandWorker>,
    tracker: BodyTracker,
    controller: InteractionController,
    history: InteractionHistory,
    running: Arc<AtomicBool>,
    started: bool,
    frames: u64,
    fps: FpsCounter,
}

impl PointingApp {
    /// Create an application reading frames from `source`.
    ///
    /// Touch commands go to a [`LoggingInjector`] and messages to the
    /// configured output until replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the message
    /// output cannot be opened
    pub fn new(config: Config, source: Box<dyn TrackingSource>) -> Result<Self> {
        info!("Initializing body pointing application");
        config.validate()?;

        let environment = config.screen_environment()?;
        info!(
            "Screen environment '{}' with {} screen(s), {}x{} px",
            environment.name(),
            environment.screens().len(),
            environment.total_px_width(),
            environment.max_px_height()
        );

        let tracker = BodyTracker::new(config.tracker_settings())?;
        let controller = InteractionController::new(environment, config.controller_settings());
        let history = InteractionHistory::new(COORDINATE_HISTORY_LEN, config.interaction.hand_state_window);
        let sink = config.message_sink()?;

        Ok(Self {
            config,
            source,
            injector: Box::new(LoggingInjector),
            sink,
            classifier: None,
            hand_worker: None,
            tracker,
            controller,
            history,
            running: Arc::new(AtomicBool::new(false)),
            started: false,
            frames: 0,
            fps: FpsCounter::new(),
        })
    }

    /// Send touch commands to `injector`
    #[must_use]
    pub fn with_injector(mut self, injector: Box<dyn TouchInjector>) -> Self {
        self.injector = injector;
        self
    }

    /// Publish pointer messages to `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn MessageSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Classify hands from color frames on a worker thread started by every
    /// [`start`](Self::start); the classifier is kept across restarts
    #[must_use]
    pub fn with_classifier<C: HandClassifier>(mut self, classifier: C) -> Self {
        self.classifier = Some(Arc::new(Mutex::new(classifier)));
        self
    }

    /// Check the devices and start tracking.
    ///
    /// On failure the application stays not started and `start` may be
    /// called again.
    ///
    /// # Errors
    ///
    /// Returns `CameraCount`, `SdkNotFound` or `ModelNotFound` for device
    /// setup problems, or the source's error if it cannot start
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.check_devices()?;
        self.source.start()?;

        if let Some(classifier) = &self.classifier {
            match HandWorker::spawn_shared(Arc::clone(classifier)) {
                Ok(worker) => self.hand_worker = Some(worker),
                Err(e) => {
                    self.source.stop();
                    return Err(e);
                }
            }
        }

        self.running.store(true, Ordering::SeqCst);
        self.started = true;
        info!(
            "Tracking started (touch {}, camera feed {})",
            if self.config.touch.enabled { "on" } else { "off" },
            if self.config.display.show_camera_feed { "on" } else { "off" }
        );
        Ok(())
    }

    fn check_devices(&self) -> Result<()> {
        let cameras = self.source.camera_count();
        if cameras != 1 {
            return Err(Error::CameraCount(cameras));
        }

        let device = &self.config.device;
        if self.source.needs_tracking_sdk() && !device.sdk_path.exists() {
            return Err(Error::SdkNotFound(device.sdk_path.clone()));
        }
        if self.classifier.is_some() && !device.model_path.exists() {
            return Err(Error::ModelNotFound(device.model_path.clone()));
        }
        Ok(())
    }

    /// Run until the source is exhausted or the running flag is cleared,
    /// then shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the application was not started, or if the
    /// source or the message output fails
    pub fn run(&mut self) -> Result<RunSummary> {
        if !self.started {
            return Err(Error::Tracker("Application has not been started".to_string()));
        }

        info!("Entering main loop");
        let result = self.run_loop();
        let last_operation = self.controller.current_operation();
        self.shutdown();
        result?;

        Ok(RunSummary {
            frames: self.frames,
            last_operation,
        })
    }

    fn run_loop(&mut self) -> Result<()> {
        // The flag is only checked between frames, so a frame in progress
        // always publishes its effects.
        while self.running.load(Ordering::SeqCst) {
            let Some(frame) = self.source.next_frame()? else {
                info!("Tracking source exhausted");
                break;
            };
            self.step(&frame)?;
        }
        Ok(())
    }

    /// Process one frame: track, interpret, inject, publish
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be published
    pub fn step(&mut self, frame: &TrackerFrame) -> Result<FrameOutcome> {
        let hands = self.hand_states(frame);
        let body = self.tracker.process(frame, hands);
        let outcome = self.controller.process_frame(body.as_ref(), &mut self.history);

        for command in &outcome.commands {
            self.injector.dispatch(command);
        }
        self.sink.publish(&outcome.message)?;

        self.frames += 1;
        self.fps.tick();
        if self.frames % self.config.display.status_interval_frames == 0 {
            info!("{}", self.status());
        }

        Ok(outcome)
    }

    fn hand_states(&self, frame: &TrackerFrame) -> HandStates {
        if let Some(observations) = &frame.hands {
            return HandStates::from_observations(observations);
        }
        let Some(worker) = &self.hand_worker else {
            return HandStates::default();
        };
        if let Some(color) = &frame.color {
            if self.config.display.show_camera_feed {
                debug!("Color frame {}x{}", color.width, color.height);
            }
            worker.submit(color.clone());
        }
        worker.latest()
    }

    /// Status of the last processed frame
    #[must_use]
    pub fn status(&self) -> StatusReport {
        let orientation = self.tracker.orientation().map_or((0.0, 0.0), |o| (o.pitch, o.roll));
        let params = self.tracker.filter_params();
        StatusReport::new(
            self.fps.fps,
            self.tracker.tracked_bodies(),
            orientation,
            (
                self.history.hand(Handedness::Left).majority_state(),
                self.history.hand(Handedness::Right).majority_state(),
            ),
            self.controller.current_operation(),
            (params.min_cutoff, params.beta),
        )
    }

    /// Release all touch contacts, stop the hand worker, then the source
    pub fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        self.running.store(false, Ordering::SeqCst);

        let commands = self.controller.release_all();
        for command in &commands {
            self.injector.dispatch(command);
        }
        let centercross = self.controller.settings().pointing == PointingMechanism::ObjectToPointer;
        if let Err(e) = self.sink.publish(&PointerMessage::absent(centercross)) {
            warn!("Failed to publish final pointer message: {e}");
        }

        if let Some(mut worker) = self.hand_worker.take() {
            worker.shutdown();
        }
        self.source.stop();
        self.started = false;
        info!("Application stopped after {} frames", self.frames);
    }

    /// Flag polled between frames; clear it to stop [`run`](Self::run)
    #[must_use]
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Whether [`start`](Self::start) succeeded and no shutdown followed
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Frames processed so far
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Interaction controller
    #[must_use]
    pub const fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Retune the joint filters while running
    pub fn tune(&mut self, min_cutoff: f64, beta: f64) {
        info!("Filter tuning: min_cutoff {min_cutoff}, beta {beta}");
        self.tracker.tune(min_cutoff, beta);
    }

    /// Switch to another screen installation, forgetting gesture history
    pub fn set_environment(&mut self, environment: ScreenEnvironment) {
        info!("Switching to screen environment '{}'", environment.name());
        for command in self.controller.release_all() {
            self.injector.dispatch(&command);
        }
        self.controller.set_environment(environment);
        self.history.clear();
    }
}

impl Drop for PointingApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}
