//! Sources of tracker frames.

use crate::{body::TrackerFrame, Error, Result};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A body tracking device, or anything standing in for one
pub trait TrackingSource: Send {
    /// Number of connected cameras
    fn camera_count(&self) -> usize;

    /// Whether frames come from the body tracking SDK
    fn needs_tracking_sdk(&self) -> bool {
        true
    }

    /// Open the device and start tracking
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be started
    fn start(&mut self) -> Result<()>;

    /// Block until the next frame; `None` once the source is exhausted
    ///
    /// # Errors
    ///
    /// Returns `Tracker` if a frame cannot be produced
    fn next_frame(&mut self) -> Result<Option<TrackerFrame>>;

    /// Release the device
    fn stop(&mut self);
}

/// Replays frames recorded as JSON lines, one [`TrackerFrame`] per line
pub struct ReplaySource {
    reader: Box<dyn BufRead + Send>,
    line: usize,
    started: bool,
}

impl ReplaySource {
    /// Replay a recording file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::IoError(format!("Failed to open recording {}: {e}", path.display())))?;
        info!("Replaying frames from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Replay frames from any buffered reader
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self {
            reader: Box::new(reader),
            line: 0,
            started: false,
        }
    }
}

impl TrackingSource for ReplaySource {
    fn camera_count(&self) -> usize {
        1
    }

    fn needs_tracking_sdk(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<TrackerFrame>> {
        if !self.started {
            return Err(Error::Tracker("Replay source has not been started".to_string()));
        }

        let mut buffer = String::new();
        loop {
            buffer.clear();
            self.line += 1;
            if self.reader.read_line(&mut buffer)? == 0 {
                return Ok(None);
            }
            let text = buffer.trim();
            if text.is_empty() {
                continue;
            }
            return serde_json::from_str(text)
                .map(Some)
                .map_err(|e| Error::Tracker(format!("Bad frame on line {}: {e}", self.line)));
        }
    }

    fn stop(&mut self) {
        self.started = false;
    }
}
