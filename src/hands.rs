//! Background hand classification.
//!
//! Hand classification is slower than the tracking frame rate, so it runs on
//! its own thread. The tracking loop hands over color frames through a
//! single pending slot (a newer frame replaces one not yet picked up) and
//! reads whatever result the worker produced last; it never waits for it.
//!
//! The classifier itself is shared with the owner of the worker, so it
//! survives a shutdown and can drive the next worker.

use crate::{
    body::{ColorFrame, HandObservation, HandStates},
    Result,
};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Detects hands in a color frame and classifies their state
pub trait HandClassifier: Send + 'static {
    /// Classify the hands visible in `frame`
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails; the worker logs it and keeps
    /// the previous result
    fn classify(&mut self, frame: &ColorFrame) -> Result<Vec<HandObservation>>;
}

impl HandClassifier for Box<dyn HandClassifier> {
    fn classify(&mut self, frame: &ColorFrame) -> Result<Vec<HandObservation>> {
        (**self).classify(frame)
    }
}

#[derive(Default)]
struct Shared {
    pending: Mutex<Option<ColorFrame>>,
    wake: Condvar,
    latest: Mutex<Vec<HandObservation>>,
    running: AtomicBool,
    processed: AtomicU64,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the hand classification thread
pub struct HandWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl HandWorker {
    /// Start the worker thread, taking ownership of `classifier`
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned
    pub fn spawn<C: HandClassifier>(classifier: C) -> Result<Self> {
        Self::spawn_shared(Arc::new(Mutex::new(classifier)))
    }

    /// Start the worker thread on a classifier the caller keeps a handle to
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned; the caller's handle
    /// stays usable
    pub fn spawn_shared<C: HandClassifier + ?Sized>(classifier: Arc<Mutex<C>>) -> Result<Self> {
        let shared = Arc::new(Shared::default());
        shared.running.store(true, Ordering::SeqCst);

        let worker = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("hand-classifier".to_string())
            .spawn(move || {
                while let Some(frame) = Self::next_frame(&worker) {
                    let result = lock(&classifier).classify(&frame);
                    match result {
                        Ok(observations) => *lock(&worker.latest) = observations,
                        Err(e) => warn!("Hand classification failed: {e}"),
                    }
                    worker.processed.fetch_add(1, Ordering::SeqCst);
                }
                debug!("Hand classifier thread finished");
            })?;
        info!("Hand classifier thread started");

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    fn next_frame(shared: &Shared) -> Option<ColorFrame> {
        let mut pending = lock(&shared.pending);
        loop {
            if !shared.running.load(Ordering::SeqCst) {
                return None;
            }
            if let Some(frame) = pending.take() {
                return Some(frame);
            }
            pending = shared.wake.wait(pending).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Offer a frame; replaces a frame the worker has not picked up yet
    pub fn submit(&self, frame: ColorFrame) {
        *lock(&self.shared.pending) = Some(frame);
        self.shared.wake.notify_one();
    }

    /// Observations of the last completed classification
    #[must_use]
    pub fn latest_observations(&self) -> Vec<HandObservation> {
        lock(&self.shared.latest).clone()
    }

    /// Hand states of the last completed classification
    #[must_use]
    pub fn latest(&self) -> HandStates {
        HandStates::from_observations(&lock(&self.shared.latest))
    }

    /// Number of frames classified so far
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.shared.processed.load(Ordering::SeqCst)
    }

    /// Whether the worker thread is still accepting frames
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Stop the worker and wait for it; a classification in progress is
    /// completed first
    pub fn shutdown(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        {
            let _pending = lock(&self.shared.pending);
            self.shared.wake.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Hand classifier thread panicked");
            }
        }
    }
}

impl Drop for HandWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
