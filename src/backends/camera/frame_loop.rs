// SPDX-License-Identifier: GPL-3.0-only

//! Producer threads that feed a [`FrameSlot`]
//!
//! Sources that pull frames from a driver read on a dedicated thread and
//! publish into the slot shared with the booth. Setup runs on that thread
//! (driver handles are often not `Send`) but its outcome is reported back
//! before [`FrameProducer::spawn`] returns, so open errors reach the caller.

use super::{Frame, FrameSlot};
use crate::errors::MediaError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Outcome of one read on the producer thread
#[derive(Debug)]
pub enum Step {
    /// A new frame to publish
    Frame(Frame),
    /// Nothing this time (read timeout); try again
    Skip,
    /// The feed ended
    End,
}

/// Owns a producer thread; dropping it stops the thread
pub struct FrameProducer {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    published: Arc<AtomicU64>,
}

impl FrameProducer {
    /// Spawn `name`, run `setup` on it, then call `read` until it ends.
    ///
    /// Blocks until `setup` has finished; its error is returned here and the
    /// thread exits without reading.
    pub fn spawn<S, I, F>(
        name: &'static str,
        slot: Arc<FrameSlot>,
        setup: I,
        mut read: F,
    ) -> Result<Self, MediaError>
    where
        S: 'static,
        I: FnOnce() -> Result<S, MediaError> + Send + 'static,
        F: FnMut(&mut S) -> Step + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let published = Arc::new(AtomicU64::new(0));
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), MediaError>>(1);

        let thread_stop = Arc::clone(&stop);
        let thread_published = Arc::clone(&published);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut state = match setup() {
                    Ok(state) => {
                        let _ = ready_tx.send(Ok(()));
                        state
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while !thread_stop.load(Ordering::Acquire) {
                    match read(&mut state) {
                        Step::Frame(frame) => {
                            slot.publish(frame);
                            thread_published.fetch_add(1, Ordering::Relaxed);
                        }
                        Step::Skip => {}
                        Step::End => {
                            debug!(producer = name, "Feed ended");
                            break;
                        }
                    }
                }

                info!(
                    producer = name,
                    frames = thread_published.load(Ordering::Relaxed),
                    "Producer thread exiting"
                );
            })?;

        let mut producer = Self {
            name,
            handle: Some(handle),
            stop,
            published,
        };

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!(producer = name, "Producer started");
                Ok(producer)
            }
            Ok(Err(e)) => {
                producer.wait();
                Err(e)
            }
            // Setup panicked before reporting
            Err(_) => {
                producer.wait();
                Err(MediaError::Unavailable(format!("{} failed to start", name)))
            }
        }
    }

    /// Whether the thread is still reading
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Frames published so far
    pub fn frames_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Ask the thread to stop and wait for it
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.wait();
    }

    /// Wait for the thread to end on its own
    pub fn wait(&mut self) {
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!(producer = self.name, "Producer thread panicked");
        }
    }
}

impl Drop for FrameProducer {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

impl std::fmt::Debug for FrameProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameProducer")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .field("published", &self.frames_published())
            .finish()
    }
}
