//! Background producer that streams a `MarkerSource` into a shared channel.
//!
//! Spawns one thread that owns the source, marks the session running, writes
//! one frame per sampling period, and marks the session ended at end of data
//! or on a source error. The thread is shut down and joined when the `Feeder`
//! is dropped, preventing thread leaks.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use gait_traits::{Clock, MarkerSource};

use crate::channel::ProducerHandle;
use crate::error::{GaitError, Result};
use crate::session::SessionState;

pub struct Feeder {
    written: Arc<AtomicU64>,
    failure: Arc<Mutex<Option<String>>>,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl Feeder {
    pub fn spawn<S, C>(mut source: S, producer: ProducerHandle, hz: f64, clock: C) -> Self
    where
        S: MarkerSource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let written = Arc::new(AtomicU64::new(0));
        let written_clone = written.clone();
        let failure = Arc::new(Mutex::new(None));
        let failure_clone = failure.clone();
        let period = crate::util::period_from_hz(hz);

        let join_handle = std::thread::spawn(move || {
            producer.set_session(SessionState::Running);
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("Feeder thread received shutdown signal");
                    break;
                }

                match source.next_frame() {
                    Ok(Some(frame)) => {
                        producer.write_frame(&frame);
                        written_clone.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(None) => {
                        tracing::debug!("marker source exhausted");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "marker source failed");
                        if let Ok(mut slot) = failure_clone.lock() {
                            *slot = Some(e.to_string());
                        }
                        break;
                    }
                }

                // Check shutdown before sleep to avoid unnecessary delay
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(period);
            }
            producer.set_session(SessionState::Ended);
            tracing::trace!("Feeder thread exiting cleanly");
        });

        Self {
            written,
            failure,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_none_or(JoinHandle::is_finished)
    }

    /// Ask the thread to stop after the current frame.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the thread and report the frame count, or the source error.
    pub fn finish(mut self) -> Result<u64> {
        if let Some(handle) = self.join_handle.take()
            && handle.join().is_err()
        {
            return Err(eyre::Report::new(GaitError::State(
                "feeder thread panicked".into(),
            )));
        }
        let failure = self.failure.lock().ok().and_then(|mut g| g.take());
        match failure {
            Some(msg) => Err(eyre::Report::new(GaitError::Source(msg))),
            None => Ok(self.frames_written()),
        }
    }
}

impl Drop for Feeder {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("Feeder thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "Feeder thread panicked during shutdown");
                }
            }
        }
    }
}
