//! Cancellable fixed-period background task.
//!
//! A [`Ticker`] owns one worker thread that sleeps for the period and then runs
//! its callback, re-arming only after the callback returns. Cancelling wakes the
//! worker immediately and joins it; once [`Ticker::cancel`] returns the
//! callback will never run again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Ticker {
    period: Duration,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    fired: Arc<AtomicU64>,
}

impl Ticker {
    /// Spawn a worker that calls `on_tick` every `period`.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);

        let handle = thread::Builder::new()
            .name("kilnwatch-ticker".into())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            on_tick();
                            counter.fetch_add(1, Ordering::Relaxed);
                        }
                        // Explicit stop or the owning Ticker was dropped.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .ok();

        if handle.is_none() {
            log::warn!("failed to spawn ticker thread; simulation will not advance");
        } else {
            log::debug!("ticker started, period {}ms", period.as_millis());
        }

        Self {
            period,
            stop: Some(stop),
            handle,
            fired,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of completed callbacks.
    pub fn ticks(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the worker and wait for it to exit. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("ticker callback panicked");
            }
            log::debug!("ticker stopped after {} ticks", self.ticks());
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
