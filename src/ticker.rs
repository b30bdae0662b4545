use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, trace};

use crate::{Console, TickUpdate};

/// Drives [Console::tick] from a background thread at a fixed interval.
///
/// Every tick runs under the console's lock, so a simulation stopped by
/// another holder of the lock is never advanced afterwards.
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Starts ticking `console` every `interval`.
    ///
    /// `on_tick` is called with the updates of each tick in which at least
    /// one simulation was running, while the lock is still held. Ticks are
    /// scheduled against a fixed deadline, so time spent ticking does not
    /// stretch the period.
    pub fn spawn<F>(
        console: Arc<Mutex<Console>>,
        interval: Duration,
        mut on_tick: F,
    ) -> io::Result<Self>
    where
        F: FnMut(&[TickUpdate]) + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("ticker".into())
            .spawn(move || {
                let mut next = Instant::now() + interval;
                loop {
                    let wait = next.saturating_duration_since(Instant::now());
                    match stopped.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            next += interval;
                            let mut console = lock_console(&console);
                            let updates = console.tick();
                            if !updates.is_empty() {
                                trace!("tick: {} simulations", updates.len());
                                on_tick(&updates);
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;
        debug!("ticker started every {:?}", interval);
        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Whether the ticker thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Stops the ticker and waits for any tick in progress to finish.
    pub fn shutdown(&mut self) {
        // Dropping the sender wakes the thread.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("ticker thread panicked");
            }
            debug!("ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Locks the console, recovering it if a previous holder panicked.
pub fn lock_console(console: &Mutex<Console>) -> MutexGuard<'_, Console> {
    console.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
