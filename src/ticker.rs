//! Periodic telemetry scheduler.
//!
//! Drives one simulator tick per interval on a dedicated thread and hands the
//! snapshot to a callback. Cancellation is idempotent and joins the thread,
//! so no callback fires after `cancel` returns.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::telemetry::{Telemetry, TelemetrySimulator};

pub struct TelemetryTicker {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TelemetryTicker {
    /// Start ticking every `interval`. The callback runs on the ticker thread.
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(&Telemetry) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            let mut sim = TelemetrySimulator::new();
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let snapshot = sim.tick();
                        on_tick(&snapshot);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            log::debug!("telemetry ticker stopped");
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the ticker and wait for the thread to exit. Safe to call more
    /// than once.
    pub fn cancel(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The thread may already have exited; a failed send is fine.
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TelemetryTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{mpsc as test_mpsc, Arc};

    #[test]
    fn ticks_deliver_simulator_snapshots() {
        let (tx, rx) = test_mpsc::channel();
        let mut ticker = TelemetryTicker::spawn(Duration::from_millis(5), move |t| {
            let _ = tx.send(*t);
        });

        let first = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("first tick arrives");
        ticker.cancel();

        let mut reference = TelemetrySimulator::new();
        assert_eq!(first, reference.tick());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut ticker = TelemetryTicker::spawn(Duration::from_millis(5), |_| {});
        ticker.cancel();
        ticker.cancel();
    }

    #[test]
    fn no_callback_after_cancel_returns() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = count.clone();
        let mut ticker = TelemetryTicker::spawn(Duration::from_millis(1), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(10));
        ticker.cancel();
        let at_cancel = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), at_cancel);
    }

    #[test]
    fn drop_cancels_the_ticker() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = count.clone();
        {
            let _ticker = TelemetryTicker::spawn(Duration::from_millis(1), move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
            thread::sleep(Duration::from_millis(5));
        }
        let at_drop = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), at_drop);
    }
}
