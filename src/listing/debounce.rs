//! Debounced input for free-text queries
//!
//! Keystrokes are coalesced: each [`Debouncer::schedule`] replaces the
//! pending value and restarts the timer, and only a value that survives
//! `delay` of inactivity is emitted. The listing engine itself stays pure;
//! the view re-derives when a value arrives on the receiver.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

struct Pending<T> {
    value: Option<T>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Cancellable trailing-edge debounce timer
///
/// Requires a Tokio runtime: scheduling spawns a timer task.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Arc<Mutex<Pending<T>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver its settled values arrive on
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: Arc::new(Mutex::new(Pending {
                value: None,
                generation: 0,
                timer: None,
            })),
        };
        (debouncer, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the timer
    pub fn schedule(&self, value: T) {
        let mut pending = lock(&self.pending);
        pending.generation = pending.generation.wrapping_add(1);
        pending.value = Some(value);
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }

        let generation = pending.generation;
        let shared = Arc::clone(&self.pending);
        let tx = self.tx.clone();
        let delay = self.delay;
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut pending = lock(&shared);
            if pending.generation != generation {
                return;
            }
            pending.timer = None;
            if let Some(value) = pending.value.take() {
                trace!(?delay, "debounced value settled");
                let _ = tx.send(value);
            }
        }));
    }

    /// Emit the pending value now, if any; returns whether one was sent
    pub fn flush(&self) -> bool {
        let value = self.take_pending();
        match value {
            Some(value) => self.tx.send(value).is_ok(),
            None => false,
        }
    }

    /// Drop the pending value without emitting it
    pub fn cancel(&self) -> bool {
        self.take_pending().is_some()
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).value.is_some()
    }

    fn take_pending(&self) -> Option<T> {
        let mut pending = lock(&self.pending);
        pending.generation = pending.generation.wrapping_add(1);
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.value.take()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.pending).timer.take() {
            timer.abort();
        }
    }
}

// A panic while holding the lock cannot leave `Pending` half-written
fn lock<T>(pending: &Mutex<Pending<T>>) -> MutexGuard<'_, Pending<T>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
