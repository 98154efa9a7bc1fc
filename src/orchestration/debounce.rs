//! Trailing-edge debouncing
//!
//! A `Debouncer` owns at most one armed timer. Arming it again cancels the
//! previous timer, so only the last call in a burst fires. Every arm hands
//! out a fresh token; the fired task must present it back through
//! [`Debouncer::finish`] before acting, which rejects a timer that was
//! cancelled after it had already woken up.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Debouncer with a configurable quiet period
#[derive(Debug)]
pub struct Debouncer {
    /// Quiet period
    delay: Duration,

    /// Timer still waiting out its quiet period
    pending: Option<JoinHandle<()>>,

    /// Token of the most recent arm
    token: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            token: 0,
        }
    }

    /// Get the quiet period
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, cancelling any earlier one.
    ///
    /// `make` receives the new token and builds the future that runs once the
    /// quiet period has elapsed. Must be called within a Tokio runtime.
    pub fn schedule<F, Fut>(&mut self, make: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.token += 1;

        let delay = self.delay;
        let on_fire = make(self.token);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire.await;
        }));

        self.token
    }

    /// Cancel the armed timer. Returns whether one was armed.
    ///
    /// A timer that already fired and called `finish` is unaffected.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Claim the firing for `token`.
    ///
    /// Returns false if the timer was cancelled or re-armed in the meantime.
    /// On success the timer is disarmed without aborting the calling task.
    pub fn finish(&mut self, token: u64) -> bool {
        if self.pending.is_some() && self.token == token {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Whether a timer is waiting out its quiet period
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
