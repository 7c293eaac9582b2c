//! Tokio-backed implementation of the controller's scheduler.

use crate::sim::RuntimeEvent;
use infiniscroll_core::{DeferredAction, Scheduler, TimerToken};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs each deferred action as a sleeping task that posts back into the
/// event loop. Cancelling aborts the task.
#[derive(Debug)]
pub struct TokioScheduler {
    event_tx: mpsc::Sender<RuntimeEvent>,
    timers: HashMap<TimerToken, JoinHandle<()>>,
    next_token: u64,
}

impl TokioScheduler {
    pub fn new(event_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            event_tx,
            timers: HashMap::new(),
            next_token: 0,
        }
    }

    /// Forget a token whose event has been delivered.
    pub fn fired(&mut self, token: TimerToken) {
        self.timers.remove(&token);
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending(&self) -> usize {
        self.timers.values().filter(|h| !h.is_finished()).count()
    }

    /// Abort every outstanding timer.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, action: DeferredAction) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);

        let tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RuntimeEvent::Timer { token, action }).await;
        });
        self.timers.insert(token, handle);
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(handle) = self.timers.remove(&token) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
