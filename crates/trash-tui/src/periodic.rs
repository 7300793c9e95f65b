//! Scoped periodic task: a tokio interval that posts a message until stopped.
//!
//! The task is aborted on `stop`, on restart, and on drop, so no tick can
//! outlive its owner.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Marker posted by the panel's refresh timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTick;

pub struct PeriodicTask<M> {
    period: Duration,
    tx: mpsc::Sender<M>,
    message: M,
    handle: Option<JoinHandle<()>>,
}

impl<M: Clone + Send + 'static> PeriodicTask<M> {
    pub fn new(period: Duration, tx: mpsc::Sender<M>, message: M) -> Self {
        Self {
            period,
            tx,
            message,
            handle: None,
        }
    }

    /// (Re)start the task. The first message arrives one period from now.
    pub fn start(&mut self) {
        self.stop();
        let period = self.period;
        let tx = self.tx.clone();
        let message = self.message.clone();
        // Anchored here, not at the task's first poll.
        let first = Instant::now() + period;
        debug!("periodic task: start ({:?})", period);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(message.clone()).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("periodic task: stop");
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl<M> Drop for PeriodicTask<M> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
