//! Periodic republication of year progress.
//!
//! A [`RefreshLoop`] publishes one value as soon as it starts and another on
//! every period until its [`RefreshHandle`] is cancelled. Every tick runs in a
//! single task, one after the other, so two ticks never overlap.

use crate::calculator::YearProgress;
use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How often progress is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Every second.
    #[default]
    Second,
    /// Every minute.
    Minute,
}

impl Cadence {
    pub fn period(self) -> Duration {
        match self {
            Self::Second => Duration::from_secs(1),
            Self::Minute => Duration::from_secs(60),
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Second => Self::Minute,
            Self::Minute => Self::Second,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Second => "1s",
            Self::Minute => "60s",
        }
    }
}

/// Recomputes progress from a clock at a fixed cadence.
pub struct RefreshLoop<C> {
    clock: C,
    cadence: Cadence,
}

impl<C: Clock> RefreshLoop<C> {
    pub fn new(clock: C, cadence: Cadence) -> Self {
        Self { clock, cadence }
    }

    /// Publish now, then once per period on a spawned task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(self, mut publish: F) -> RefreshHandle
    where
        F: FnMut(YearProgress) + Send + 'static,
    {
        let Self { clock, cadence } = self;
        let period = cadence.period();

        publish(YearProgress::at(clock.now()));

        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let progress = YearProgress::at(clock.now());
                        let tick = counter.fetch_add(1, Ordering::Relaxed) + 1;
                        debug!(tick, percentage = progress.percentage, "year progress refreshed");
                        publish(progress);
                    }
                }
            }
        });

        info!(cadence = cadence.label(), "refresh loop started");

        RefreshHandle {
            cadence,
            ticks,
            stop: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Start and publish into a watch channel holding the latest value.
    pub fn start_watch(self) -> (RefreshHandle, watch::Receiver<YearProgress>) {
        let (tx, mut rx) = watch::channel(YearProgress::at(self.clock.now()));
        let handle = self.start(move |progress| {
            tx.send_replace(progress);
        });
        // The value published on start is already the one the channel was seeded with.
        rx.borrow_and_update();
        (handle, rx)
    }
}

/// Controls a running [`RefreshLoop`].
///
/// Dropping the handle without calling [`cancel`](Self::cancel) aborts the
/// task at its next suspension point.
pub struct RefreshHandle {
    cadence: Cadence,
    ticks: Arc<AtomicU64>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Periodic publications so far, excluding the one made on start.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop and wait for its task to exit.
    ///
    /// Once this returns, the publisher is never called again.
    pub async fn cancel(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "refresh task ended abnormally");
            }
        }
        info!(ticks = self.ticks(), "refresh loop cancelled");
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
