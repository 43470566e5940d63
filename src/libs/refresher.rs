//! Scheduled dashboard refreshes with cancellation.
//!
//! The refresher runs on its own tokio task and starts a refresh:
//! - once immediately,
//! - on every tick of a fixed interval (skipped while a refresh is still running),
//! - on every [`RefreshTrigger`] sent through the [`RefreshHandle`].
//!
//! ## Ordering
//!
//! At most one refresh is in flight. A trigger aborts the running refresh
//! before starting its own, and every refresh carries a generation number:
//! a result is only published if no newer generation has been published, so
//! a slow response can never overwrite a fresher view.
//!
//! ## Teardown
//!
//! Cancelling the [`CancellationToken`] stops the timer and aborts the
//! in-flight request. [`RefreshHandle::shutdown`] does both and waits for the
//! task to finish.
//!
//! ```text
//!   tick / trigger ──▶ generation += 1 ──▶ spawn refresh ──▶ publish if newest
//!                           │                                   │
//!                   abort previous (triggers)          watch::Sender<Option<Arc<DashboardSnapshot>>>
//! ```

use crate::api::RecordSource;
use crate::libs::dashboard::{Dashboard, DashboardSnapshot, ViewFilter};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const TRIGGER_CHANNEL_CAPACITY: usize = 16;

pub type SnapshotReceiver = watch::Receiver<Option<Arc<DashboardSnapshot>>>;

#[derive(Debug, Clone)]
pub struct RefresherConfig {
    pub interval: Duration,
    pub include_analytics: bool,
    pub filter: ViewFilter,
}

/// Out-of-schedule refresh requests.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshTrigger {
    /// Refresh now with the current filter.
    Manual,
    /// Replace the filter and refresh.
    Filter(ViewFilter),
}

pub struct RefreshHandle {
    triggers: mpsc::Sender<RefreshTrigger>,
    snapshots: SnapshotReceiver,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub async fn refresh(&self) -> Result<()> {
        self.triggers.send(RefreshTrigger::Manual).await?;
        Ok(())
    }

    pub async fn set_filter(&self, filter: ViewFilter) -> Result<()> {
        self.triggers.send(RefreshTrigger::Filter(filter)).await?;
        Ok(())
    }

    /// A receiver notified on every published snapshot.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.snapshots.borrow().clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels the refresher and waits for its task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            msg_error!(Message::RefreshTaskPanicked(e.to_string()));
        }
    }
}

pub struct Refresher;

impl Refresher {
    /// Starts the refresh task. It runs until `cancel` is cancelled or the
    /// returned handle is dropped.
    pub fn spawn<S>(dashboard: Dashboard<S>, config: RefresherConfig, cancel: CancellationToken) -> RefreshHandle
    where
        S: RecordSource + Send + Sync + 'static,
    {
        let (trigger_tx, trigger_rx) = mpsc::channel(TRIGGER_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(None);

        let task = tokio::spawn(run(Arc::new(dashboard), config, trigger_rx, snapshot_tx, cancel.clone()));

        RefreshHandle {
            triggers: trigger_tx,
            snapshots: snapshot_rx,
            cancel,
            task,
        }
    }
}

async fn run<S>(
    dashboard: Arc<Dashboard<S>>,
    config: RefresherConfig,
    mut triggers: mpsc::Receiver<RefreshTrigger>,
    publisher: watch::Sender<Option<Arc<DashboardSnapshot>>>,
    cancel: CancellationToken,
) where
    S: RecordSource + Send + Sync + 'static,
{
    let publisher = Arc::new(publisher);
    let mut filter = config.filter.clone();
    let mut generation: u64 = 0;
    let mut in_flight: Option<JoinHandle<()>> = None;

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_secs = config.interval.as_secs(), "dashboard refresher started");

    loop {
        let triggered = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => false,
            trigger = triggers.recv() => match trigger {
                Some(RefreshTrigger::Manual) => true,
                Some(RefreshTrigger::Filter(next)) => {
                    filter = next;
                    true
                }
                None => break,
            },
        };

        let busy = in_flight.as_ref().is_some_and(|handle| !handle.is_finished());
        if busy {
            if !triggered {
                tracing::debug!("previous refresh still running, skipping tick");
                continue;
            }
            if let Some(previous) = in_flight.take() {
                previous.abort();
                msg_debug!(Message::RefreshSuperseded(generation));
            }
        }

        generation += 1;
        in_flight = Some(tokio::spawn(refresh_once(
            dashboard.clone(),
            filter.clone(),
            config.include_analytics,
            generation,
            publisher.clone(),
            cancel.child_token(),
        )));
    }

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
    tracing::info!("dashboard refresher stopped");
}

async fn refresh_once<S>(
    dashboard: Arc<Dashboard<S>>,
    filter: ViewFilter,
    include_analytics: bool,
    generation: u64,
    publisher: Arc<watch::Sender<Option<Arc<DashboardSnapshot>>>>,
    cancel: CancellationToken,
) where
    S: RecordSource + Send + Sync + 'static,
{
    let result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = dashboard.refresh(&filter, include_analytics) => result,
    };

    match result {
        Ok(mut snapshot) => {
            snapshot.generation = generation;
            let snapshot = Arc::new(snapshot);
            let published = publisher.send_if_modified(|current| match current {
                Some(existing) if existing.generation >= generation => false,
                _ => {
                    *current = Some(snapshot.clone());
                    true
                }
            });
            if !published {
                msg_debug!(Message::RefreshSuperseded(generation));
            }
        }
        Err(e) => {
            msg_warning!(Message::RefreshFailed(e.to_string()));
        }
    }
}
