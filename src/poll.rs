//! Background payload polling.
//!
//! Runs as a task on the tokio runtime: fetches once immediately, then again
//! every refresh interval and whenever a manual refresh is requested.
//! Results go to the UI thread over an [`mpsc`] channel which the main loop
//! drains on every tick.
//!
//! ## Lifecycle
//!
//! [`spawn`] starts the poller and returns a [`Poller`] handle.  Call
//! [`Poller::stop`] before tearing down; after that no further message is
//! delivered, even from a fetch that was already in flight.  Dropping the
//! receiver also ends the task at its next send.
//!
//! Fetches are handled one at a time, so a manual refresh requested during a
//! periodic fetch runs right after it.  The UI applies messages in arrival
//! order: the last completed fetch wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc as cmd;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::source::{DataSource, Payload};

/// Messages sent from the poller to the UI thread.
#[derive(Debug)]
pub enum PollMsg {
    /// A fetch has started.
    Loading,
    /// A fetch succeeded with this payload.
    Loaded(Payload),
    /// A fetch failed with this error description.
    Failed(String),
}

/// Requests from the UI to the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollCmd {
    Refresh,
}

/// Handle to a running poller.
pub struct Poller {
    commands: cmd::UnboundedSender<PollCmd>,
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Ask for an immediate re-fetch.
    pub fn refresh(&self) {
        if self.commands.send(PollCmd::Refresh).is_err() {
            warn!("refresh requested but the poller has stopped");
        }
    }

    /// Stop polling.  No message is delivered after this returns.
    pub fn stop(self) {
        self.alive.store(false, Ordering::SeqCst);
        self.task.abort();
        info!("poller stopped");
    }
}

/// Spawn the polling task on `runtime`.
///
/// `every` is the auto-refresh interval; `None` disables the timer so only
/// the initial fetch and manual refreshes happen.
pub fn spawn(
    runtime: &Handle,
    source: Arc<dyn DataSource>,
    every: Option<Duration>,
) -> (Poller, mpsc::Receiver<PollMsg>) {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = cmd::unbounded_channel();
    let alive = Arc::new(AtomicBool::new(true));

    let task = runtime.spawn(run(source, every, cmd_rx, tx, Arc::clone(&alive)));

    let poller = Poller {
        commands: cmd_tx,
        alive,
        task,
    };
    (poller, rx)
}

async fn run(
    source: Arc<dyn DataSource>,
    every: Option<Duration>,
    mut commands: cmd::UnboundedReceiver<PollCmd>,
    tx: mpsc::Sender<PollMsg>,
    alive: Arc<AtomicBool>,
) {
    info!(source = source.name(), ?every, "poller started");

    loop {
        if !fetch_once(source.as_ref(), &tx, &alive).await {
            return;
        }
        if !wait_for_next(&mut commands, every).await {
            return;
        }
    }
}

/// Wait for a manual refresh or the next timer tick.  Returns `false` when
/// nothing can ever wake the poller again.
async fn wait_for_next(
    commands: &mut cmd::UnboundedReceiver<PollCmd>,
    every: Option<Duration>,
) -> bool {
    let timer = async {
        match every {
            Some(interval) => tokio::time::sleep(interval).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(timer);

    tokio::select! {
        command = commands.recv() => {
            if let Some(PollCmd::Refresh) = command {
                info!("manual refresh");
                return true;
            }
        }
        _ = &mut timer => {
            info!("scheduled refresh");
            return true;
        }
    }

    // Every handle is gone; only the timer can wake us now.
    if every.is_none() {
        return false;
    }
    timer.await;
    true
}

/// Run one fetch and report it.  Returns `false` once the poller should
/// stop: it was stopped, or the UI dropped its receiver.
async fn fetch_once(
    source: &dyn DataSource,
    tx: &mpsc::Sender<PollMsg>,
    alive: &AtomicBool,
) -> bool {
    if !deliver(tx, alive, PollMsg::Loading) {
        return false;
    }

    let msg = match source.fetch_all().await {
        Ok(payload) => {
            info!(
                featured = payload.featured_content.len(),
                videos = payload.learning_videos.len(),
                resources = payload.learning_resources.len(),
                "payload fetched"
            );
            PollMsg::Loaded(payload)
        }
        Err(e) => {
            warn!(source = source.name(), error = %e, "fetch failed");
            PollMsg::Failed(e.to_string())
        }
    };

    deliver(tx, alive, msg)
}

fn deliver(tx: &mpsc::Sender<PollMsg>, alive: &AtomicBool, msg: PollMsg) -> bool {
    // A fetch that finishes after stop() is dropped on the floor.
    if !alive.load(Ordering::SeqCst) {
        return false;
    }
    tx.send(msg).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
