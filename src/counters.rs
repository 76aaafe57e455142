//! Best-effort delivery of view and download counters.
//!
//! Opening a video or resource bumps a counter on the server.  These updates
//! follow a deliberately lossy policy:
//!
//! * [`BestEffort::record`] never blocks and never fails; the POST runs as a
//!   detached task on the runtime.
//! * A failed update is logged at `warn`, counted in [`CounterStats`] and
//!   dropped.  It is not retried or queued.
//! * The cached payload is not touched.  Displayed counts stay stale until
//!   the next full refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::source::{CounterSink, CounterUpdate};

/// Delivery tally for counter updates.
#[derive(Debug, Default)]
pub struct CounterStats {
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl CounterStats {
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Fire-and-forget counter reporter.
pub struct BestEffort {
    runtime: Handle,
    sink: Arc<dyn CounterSink>,
    stats: Arc<CounterStats>,
}

impl BestEffort {
    pub fn new(runtime: Handle, sink: Arc<dyn CounterSink>) -> Self {
        Self {
            runtime,
            sink,
            stats: Arc::new(CounterStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<CounterStats> {
        Arc::clone(&self.stats)
    }

    /// Send `update` in the background.
    ///
    /// The returned handle only exists so tests can wait for the outcome;
    /// callers are free to drop it.
    pub fn record(&self, update: CounterUpdate) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let stats = Arc::clone(&self.stats);

        self.runtime.spawn(async move {
            match sink.increment(update).await {
                Ok(()) => {
                    stats.delivered.fetch_add(1, Ordering::Relaxed);
                    debug!(%update, "counter updated");
                }
                Err(e) => {
                    stats.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(error = %e, "counter update dropped");
                }
            }
        })
    }
}
