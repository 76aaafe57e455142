//! In-memory cache of the last fetched payload.
//!
//! The store is the only writer of the payload.  Readers get shared
//! [`Arc`]s, and every update swaps the payload and its search index in one
//! assignment, so a reader sees either the previous payload or the new one,
//! never a mix.
//!
//! State machine:
//!
//! ```text
//! Empty ──► Loading ──► Ready
//!              ▲  └────► Errored
//!              └── refresh from Ready or Errored
//! ```

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::source::{build_index, ContentRecord, Payload};

/// Where the cache is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Ready,
    /// The last fetch failed with this message.
    Errored(String),
}

/// A payload together with the index built from it.
#[derive(Debug)]
pub struct Snapshot {
    pub payload: Payload,
    pub index: Vec<ContentRecord>,
}

impl Snapshot {
    fn new(payload: Payload) -> Self {
        let index = build_index(&payload);
        Self { payload, index }
    }
}

#[derive(Debug)]
pub struct Store {
    state: CacheState,
    snapshot: Option<Arc<Snapshot>>,
    /// Bumped on every payload replacement.
    generation: u64,
    refreshed_at: Option<DateTime<Local>>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: CacheState::Empty,
            snapshot: None,
            generation: 0,
            refreshed_at: None,
        }
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    /// The current payload and index, if any fetch has ever succeeded.
    ///
    /// While a refresh is in flight this is still the previous snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.clone()
    }

    /// Borrow the current snapshot without bumping its refcount.
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// A fetch has started.
    pub fn begin_loading(&mut self) {
        self.state = CacheState::Loading;
    }

    /// A fetch succeeded: replace the payload and rebuild the index.
    pub fn apply_payload(&mut self, payload: Payload) {
        self.snapshot = Some(Arc::new(Snapshot::new(payload)));
        self.generation += 1;
        self.refreshed_at = Some(Local::now());
        self.state = CacheState::Ready;
    }

    /// A fetch failed.  The previous snapshot is kept but not shown.
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.state = CacheState::Errored(message.into());
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
