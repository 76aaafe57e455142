//! Data source abstraction layer.
//!
//! This module defines the two seams between the application and the remote
//! content API:
//!
//! * [`DataSource`]: reads the whole [`Payload`] in one request.
//! * [`CounterSink`]: accepts view/download counter increments.
//!
//! The concrete HTTP implementation of both is [`MarkazSource`].  Tests plug
//! in fakes so that the poller and the counter policy can be exercised
//! without a network.
//!
//! ## For contributors: pointing at a different backend
//!
//! 1. Create a new file in this directory (e.g. `fixture.rs`).
//! 2. Implement [`DataSource`] (and [`CounterSink`] if it accepts counters).
//! 3. Add `mod fixture;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of `MarkazSource`.
//!
//! The poller, index, search and UI are all source-agnostic.

mod content_record;
mod markaz;
mod payload;

// Re-export the public API of this module so callers can write
// `use crate::source::{DataSource, ContentRecord, MarkazSource};`
pub use content_record::{build_index, ContentRecord, SourceKind};
pub use markaz::MarkazSource;
pub use payload::{Difficulty, Payload};

use std::fmt;

use async_trait::async_trait;

use crate::error::{CounterError, FetchError};

/// Something that can produce the full content payload.
///
/// The poller calls [`fetch_all()`](DataSource::fetch_all) on the runtime,
/// so implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable label used in log lines.
    fn name(&self) -> &str;

    /// Read the latest payload.
    ///
    /// Errors are converted to a message by the poller and shown to the
    /// user; they are never retried here.
    async fn fetch_all(&self) -> Result<Payload, FetchError>;
}

/// Which remote counter an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Views,
    Downloads,
}

impl CounterKind {
    /// Value of the `action` form field.
    pub fn action(self) -> &'static str {
        match self {
            CounterKind::Views => "updateViews",
            CounterKind::Downloads => "updateDownloads",
        }
    }

    /// The counter that selecting a record of `kind` bumps, if any.
    pub fn for_source(kind: SourceKind) -> Option<Self> {
        match kind {
            SourceKind::Video => Some(CounterKind::Views),
            SourceKind::Resource => Some(CounterKind::Downloads),
            SourceKind::Featured => None,
        }
    }
}

/// One increment of one remote counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterUpdate {
    pub kind: CounterKind,
    pub id: u64,
}

impl CounterUpdate {
    pub fn new(kind: CounterKind, id: u64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for CounterUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CounterKind::Views => write!(f, "view count of video {}", self.id),
            CounterKind::Downloads => write!(f, "download count of resource {}", self.id),
        }
    }
}

/// Something that accepts counter increments.
#[async_trait]
pub trait CounterSink: Send + Sync {
    async fn increment(&self, update: CounterUpdate) -> Result<(), CounterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_videos_and_resources_have_counters() {
        assert_eq!(CounterKind::for_source(SourceKind::Video), Some(CounterKind::Views));
        assert_eq!(
            CounterKind::for_source(SourceKind::Resource),
            Some(CounterKind::Downloads)
        );
        assert_eq!(CounterKind::for_source(SourceKind::Featured), None);
    }

    #[test]
    fn counter_actions_match_the_api() {
        assert_eq!(CounterKind::Views.action(), "updateViews");
        assert_eq!(CounterKind::Downloads.action(), "updateDownloads");
    }
}
