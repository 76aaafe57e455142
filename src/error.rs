//! Error types for talking to the Markaz content API.
//!
//! Two families exist because they are handled very differently:
//!
//! * [`FetchError`]: the full-payload read failed.  The message is shown to
//!   the user verbatim (prefixed with `Error:`) until the next refresh.
//! * [`CounterError`]: a view/download increment failed.  These are never
//!   shown to the user; the counter policy logs and counts them.

use std::fmt;

use thiserror::Error;

use crate::source::CounterUpdate;

/// Failure of a full-payload read from the remote data source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The envelope said `success: false`.
    ///
    /// Rendered verbatim so the user sees exactly what the API reported.
    #[error("{0}")]
    Application(String),

    /// The body was not a valid envelope.
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Fallback used when the envelope reports failure without a message.
    pub const GENERIC_APPLICATION_MESSAGE: &'static str = "API returned error";

    /// Build an [`FetchError::Application`] from the envelope's optional
    /// `error` field.
    pub fn application(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| Self::GENERIC_APPLICATION_MESSAGE.to_string());
        Self::Application(message)
    }
}

/// Failure of a single counter increment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to update {update}: {message}")]
pub struct CounterError {
    pub update: CounterUpdate,
    pub message: String,
}

impl CounterError {
    pub fn new(update: CounterUpdate, cause: impl fmt::Display) -> Self {
        Self {
            update,
            message: cause.to_string(),
        }
    }
}
