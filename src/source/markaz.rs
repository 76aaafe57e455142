//! HTTP client for the Markaz content API.
//!
//! The API is a single endpoint:
//!
//! * `GET {url}?action=getAllData&timestamp={epoch-ms}` returns the whole
//!   payload wrapped in an [`Envelope`].  The timestamp defeats any cache
//!   between us and the spreadsheet.
//! * `POST {url}` with a form body `action=updateViews&id=N` (or
//!   `updateDownloads`) bumps a counter.  The response is not read.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::payload::{Envelope, Payload};
use super::{CounterSink, CounterUpdate, DataSource};
use crate::error::{CounterError, FetchError};

const READ_ACTION: &str = "getAllData";

/// The remote Markaz API, serving both reads and counter writes.
pub struct MarkazSource {
    client: reqwest::Client,
    /// The Apps Script endpoint.
    url: String,
    /// A human-readable label used in logs.
    label: String,
}

impl MarkazSource {
    /// Create a client for the endpoint at `url`.
    ///
    /// `timeout` bounds every request, reads and counter writes alike.
    pub fn new(url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            label: "Markaz API".into(),
        })
    }

    /// Query pairs for one read, stamped with `epoch_ms`.
    pub fn read_query(epoch_ms: i64) -> [(&'static str, String); 2] {
        [
            ("action", READ_ACTION.to_string()),
            ("timestamp", epoch_ms.to_string()),
        ]
    }

    /// Form pairs for one counter increment.
    pub fn counter_form(update: CounterUpdate) -> [(&'static str, String); 2] {
        [
            ("action", update.kind.action().to_string()),
            ("id", update.id.to_string()),
        ]
    }

    /// Decode a read response body.
    ///
    /// This is a pure function (no I/O) so that tests can exercise envelope
    /// handling without hitting the network.
    pub fn parse_envelope(body: &str) -> Result<Payload, FetchError> {
        let envelope: Envelope = serde_json::from_str(body)?;
        if !envelope.success {
            return Err(FetchError::application(envelope.error));
        }
        debug!(server_time = %envelope.timestamp, "envelope decoded");
        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl DataSource for MarkazSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_all(&self) -> Result<Payload, FetchError> {
        let query = Self::read_query(Utc::now().timestamp_millis());
        let response = self.client.get(&self.url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.text().await?;
        Self::parse_envelope(&body)
    }
}

#[async_trait]
impl CounterSink for MarkazSource {
    async fn increment(&self, update: CounterUpdate) -> Result<(), CounterError> {
        // Any answer at all counts as delivered; only transport errors fail.
        self.client
            .post(&self.url)
            .form(&Self::counter_form(update))
            .send()
            .await
            .map_err(|e| CounterError::new(update, e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
