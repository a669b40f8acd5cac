//! Client library for submitting telemetry events to an HTTP Event
//! Collector endpoint.
//!
//! Events are encoded, packed into request bodies bounded by the endpoint's
//! maximum content length, and transmitted with a bounded, code-aware retry
//! policy. Delivery is at-least-once: transient collector failures are
//! retried a fixed number of times with a fixed wait, everything else is
//! surfaced to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! # use hec_client::{Client, Event, Hec};
//! # #[tokio::main]
//! # async fn main() -> Result<(), hec_client::HecError> {
//! let client = Client::new("http://localhost:8088", "00000000-0000-0000-0000-000000000000");
//! let event = Event::builder().event("hello, world").index("main").build();
//! client.write_event(&event).await?;
//! # Ok(())
//! # }
//! ```

use std::io::BufRead;
use std::time::Duration;

mod chunk;
mod client;
mod cluster;
mod compression;
mod error;
mod event;
pub mod response;
mod retry;

pub use client::Client;
pub use cluster::Cluster;
pub use compression::Compression;
pub use error::{HecError, HecResult};
pub use event::{epoch_time, Event, EventMetadata};
pub use response::Response;

/// The collector capability contract.
///
/// Both the single-endpoint [`Client`] and the multi-endpoint [`Cluster`]
/// implement every operation; there is no partial implementation with
/// fallback dispatch.
#[allow(async_fn_in_trait)]
pub trait Hec {
    /// Replaces the HTTP transport used for requests.
    fn set_http_client(&mut self, http: reqwest::Client);

    /// Enables or disables the `Connection: keep-alive` request header.
    fn set_keep_alive(&mut self, enable: bool);

    fn set_channel(&mut self, channel: String);

    /// Caps how many *additional* attempts follow a retriable failure.
    fn set_max_retries(&mut self, retries: usize);

    /// Fixed wait between attempts on the same request body.
    fn set_retry_interval(&mut self, interval: Duration);

    /// Maximum byte length of one request body; events and raw lines that
    /// individually exceed it are reported, never transmitted.
    fn set_max_content_length(&mut self, limit: usize);

    fn set_compression(&mut self, compression: Compression);

    /// Submits a single event. Empty events are skipped without a request.
    async fn write_event(&self, event: &Event) -> HecResult<()>;

    /// Submits a batch of events, packed into as few request bodies as the
    /// content length allows and transmitted in order.
    async fn write_batch(&self, events: &[Event]) -> HecResult<()>;

    /// Submits a line-delimited byte stream to the raw endpoint, annotated
    /// with `metadata` as query parameters.
    async fn write_raw(
        &self,
        reader: impl BufRead,
        metadata: Option<&EventMetadata>,
    ) -> HecResult<()>;
}
