use std::io::BufRead;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONNECTION, CONTENT_ENCODING};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chunk::Chunker;
use crate::compression::Compression;
use crate::error::{HecError, HecResult};
use crate::event::{epoch_time, Event, EventMetadata};
use crate::retry::{send_with_retry, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL};
use crate::Hec;

const DEFAULT_MAX_CONTENT_LENGTH: usize = 1_000_000;

const COLLECTOR_PATH: &str = "/services/collector";
const RAW_PATH: &str = "/services/collector/raw";

/// Client for a single collector endpoint.
///
/// Submissions borrow the client immutably and can run concurrently from
/// independent tasks; configuration setters take `&mut self`, so changing
/// configuration is serialized against in-flight calls by ownership.
pub struct Client {
    http: reqwest::Client,
    server_url: String,
    token: String,
    keep_alive: bool,
    channel: String,
    max_retries: usize,
    retry_interval: Duration,
    max_content_length: usize,
    compression: Compression,
}

impl Client {
    /// Creates a client with a freshly generated channel identifier.
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_channel(server_url, token, Uuid::new_v4().to_string())
    }

    pub(crate) fn with_channel(
        server_url: impl Into<String>,
        token: impl Into<String>,
        channel: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: server_url.into(),
            token: token.into(),
            keep_alive: true,
            channel,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            compression: Compression::None,
        }
    }

    fn collector_query(&self) -> Vec<(&'static str, String)> {
        vec![("channel", self.channel.clone())]
    }

    fn raw_query(&self, metadata: Option<&EventMetadata>) -> Vec<(&'static str, String)> {
        let mut query = self.collector_query();
        if let Some(metadata) = metadata {
            if let Some(host) = &metadata.host {
                query.push(("host", host.clone()));
            }
            if let Some(index) = &metadata.index {
                query.push(("index", index.clone()));
            }
            if let Some(source) = &metadata.source {
                query.push(("source", source.clone()));
            }
            if let Some(sourcetype) = &metadata.sourcetype {
                query.push(("sourcetype", sourcetype.clone()));
            }
            if let Some(time) = &metadata.time {
                query.push(("time", epoch_time(time)));
            }
        }
        query
    }

    /// Transmits one request body, retrying per the configured policy.
    async fn write(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        body: Vec<u8>,
    ) -> HecResult<()> {
        let body = self.compression.encode(body)?;
        send_with_retry(self.max_retries, self.retry_interval, || {
            let mut request = self
                .http
                .post(format!("{}{}", self.server_url, path))
                .query(&query)
                .header(AUTHORIZATION, format!("Splunk {}", self.token))
                .body(body.clone());
            if self.keep_alive {
                request = request.header(CONNECTION, "keep-alive");
            }
            if let Some(encoding) = self.compression.content_encoding() {
                request = request.header(CONTENT_ENCODING, encoding);
            }
            request
        })
        .await
    }
}

impl Hec for Client {
    fn set_http_client(&mut self, http: reqwest::Client) {
        self.http = http;
    }

    fn set_keep_alive(&mut self, enable: bool) {
        self.keep_alive = enable;
    }

    fn set_channel(&mut self, channel: String) {
        self.channel = channel;
    }

    fn set_max_retries(&mut self, retries: usize) {
        self.max_retries = retries;
    }

    fn set_retry_interval(&mut self, interval: Duration) {
        self.retry_interval = interval;
    }

    fn set_max_content_length(&mut self, limit: usize) {
        self.max_content_length = limit;
    }

    fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    async fn write_event(&self, event: &Event) -> HecResult<()> {
        if event.is_empty() {
            debug!("skipping empty event");
            return Ok(());
        }

        let data = event.encode()?;
        if data.len() > self.max_content_length {
            return Err(HecError::TooLong(Vec::new()));
        }
        self.write(COLLECTOR_PATH, &self.collector_query(), data)
            .await
    }

    async fn write_batch(&self, events: &[Event]) -> HecResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        info!("submitting batch of {} events", events.len());

        let query = self.collector_query();
        let mut chunker = Chunker::new(self.max_content_length);
        let mut too_long = Vec::new();

        for (index, event) in events.iter().enumerate() {
            if event.is_empty() {
                debug!("skipping empty event at index {}", index);
                continue;
            }

            let data = event.encode()?;
            if data.len() > self.max_content_length {
                too_long.push(index);
                continue;
            }
            // Flush the accumulated body before this event would overflow it.
            if let Some(body) = chunker.push(&data) {
                self.write(COLLECTOR_PATH, &query, body).await?;
            }
        }

        if let Some(body) = chunker.finish() {
            self.write(COLLECTOR_PATH, &query, body).await?;
        }
        if too_long.is_empty() {
            Ok(())
        } else {
            Err(HecError::TooLong(too_long))
        }
    }

    async fn write_raw(
        &self,
        mut reader: impl BufRead,
        metadata: Option<&EventMetadata>,
    ) -> HecResult<()> {
        let query = self.raw_query(metadata);
        let mut chunker = Chunker::new(self.max_content_length);
        let mut too_long = Vec::new();
        let mut line = Vec::new();

        // Line numbering is 1-based over the full input, blank lines included.
        let mut line_no = 0usize;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            line_no += 1;

            if line.last() == Some(&b'\n') {
                line.pop();
            }
            // The terminator does not count toward a line's own length.
            if line.len() > self.max_content_length {
                too_long.push(line_no);
                continue;
            }

            line.push(b'\n');
            if let Some(body) = chunker.push(&line) {
                self.write(RAW_PATH, &query, body).await?;
            }
        }

        if let Some(body) = chunker.finish() {
            self.write(RAW_PATH, &query, body).await?;
        }
        if too_long.is_empty() {
            Ok(())
        } else {
            Err(HecError::TooLong(too_long))
        }
    }
}
