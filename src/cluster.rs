use std::io::BufRead;
use std::time::Duration;

use rand::Rng;
use uuid::Uuid;

use crate::client::Client;
use crate::compression::Compression;
use crate::error::HecResult;
use crate::event::{Event, EventMetadata};
use crate::Hec;

/// Client distributing submissions across several collector endpoints that
/// share one channel identifier.
///
/// Each write is delegated to a uniformly random inner client; configuration
/// changes are applied to every inner client.
pub struct Cluster {
    clients: Vec<Client>,
}

impl Cluster {
    pub fn new(
        server_urls: impl IntoIterator<Item = impl Into<String>>,
        token: impl Into<String>,
    ) -> Self {
        let token = token.into();
        let channel = Uuid::new_v4().to_string();
        let clients: Vec<Client> = server_urls
            .into_iter()
            .map(|url| Client::with_channel(url, token.clone(), channel.clone()))
            .collect();
        assert!(!clients.is_empty(), "cluster needs at least one endpoint");
        Self { clients }
    }

    fn pick(&self) -> &Client {
        let index = rand::rng().random_range(0..self.clients.len());
        &self.clients[index]
    }
}

impl Hec for Cluster {
    fn set_http_client(&mut self, http: reqwest::Client) {
        for client in &mut self.clients {
            client.set_http_client(http.clone());
        }
    }

    fn set_keep_alive(&mut self, enable: bool) {
        for client in &mut self.clients {
            client.set_keep_alive(enable);
        }
    }

    fn set_channel(&mut self, channel: String) {
        for client in &mut self.clients {
            client.set_channel(channel.clone());
        }
    }

    fn set_max_retries(&mut self, retries: usize) {
        for client in &mut self.clients {
            client.set_max_retries(retries);
        }
    }

    fn set_retry_interval(&mut self, interval: Duration) {
        for client in &mut self.clients {
            client.set_retry_interval(interval);
        }
    }

    fn set_max_content_length(&mut self, limit: usize) {
        for client in &mut self.clients {
            client.set_max_content_length(limit);
        }
    }

    fn set_compression(&mut self, compression: Compression) {
        for client in &mut self.clients {
            client.set_compression(compression);
        }
    }

    async fn write_event(&self, event: &Event) -> HecResult<()> {
        self.pick().write_event(event).await
    }

    async fn write_batch(&self, events: &[Event]) -> HecResult<()> {
        self.pick().write_batch(events).await
    }

    async fn write_raw(
        &self,
        reader: impl BufRead,
        metadata: Option<&EventMetadata>,
    ) -> HecResult<()> {
        self.pick().write_raw(reader, metadata).await
    }
}
