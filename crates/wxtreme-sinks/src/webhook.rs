use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use wxtreme_core::Publisher;

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Posts notifications to a chat webhook as `{"content": text}`
pub struct WebhookPublisher {
    client: Client,
    url: String,
}

impl WebhookPublisher {
    pub fn new(url: String) -> Result<Self> {
        if url.is_empty() {
            return Err(anyhow!("invalid webhook configuration"));
        }
        let client = Client::builder().build()?;
        Ok(Self { client, url })
    }
}

#[async_trait::async_trait]
impl Publisher for WebhookPublisher {
    async fn publish(&mut self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookMessage { content: text })
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("webhook post failed: {} {}", status, body));
        }
        info!(status = resp.status().as_u16(), "notification posted");
        Ok(())
    }
}
