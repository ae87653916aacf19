use anyhow::Result;

use crate::SourceKind;

/// Retrieves the raw JSON payload of one upstream source
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, source: SourceKind) -> Result<serde_json::Value>;
}

/// Delivers a composed notification
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&mut self, text: &str) -> Result<()>;
}
