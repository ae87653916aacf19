//! HTTP fetcher for the station and forecast endpoints

use crate::{IngestError, IngestResult};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;
use wxtreme_core::{SourceFetcher, SourceKind};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches every source with a plain GET and parses the body as JSON
pub struct HttpFetcher {
    client: Client,
    urls: HashMap<SourceKind, Url>,
}

impl HttpFetcher {
    /// Every source kind must have an endpoint.
    pub fn new<I>(urls: I) -> IngestResult<Self>
    where
        I: IntoIterator<Item = (SourceKind, Url)>,
    {
        let urls: HashMap<SourceKind, Url> = urls.into_iter().collect();
        if let Some(missing) = SourceKind::ALL.into_iter().find(|k| !urls.contains_key(k)) {
            return Err(IngestError::MissingSource(missing));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("wxtreme/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, urls })
    }

    pub fn url(&self, kind: SourceKind) -> Option<&Url> {
        self.urls.get(&kind)
    }

    async fn get(&self, kind: SourceKind) -> IngestResult<Value> {
        let url = self.url(kind).ok_or(IngestError::MissingSource(kind))?;
        debug!(source = %kind, %url, "fetching");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                kind,
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, kind: SourceKind) -> anyhow::Result<Value> {
        Ok(self.get(kind).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Vec<(SourceKind, Url)> {
        SourceKind::ALL
            .into_iter()
            .map(|kind| {
                let url = Url::parse(&format!("http://localhost:9/{kind}.json")).unwrap();
                (kind, url)
            })
            .collect()
    }

    #[test]
    fn test_requires_every_source() {
        let mut urls = endpoints();
        urls.retain(|(kind, _)| *kind != SourceKind::Humidity);
        assert!(matches!(
            HttpFetcher::new(urls),
            Err(IngestError::MissingSource(SourceKind::Humidity))
        ));
    }

    #[test]
    fn test_urls_by_kind() {
        let fetcher = HttpFetcher::new(endpoints()).unwrap();
        assert_eq!(
            fetcher.url(SourceKind::Forecast).map(Url::as_str),
            Some("http://localhost:9/forecast.json")
        );
    }
}
