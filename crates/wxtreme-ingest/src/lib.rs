//! Upstream source retrieval
//!
//! Fetches the station and forecast feeds concurrently and decodes their
//! raw JSON into the typed series the merge pass consumes.

pub mod fixture;
pub mod http;
pub mod payload;

pub use fixture::*;
pub use http::*;
pub use payload::*;

use anyhow::Context;
use thiserror::Error;
use tracing::{info, instrument};
use wxtreme_core::{SourceBundle, SourceFetcher, SourceKind};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{kind} source returned status {status}")]
    Status { kind: SourceKind, status: u16 },

    #[error("Invalid {kind} payload: {message}")]
    Decode { kind: SourceKind, message: String },

    #[error("No {0} source configured")]
    MissingSource(SourceKind),

    #[error("Fixture error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Fetch every source concurrently and decode them.
///
/// Any failed fetch or decode fails the whole bundle.
#[instrument(skip(fetcher))]
pub async fn fetch_all<F>(fetcher: &F) -> anyhow::Result<SourceBundle>
where
    F: SourceFetcher + ?Sized,
{
    let (temperature, rain, humidity, wind, forecast) = tokio::try_join!(
        fetch(fetcher, SourceKind::Temperature),
        fetch(fetcher, SourceKind::Rain),
        fetch(fetcher, SourceKind::Humidity),
        fetch(fetcher, SourceKind::Wind),
        fetch(fetcher, SourceKind::Forecast),
    )?;

    let bundle = SourceBundle {
        temperature: decode_station(SourceKind::Temperature, temperature)?,
        rain: decode_station(SourceKind::Rain, rain)?,
        humidity: decode_station(SourceKind::Humidity, humidity)?,
        wind: decode_station(SourceKind::Wind, wind)?,
        forecast: decode_forecast(forecast)?,
    };
    info!(
        temperature = bundle.temperature.len(),
        rain = bundle.rain.len(),
        humidity = bundle.humidity.len(),
        wind = bundle.wind.len(),
        forecast = bundle.forecast.len(),
        "sources fetched"
    );
    Ok(bundle)
}

async fn fetch<F>(fetcher: &F, kind: SourceKind) -> anyhow::Result<serde_json::Value>
where
    F: SourceFetcher + ?Sized,
{
    fetcher
        .fetch(kind)
        .await
        .with_context(|| format!("Failed to fetch {kind} source"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_fixture() -> FixtureFetcher {
        FixtureFetcher::new()
            .with(
                SourceKind::Temperature,
                json!({"value": [{"date": 1000, "value": "12.5"}, {"date": 2000, "value": 14.0}]}),
            )
            .with(SourceKind::Rain, json!({"value": [{"date": 1000, "value": 0.4}]}))
            .with(SourceKind::Humidity, json!({"value": []}))
            .with(SourceKind::Wind, json!({"value": null}))
            .with(
                SourceKind::Forecast,
                json!({"timeSeries": [{"validTime": "2024-06-01T12:00:00Z", "parameters": []}]}),
            )
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_every_source() {
        let bundle = fetch_all(&complete_fixture()).await.unwrap();
        assert_eq!(bundle.temperature.len(), 2);
        assert_eq!(bundle.temperature[0].value, 12.5);
        assert_eq!(bundle.rain.len(), 1);
        assert!(bundle.humidity.is_empty());
        assert!(bundle.wind.is_empty());
        assert_eq!(bundle.forecast.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_source_fails_bundle() {
        let fetcher = FixtureFetcher::new().with(SourceKind::Temperature, json!({"value": []}));
        let err = fetch_all(&fetcher).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to fetch"));
    }
}
