//! Raw payload decoding for station and forecast feeds

use crate::{IngestError, IngestResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use wxtreme_core::{ForecastEntry, Observation, ObservationValue, SourceKind, Timestamp};

#[derive(Debug, Deserialize)]
struct StationPoint {
    date: Timestamp,
    #[serde(default)]
    value: Option<ObservationValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastPayload {
    #[serde(default)]
    time_series: Vec<ForecastEntry>,
}

/// Decode a station feed shaped `{"value": [{"date": ms, "value": v}, ...]}`.
///
/// A missing or non-array `value` is an empty series. Values that are not
/// numeric become NaN and are left for the merge pass to drop.
pub fn decode_station(kind: SourceKind, payload: Value) -> IngestResult<Vec<Observation>> {
    let points = match payload {
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Array(points)) => points,
            _ => {
                warn!(source = %kind, "station payload has no value array");
                return Ok(Vec::new());
            }
        },
        _ => {
            return Err(IngestError::Decode {
                kind,
                message: "expected a JSON object".to_string(),
            })
        }
    };

    points
        .into_iter()
        .map(|point| {
            let point: StationPoint =
                serde_json::from_value(point).map_err(|e| IngestError::Decode {
                    kind,
                    message: e.to_string(),
                })?;
            let value = point.value.map_or(f64::NAN, |v| v.coerce());
            Ok(Observation::new(point.date, value))
        })
        .collect()
}

/// Decode a forecast feed shaped `{"timeSeries": [...]}`
pub fn decode_forecast(payload: Value) -> IngestResult<Vec<ForecastEntry>> {
    let decoded: ForecastPayload =
        serde_json::from_value(payload).map_err(|e| IngestError::Decode {
            kind: SourceKind::Forecast,
            message: e.to_string(),
        })?;
    Ok(decoded.time_series)
}
