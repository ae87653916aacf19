//! Core data types for merged weather observations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type (Unix epoch milliseconds)
pub type Timestamp = i64;

/// A single point from one station source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: Timestamp,
    pub value: f64,
}

impl Observation {
    pub fn new(date: Timestamp, value: f64) -> Self {
        Self { date, value }
    }
}

/// An observation value as delivered upstream (number, numeric string, or null)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ObservationValue {
    Float(f64),
    Integer(i64),
    String(String),
    Null,
}

impl ObservationValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ObservationValue::Float(v) => Some(*v),
            ObservationValue::Integer(v) => Some(*v as f64),
            ObservationValue::String(s) => s.trim().parse().ok().filter(|v: &f64| v.is_finite()),
            ObservationValue::Null => None,
        }
    }

    /// Numeric value, or NaN when the payload is not a number
    pub fn coerce(&self) -> f64 {
        self.as_f64().unwrap_or(f64::NAN)
    }
}

/// Unified per-timestamp record produced by the merge pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub date: Timestamp,
    pub temp: f64,
    pub rain: f64,
    pub wind_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_humidity: Option<f64>,
}

impl WeatherRecord {
    /// Record with only a temperature; rain and wind default to zero
    pub fn new(date: Timestamp, temp: f64) -> Self {
        Self {
            date,
            temp,
            rain: 0.0,
            wind_speed: 0.0,
            dew_point: None,
            relative_humidity: None,
        }
    }
}

/// The upstream feeds a cycle reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Temperature,
    Rain,
    Humidity,
    Wind,
    Forecast,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Temperature,
        SourceKind::Rain,
        SourceKind::Humidity,
        SourceKind::Wind,
        SourceKind::Forecast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Temperature => "temperature",
            SourceKind::Rain => "rain",
            SourceKind::Humidity => "humidity",
            SourceKind::Wind => "wind",
            SourceKind::Forecast => "forecast",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reportable daily value, used to enable or suppress message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    TempHigh,
    TempLow,
    DewPointHigh,
    DewPointLow,
    WindSpeedHigh,
    RainAmount,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::TempHigh,
        Metric::TempLow,
        Metric::DewPointHigh,
        Metric::DewPointLow,
        Metric::WindSpeedHigh,
        Metric::RainAmount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::TempHigh => "tempHigh",
            Metric::TempLow => "tempLow",
            Metric::DewPointHigh => "dewPointHigh",
            Metric::DewPointLow => "dewPointLow",
            Metric::WindSpeedHigh => "windSpeedHigh",
            Metric::RainAmount => "rainAmount",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| format!("unknown metric: {s}"))
    }
}

/// Low/high percentile cutoffs for one metric; `None` never triggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Band {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl Band {
    pub fn above(&self, value: f64) -> bool {
        self.high.is_some_and(|t| value > t)
    }

    pub fn below(&self, value: f64) -> bool {
        self.low.is_some_and(|t| value < t)
    }
}

/// Extreme thresholds for the current window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ThresholdSet {
    pub temp: Band,
    pub dew_point: Band,
    pub wind_speed: Band,
    pub rain: Option<f64>,
}

impl ThresholdSet {
    pub fn rain_exceeded(&self, amount: f64) -> bool {
        self.rain.is_some_and(|t| amount > t)
    }
}
