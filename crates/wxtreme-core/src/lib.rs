//! Core data types, derived quantities, and daily rollups for wxtreme
//!
//! This crate provides the data model shared by the merge, aggregation,
//! threshold, and notification stages, plus the capability traits used to
//! plug in source fetching and publishing.

pub mod pipeline;
pub mod rollups;
pub mod sources;
pub mod types;
pub mod units;

pub use pipeline::*;
pub use rollups::*;
pub use sources::*;
pub use types::*;
pub use units::*;

use thiserror::Error;

/// Errors that abort a notification cycle
#[derive(Debug, Error, PartialEq)]
pub enum WeatherError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Dew point input out of range: temp={temp}, humidity={humidity}")]
    Range { temp: f64, humidity: f64 },

    #[error("Inconsistent {metric} data on {day}: low {low} > high {high}")]
    Consistency {
        day: String,
        metric: &'static str,
        low: f64,
        high: f64,
    },
}

pub type WeatherResult<T> = Result<T, WeatherError>;
