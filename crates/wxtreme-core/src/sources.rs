//! Decoded upstream series, as handed to the merge pass

use crate::types::{Observation, ObservationValue};
use serde::{Deserialize, Serialize};

/// One named forecast parameter; only the first value is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParameter {
    pub name: String,
    #[serde(default)]
    pub values: Vec<ObservationValue>,
}

/// A time-stamped bundle of forecast parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    pub valid_time: String,
    #[serde(default)]
    pub parameters: Vec<ForecastParameter>,
}

impl ForecastEntry {
    /// First numeric value of the named parameter
    pub fn param(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.values.first())
            .and_then(ObservationValue::as_f64)
    }
}

/// Every source a merge pass consumes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBundle {
    pub temperature: Vec<Observation>,
    pub rain: Vec<Observation>,
    pub humidity: Vec<Observation>,
    pub wind: Vec<Observation>,
    pub forecast: Vec<ForecastEntry>,
}
