//! Per-day rollup state for merged weather records

use crate::types::{Metric, Timestamp, WeatherRecord};
use crate::{WeatherError, WeatherResult};
use serde::{Deserialize, Serialize};

/// Daily high and low of one metric, with the time each occurred
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extremes {
    pub high: f64,
    pub high_date: Timestamp,
    pub low: f64,
    pub low_date: Timestamp,
}

impl Extremes {
    pub fn seed(value: f64, date: Timestamp) -> Self {
        Self {
            high: value,
            high_date: date,
            low: value,
            low_date: date,
        }
    }

    /// Ties keep the extremum seen first
    pub fn observe(&mut self, value: f64, date: Timestamp) {
        if value > self.high {
            self.high = value;
            self.high_date = date;
        }
        if value < self.low {
            self.low = value;
            self.low_date = date;
        }
    }

    // Also rejects NaN extremes
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn check(&self, day: &str, metric: &'static str) -> WeatherResult<()> {
        if !(self.low <= self.high) {
            return Err(WeatherError::Consistency {
                day: day.to_string(),
                metric,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Aggregate of every record that fell on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub temp: Extremes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<Extremes>,
    pub wind_speed: Extremes,
    pub rain_amount: f64,
    /// Latest record of the day that carried rain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_date: Option<Timestamp>,
}

impl DaySummary {
    pub fn seed(record: &WeatherRecord) -> Self {
        Self {
            temp: Extremes::seed(record.temp, record.date),
            dew_point: record.dew_point.map(|dp| Extremes::seed(dp, record.date)),
            wind_speed: Extremes::seed(record.wind_speed, record.date),
            rain_amount: record.rain,
            rain_date: (record.rain > 0.0).then_some(record.date),
        }
    }

    pub fn absorb(&mut self, record: &WeatherRecord) {
        self.temp.observe(record.temp, record.date);
        self.wind_speed.observe(record.wind_speed, record.date);

        if let Some(dp) = record.dew_point {
            match self.dew_point.as_mut() {
                Some(extremes) => extremes.observe(dp, record.date),
                None => self.dew_point = Some(Extremes::seed(dp, record.date)),
            }
        }

        self.rain_amount += record.rain;
        if record.rain > 0.0 && self.rain_date.map_or(true, |d| record.date > d) {
            self.rain_date = Some(record.date);
        }
    }

    /// Fails when any tracked metric has `low > high`
    pub fn verify(&self, day: &str) -> WeatherResult<()> {
        self.temp.check(day, "temperature")?;
        self.wind_speed.check(day, "wind speed")?;
        if let Some(dp) = &self.dew_point {
            dp.check(day, "dew point")?;
        }
        Ok(())
    }

    /// The day's value for a reportable metric
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TempHigh => Some(self.temp.high),
            Metric::TempLow => Some(self.temp.low),
            Metric::DewPointHigh => self.dew_point.map(|dp| dp.high),
            Metric::DewPointLow => self.dew_point.map(|dp| dp.low),
            Metric::WindSpeedHigh => Some(self.wind_speed.high),
            Metric::RainAmount => Some(self.rain_amount),
        }
    }

    /// When the metric's value occurred
    pub fn occurred_at(&self, metric: Metric) -> Option<Timestamp> {
        match metric {
            Metric::TempHigh => Some(self.temp.high_date),
            Metric::TempLow => Some(self.temp.low_date),
            Metric::DewPointHigh => self.dew_point.map(|dp| dp.high_date),
            Metric::DewPointLow => self.dew_point.map(|dp| dp.low_date),
            Metric::WindSpeedHigh => Some(self.wind_speed.high_date),
            Metric::RainAmount => self.rain_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(date: Timestamp, temp: f64, rain: f64) -> WeatherRecord {
        WeatherRecord {
            rain,
            ..WeatherRecord::new(date, temp)
        }
    }

    #[test]
    fn test_extremes_track_high_and_low() {
        let mut ex = Extremes::seed(10.0, 1);
        ex.observe(5.0, 2);
        ex.observe(15.0, 3);
        assert_eq!(ex.high, 15.0);
        assert_eq!(ex.high_date, 3);
        assert_eq!(ex.low, 5.0);
        assert_eq!(ex.low_date, 2);
    }

    #[test]
    fn test_extremes_ties_keep_first() {
        let mut ex = Extremes::seed(10.0, 1);
        ex.observe(10.0, 2);
        assert_eq!(ex.high_date, 1);
        assert_eq!(ex.low_date, 1);
    }

    #[test]
    fn test_rain_accumulates() {
        let mut day = DaySummary::seed(&record(1, 10.0, 5.0));
        day.absorb(&record(2, 12.0, 0.0));
        day.absorb(&record(3, 11.0, 1.5));
        assert_eq!(day.rain_amount, 6.5);
        assert_eq!(day.rain_date, Some(3));
    }

    #[test]
    fn test_dew_point_seeded_by_first_carrier() {
        let mut day = DaySummary::seed(&record(1, 10.0, 0.0));
        assert_eq!(day.value(Metric::DewPointHigh), None);

        let mut humid = record(2, 12.0, 0.0);
        humid.dew_point = Some(8.0);
        day.absorb(&humid);
        assert_eq!(day.value(Metric::DewPointHigh), Some(8.0));
        assert_eq!(day.occurred_at(Metric::DewPointLow), Some(2));
    }

    #[test]
    fn test_verify_rejects_inverted_extremes() {
        let mut day = DaySummary::seed(&record(1, 10.0, 0.0));
        day.temp.low = 20.0;
        assert!(matches!(
            day.verify("2024-06-01"),
            Err(WeatherError::Consistency { metric: "temperature", .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_low_never_exceeds_high(
            temps in prop::collection::vec(-40.0f64..45.0, 1..64),
            winds in prop::collection::vec(0.0f64..40.0, 64),
        ) {
            let mut day = DaySummary::seed(&WeatherRecord {
                wind_speed: winds[0],
                ..WeatherRecord::new(0, temps[0])
            });
            for (i, temp) in temps.iter().enumerate().skip(1) {
                day.absorb(&WeatherRecord {
                    wind_speed: winds[i],
                    dew_point: Some(temp - 3.0),
                    ..WeatherRecord::new(i as Timestamp, *temp)
                });
            }
            prop_assert!(day.verify("2024-06-01").is_ok());
            prop_assert!(day.temp.low <= day.temp.high);
            prop_assert!(day.wind_speed.low <= day.wind_speed.high);
        }

        #[test]
        fn prop_rain_total_is_order_independent(
            mut rains in prop::collection::vec(0.0f64..50.0, 1..32),
        ) {
            let total = |rains: &[f64]| {
                let mut day = DaySummary::seed(&record(0, 10.0, rains[0]));
                for (i, rain) in rains.iter().enumerate().skip(1) {
                    day.absorb(&record(i as Timestamp, 10.0, *rain));
                }
                day.rain_amount
            };
            let forward = total(&rains);
            rains.reverse();
            let backward = total(&rains);
            prop_assert!((forward - backward).abs() < 1e-9);
        }
    }
}
