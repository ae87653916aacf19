//! Joins station and forecast series into unified weather records

use std::collections::HashMap;
use tracing::{debug, instrument};
use wxtreme_core::{
    dew_point, iso_to_epoch, ForecastEntry, Observation, SourceBundle, Timestamp, WeatherRecord,
    WeatherResult,
};

/// Merge every source into one record sequence.
///
/// Station series are joined onto the temperature series by exact
/// timestamp; unmatched rain/humidity/wind points are dropped. Forecast
/// entries valid up to `forecast_cutoff` are appended as records of their
/// own.
#[instrument(skip(sources), fields(temperature = sources.temperature.len()))]
pub fn merge(
    sources: &SourceBundle,
    forecast_cutoff: Timestamp,
) -> WeatherResult<Vec<WeatherRecord>> {
    let mut records: Vec<WeatherRecord> = sources
        .temperature
        .iter()
        .map(|obs| WeatherRecord::new(obs.date, obs.value))
        .collect();

    // Later duplicates win the lookup
    let index: HashMap<Timestamp, usize> = records
        .iter()
        .enumerate()
        .map(|(i, record)| (record.date, i))
        .collect();

    let dropped_rain = join(&mut records, &index, &sources.rain, |r, v| r.rain = v);
    let dropped_wind = join(&mut records, &index, &sources.wind, |r, v| r.wind_speed = v);
    let with_dew_point = attach_dew_points(&mut records, &sources.humidity)?;
    debug!(
        dropped_rain,
        dropped_wind, with_dew_point, "station series merged"
    );

    let mut appended = 0;
    for entry in &sources.forecast {
        if let Some(record) = forecast_record(entry, forecast_cutoff)? {
            records.push(record);
            appended += 1;
        }
    }
    debug!(appended, total = records.len(), "forecast entries appended");

    Ok(records)
}

/// Copies matching observations onto records; returns how many were dropped
fn join<F>(
    records: &mut [WeatherRecord],
    index: &HashMap<Timestamp, usize>,
    series: &[Observation],
    mut apply: F,
) -> usize
where
    F: FnMut(&mut WeatherRecord, f64),
{
    let mut dropped = 0;
    for obs in series {
        match index.get(&obs.date) {
            Some(&i) if obs.value.is_finite() => apply(&mut records[i], obs.value),
            _ => dropped += 1,
        }
    }
    dropped
}

fn attach_dew_points(
    records: &mut [WeatherRecord],
    humidity: &[Observation],
) -> WeatherResult<usize> {
    let by_date: HashMap<Timestamp, f64> =
        humidity.iter().map(|obs| (obs.date, obs.value)).collect();

    let mut attached = 0;
    for record in records.iter_mut() {
        // Non-finite temperatures are discarded during aggregation
        if !record.temp.is_finite() {
            continue;
        }
        let Some(&rh) = by_date.get(&record.date) else {
            continue;
        };
        record.dew_point = Some(dew_point(record.temp, rh)?);
        record.relative_humidity = Some(rh);
        attached += 1;
    }
    Ok(attached)
}

fn forecast_record(
    entry: &ForecastEntry,
    cutoff: Timestamp,
) -> WeatherResult<Option<WeatherRecord>> {
    let date = iso_to_epoch(&entry.valid_time)?;
    if date > cutoff {
        return Ok(None);
    }
    let (Some(temp), Some(rain)) = (entry.param("t"), entry.param("pmedian")) else {
        return Ok(None);
    };

    let relative_humidity = entry.param("r");
    let dew_point = relative_humidity
        .map(|rh| dew_point(temp, rh))
        .transpose()?;

    Ok(Some(WeatherRecord {
        date,
        temp,
        rain,
        wind_speed: entry.param("ws").unwrap_or(0.0),
        dew_point,
        relative_humidity,
    }))
}
