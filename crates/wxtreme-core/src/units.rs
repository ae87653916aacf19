//! Derived quantities and time conversions
//!
//! Dew point uses the Magnus approximation. Day keys are UTC calendar
//! dates; clock strings and day boundaries use the station's time zone.

use crate::{Timestamp, WeatherError, WeatherResult};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Magnus coefficients (a, b) over water, used at or above 0 °C
const MAGNUS_WATER: (f64, f64) = (17.62, 243.12);

/// Magnus coefficients (a, b) over ice, used below 0 °C
const MAGNUS_ICE: (f64, f64) = (22.46, 272.62);

/// Dew point in °C from temperature (°C) and relative humidity (%),
/// rounded to one decimal.
pub fn dew_point(temp_c: f64, relative_humidity: f64) -> WeatherResult<f64> {
    let in_domain = temp_c.is_finite()
        && relative_humidity.is_finite()
        && relative_humidity > 0.0
        && relative_humidity <= 100.0;
    if !in_domain {
        return Err(WeatherError::Range {
            temp: temp_c,
            humidity: relative_humidity,
        });
    }

    let (a, b) = if temp_c >= 0.0 { MAGNUS_WATER } else { MAGNUS_ICE };
    let gamma = (relative_humidity / 100.0).ln() + a * temp_c / (b + temp_c);
    Ok(round_tenth(b * gamma / (a - gamma)))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn to_utc(ms: Timestamp) -> WeatherResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| WeatherError::Parse(format!("timestamp out of range: {ms}")))
}

/// UTC calendar date (`YYYY-MM-DD`) of a timestamp
pub fn day_key(ms: Timestamp) -> WeatherResult<String> {
    Ok(to_utc(ms)?.format("%Y-%m-%d").to_string())
}

/// Local `HH:MM` of a timestamp; empty for a missing or zero timestamp
pub fn time_of_day(ms: Option<Timestamp>, tz: &Tz) -> String {
    match ms {
        Some(ms) if ms != 0 => to_utc(ms)
            .map(|dt| dt.with_timezone(tz).format("%H:%M").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Parse an RFC 3339 timestamp (or a bare `YYYY-MM-DD`, read as UTC midnight)
pub fn iso_to_epoch(iso: &str) -> WeatherResult<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Ok(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).timestamp_millis())
        .ok_or_else(|| WeatherError::Parse(format!("invalid ISO date string: {iso:?}")))
}

/// Start of the local day `day_offset` calendar days away from the local
/// date of `now`.
///
/// Zones that jump forward at midnight have no 00:00 on transition days;
/// the first hour that exists is used instead.
pub fn local_midnight(now: Timestamp, tz: &Tz, day_offset: i64) -> WeatherResult<Timestamp> {
    let today = to_utc(now)?.with_timezone(tz).date_naive();
    let day = today
        .checked_add_signed(Duration::days(day_offset))
        .ok_or_else(|| WeatherError::Parse(format!("day offset {day_offset} out of range")))?;

    (0..24)
        .filter_map(|hour| day.and_hms_opt(hour, 0, 0))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| WeatherError::Parse(format!("no local start of day on {day} in {tz}")))
}
