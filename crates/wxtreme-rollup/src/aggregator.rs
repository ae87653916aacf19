//! Rolling-window aggregation of merged records into daily summaries

use chrono_tz::Tz;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use wxtreme_core::{day_key, local_midnight, DaySummary, Timestamp, WeatherRecord, WeatherResult};

/// Daily summaries keyed by UTC day key, in calendar order
pub type DayMap = BTreeMap<String, DaySummary>;

/// Reduce records at or after `window_start` into one summary per day.
///
/// Records with a non-finite temperature are skipped. A day whose low
/// ends up above its high aborts the whole aggregation.
#[instrument(skip(records), fields(records = records.len()))]
pub fn aggregate(records: &[WeatherRecord], window_start: Timestamp) -> WeatherResult<DayMap> {
    let mut days = DayMap::new();
    let mut outside = 0usize;
    let mut malformed = 0usize;

    for record in records {
        if record.date < window_start {
            outside += 1;
            continue;
        }
        if !record.temp.is_finite() {
            malformed += 1;
            continue;
        }

        match days.entry(day_key(record.date)?) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().absorb(record);
                entry.get().verify(entry.key())?;
            }
            Entry::Vacant(entry) => {
                entry.insert(DaySummary::seed(record));
            }
        }
    }

    debug!(days = days.len(), outside, malformed, "records aggregated");
    Ok(days)
}

/// Trailing calendar-day window anchored on the station's local date
#[derive(Debug, Clone, Copy)]
pub struct RollingWindow {
    days: u32,
    tz: Tz,
}

impl RollingWindow {
    pub fn new(days: u32, tz: Tz) -> Self {
        Self { days, tz }
    }

    /// Local midnight `days` calendar days before the local date of `now`
    pub fn start(&self, now: Timestamp) -> WeatherResult<Timestamp> {
        local_midnight(now, &self.tz, -i64::from(self.days))
    }

    /// Local midnight at the start of tomorrow; later forecasts are ignored
    pub fn forecast_cutoff(&self, now: Timestamp) -> WeatherResult<Timestamp> {
        local_midnight(now, &self.tz, 1)
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}
