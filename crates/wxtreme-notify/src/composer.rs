//! Situation selection and message rendering

use crate::templates::{LanguageTemplates, Situation, Tense};
use crate::tokens::{
    collapse_blank_lines, drop_unresolved_lines, filter_lines, substitute, Placeholder,
    TokenValues,
};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};
use wxtreme_core::{time_of_day, DaySummary, Metric, ThresholdSet, Timestamp, WeatherRecord};

/// Pick the situations today qualifies for, in message order.
///
/// Temperature yields at most one of both/hot/cold, falling back to wind.
/// Dew point and rain are judged independently of that outcome.
pub fn select(today: &DaySummary, thresholds: &ThresholdSet, now: Timestamp) -> Vec<(Situation, Tense)> {
    let tense = |date: Timestamp| if date < now { Tense::Past } else { Tense::Current };
    let mut picked = Vec::new();

    let hot = thresholds.temp.above(today.temp.high);
    let cold = thresholds.temp.below(today.temp.low);
    match (hot, cold) {
        (true, true) => picked.push((Situation::Both, Tense::Current)),
        (true, false) => picked.push((Situation::Hot, tense(today.temp.high_date))),
        (false, true) => picked.push((Situation::Cold, tense(today.temp.low_date))),
        (false, false) => {
            if thresholds.wind_speed.above(today.wind_speed.high) {
                picked.push((Situation::Wind, tense(today.wind_speed.high_date)));
            }
        }
    }

    if let Some(dp) = &today.dew_point {
        let humid = thresholds.dew_point.above(dp.high);
        let dry = thresholds.dew_point.below(dp.low);
        match (humid, dry) {
            (true, true) => picked.push((Situation::DewPointBoth, Tense::Current)),
            (true, false) => picked.push((Situation::Humid, tense(dp.high_date))),
            (false, true) => picked.push((Situation::Dry, tense(dp.low_date))),
            (false, false) => {}
        }
    }

    if thresholds.rain_exceeded(today.rain_amount) {
        let rain_tense = today.rain_date.map_or(Tense::Current, tense);
        picked.push((Situation::Rain, rain_tense));
    }

    picked
}

/// Renders notifications from one language's templates
#[derive(Debug, Clone)]
pub struct MessageComposer {
    templates: LanguageTemplates,
    enabled: BTreeSet<Metric>,
    tz: Tz,
    tag: String,
}

impl MessageComposer {
    pub fn new(
        templates: LanguageTemplates,
        enabled: BTreeSet<Metric>,
        tz: Tz,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            enabled,
            tz,
            tag: tag.into(),
        }
    }

    /// Compose today's notification, or `None` when nothing is extreme
    #[instrument(skip_all, fields(now = now))]
    pub fn compose(
        &self,
        today: &DaySummary,
        thresholds: &ThresholdSet,
        now: Timestamp,
        records: &[WeatherRecord],
    ) -> Option<String> {
        let situations = select(today, thresholds, now);
        if situations.is_empty() {
            debug!("no thresholds exceeded");
            return None;
        }
        info!(?situations, "situations selected");

        let values = self.values(today, now, records);
        let mut fragments = Vec::with_capacity(situations.len());
        for (situation, tense) in situations {
            let Some(template) = self.templates.get(situation, tense) else {
                warn!(?situation, ?tense, "no template for situation");
                continue;
            };
            match filter_lines(template, &self.enabled) {
                Some(filtered) => {
                    let resolved = drop_unresolved_lines(&filtered, &values);
                    fragments.push(substitute(&resolved, &values));
                }
                None => debug!(?situation, "situation suppressed by enabled metrics"),
            }
        }

        let body = collapse_blank_lines(&fragments.join("\n"));
        if body.is_empty() {
            return None;
        }
        if self.tag.is_empty() {
            Some(body)
        } else {
            Some(format!("{} {}", self.tag, body))
        }
    }

    fn values(&self, today: &DaySummary, now: Timestamp, records: &[WeatherRecord]) -> TokenValues {
        let clock = |date: Timestamp| time_of_day(Some(date), &self.tz);
        let mut values = TokenValues::new();

        values.insert(Placeholder::TemperatureHigh, number(today.temp.high));
        values.insert(Placeholder::TemperatureHighTime, clock(today.temp.high_date));
        values.insert(Placeholder::TemperatureLow, number(today.temp.low));
        values.insert(Placeholder::TemperatureLowTime, clock(today.temp.low_date));
        values.insert(Placeholder::WindSpeedHigh, format!("{:.1}", today.wind_speed.high));
        values.insert(Placeholder::WindSpeedHighTime, clock(today.wind_speed.high_date));
        values.insert(Placeholder::RainAmount, format!("{:.1}", today.rain_amount));

        if let Some(dp) = &today.dew_point {
            values.insert(Placeholder::DewPointHigh, number(dp.high));
            values.insert(Placeholder::DewPointHighTime, clock(dp.high_date));
            values.insert(Placeholder::DewPointLow, number(dp.low));
            values.insert(Placeholder::DewPointLowTime, clock(dp.low_date));
            if let Some(rh) = humidity_at(records, dp.high_date) {
                values.insert(Placeholder::HumidityAtDewPointHigh, number(rh));
            }
            if let Some(rh) = humidity_at(records, dp.low_date) {
                values.insert(Placeholder::HumidityAtDewPointLow, number(rh));
            }
        }

        let latest = records
            .iter()
            .filter(|r| r.date <= now && r.temp.is_finite())
            .max_by_key(|r| r.date);
        if let Some(record) = latest {
            values.insert(Placeholder::CurrentTemperature, number(record.temp));
        }

        values
    }
}

fn humidity_at(records: &[WeatherRecord], date: Timestamp) -> Option<f64> {
    records
        .iter()
        .find(|r| r.date == date)
        .and_then(|r| r.relative_humidity)
}

fn number(value: f64) -> String {
    format!("{}", value)
}
