//! Percentile cutoffs over the days of the window

use tracing::debug;
use wxtreme_core::{Band, DaySummary, ThresholdSet};

/// Compute the extreme thresholds for a set of daily summaries.
///
/// `percentile` sets how far into each tail a day must fall to count as
/// extreme. Rain uses twice the percentile against the upper tail, and
/// days without rain do not take part in the rain distribution.
pub fn estimate<'a, I>(summaries: I, percentile: f64) -> ThresholdSet
where
    I: IntoIterator<Item = &'a DaySummary>,
{
    let mut series = Series::default();
    for day in summaries {
        series.push(day);
    }
    series.sort();

    let thresholds = ThresholdSet {
        temp: band(&series.temp_lows, &series.temp_highs, percentile),
        dew_point: band(&series.dew_lows, &series.dew_highs, percentile),
        wind_speed: band(&series.wind_lows, &series.wind_highs, percentile),
        rain: upper_cutoff(&series.rain, percentile * 2.0),
    };
    debug!(?thresholds, days = series.temp_highs.len(), "thresholds estimated");
    thresholds
}

#[derive(Default)]
struct Series {
    temp_lows: Vec<f64>,
    temp_highs: Vec<f64>,
    dew_lows: Vec<f64>,
    dew_highs: Vec<f64>,
    wind_lows: Vec<f64>,
    wind_highs: Vec<f64>,
    rain: Vec<f64>,
}

impl Series {
    fn push(&mut self, day: &DaySummary) {
        push_finite(&mut self.temp_lows, day.temp.low);
        push_finite(&mut self.temp_highs, day.temp.high);
        if let Some(dp) = &day.dew_point {
            push_finite(&mut self.dew_lows, dp.low);
            push_finite(&mut self.dew_highs, dp.high);
        }
        push_finite(&mut self.wind_lows, day.wind_speed.low);
        push_finite(&mut self.wind_highs, day.wind_speed.high);
        if day.rain_amount > 0.0 {
            push_finite(&mut self.rain, day.rain_amount);
        }
    }

    fn sort(&mut self) {
        for values in [
            &mut self.temp_lows,
            &mut self.temp_highs,
            &mut self.dew_lows,
            &mut self.dew_highs,
            &mut self.wind_lows,
            &mut self.wind_highs,
            &mut self.rain,
        ] {
            values.sort_by(f64::total_cmp);
        }
    }
}

fn push_finite(values: &mut Vec<f64>, value: f64) {
    if value.is_finite() {
        values.push(value);
    }
}

fn band(lows: &[f64], highs: &[f64], percentile: f64) -> Band {
    Band {
        low: lower_cutoff(lows, percentile),
        high: upper_cutoff(highs, percentile),
    }
}

/// Value at `floor(n * p / 100)`, clamped to the last element
fn lower_cutoff(sorted: &[f64], percentile: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let index = (n as f64 * percentile / 100.0).floor().max(0.0) as usize;
    sorted.get(index.min(n - 1)).copied()
}

/// Value at `floor(n * (1 - p / 100))`, clamped to zero; `None` past the end
fn upper_cutoff(sorted: &[f64], percentile: f64) -> Option<f64> {
    let n = sorted.len();
    let index = (n as f64 * (1.0 - percentile / 100.0)).floor().max(0.0) as usize;
    sorted.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wxtreme_core::{Extremes, Timestamp};

    fn day(low: f64, high: f64, rain: f64) -> DaySummary {
        let date: Timestamp = 0;
        DaySummary {
            temp: Extremes {
                high,
                high_date: date,
                low,
                low_date: date,
            },
            dew_point: None,
            wind_speed: Extremes::seed(3.0, date),
            rain_amount: rain,
            rain_date: None,
        }
    }

    #[test]
    fn test_cutoff_indices() {
        let days: Vec<DaySummary> = (0..10)
            .map(|i| day(i as f64, 10.0 + i as f64, 0.0))
            .collect();
        let t = estimate(&days, 20.0);

        // lows 0..9 -> index 2; highs 10..19 -> index 8
        assert_eq!(t.temp.low, Some(2.0));
        assert_eq!(t.temp.high, Some(18.0));
        assert_eq!(t.wind_speed.high, Some(3.0));
        assert_eq!(t.dew_point, Band::default());
    }

    #[test]
    fn test_rain_uses_doubled_percentile() {
        let days: Vec<DaySummary> = (1..=10).map(|i| day(0.5, 5.0, i as f64)).collect();
        let t = estimate(&days, 20.0);
        // n * (1 - 0.4) = 6
        assert_eq!(t.rain, Some(7.0));
    }

    #[test]
    fn test_dry_days_excluded_from_rain() {
        let days = vec![day(1.0, 5.0, 0.0), day(1.0, 5.0, 0.0), day(1.0, 5.0, 2.0)];
        assert_eq!(estimate(&days, 20.0).rain, Some(2.0));
    }

    #[test]
    fn test_zero_degree_days_count() {
        let days = vec![day(0.0, 4.0, 0.0), day(-3.0, 2.0, 0.0)];
        let t = estimate(&days, 20.0);
        assert_eq!(t.temp.low, Some(-3.0));
        assert_eq!(t.temp.high, Some(4.0));
    }

    #[test]
    fn test_empty_window_has_no_thresholds() {
        let t = estimate(&Vec::<DaySummary>::new(), 20.0);
        assert_eq!(t, ThresholdSet::default());
    }

    #[test]
    fn test_single_day_degenerates() {
        let t = estimate(&[day(2.0, 9.0, 1.0)], 20.0);
        assert_eq!(t.temp.low, Some(2.0));
        assert_eq!(t.temp.high, Some(9.0));
        assert_eq!(t.rain, Some(1.0));
    }

    proptest! {
        #[test]
        fn prop_cutoffs_move_inward_with_percentile(
            values in prop::collection::vec(-30.0f64..40.0, 1..40),
            p in 1.0f64..49.0,
            step in 0.0f64..1.0,
        ) {
            let days: Vec<DaySummary> = values.iter().map(|v| day(*v, *v + 5.0, 0.0)).collect();
            let narrow = estimate(&days, p);
            let wide = estimate(&days, p + step);

            prop_assert!(wide.temp.low.unwrap() >= narrow.temp.low.unwrap());
            prop_assert!(wide.temp.high.unwrap() <= narrow.temp.high.unwrap());
        }
    }
}
