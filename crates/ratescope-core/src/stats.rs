//! Period statistics over price observations.
//!
//! The comparison flow reduces many hotels' detailed exports to two series
//! (subject and competitors), summarized per period and per date. All
//! statistics run on `f64`; prices convert from `Decimal` at this boundary.

use crate::PricePoint;
use chrono::{Days, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for a set of price observations.
///
/// All fields are `None` for an empty set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
}

impl PeriodStats {
    /// Compute statistics over the given observations.
    pub fn from_points(points: &[PricePoint]) -> Self {
        let mut values: Vec<f64> = points
            .iter()
            .filter_map(|p| p.price.to_f64())
            .collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = values.len();
        if count == 0 {
            return Self { count: 0, mean: None, min: None, max: None, median: None };
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            values[count / 2]
        } else {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        };

        Self {
            count,
            mean: Some(mean),
            min: values.first().copied(),
            max: values.last().copied(),
            median: Some(median),
        }
    }
}

/// Per-date median price across hotels: the comparison chart series.
pub fn median_by_date(points: &[PricePoint]) -> BTreeMap<NaiveDate, f64> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for point in points {
        if let Some(value) = point.price.to_f64() {
            by_date.entry(point.date).or_default().push(value);
        }
    }

    by_date
        .into_iter()
        .map(|(date, mut values)| {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = values.len();
            let median = if n % 2 == 1 {
                values[n / 2]
            } else {
                (values[n / 2 - 1] + values[n / 2]) / 2.0
            };
            (date, median)
        })
        .collect()
}

/// Per-date statistics, one [`PeriodStats`] per observed date.
///
/// Feeds the row-per-date comparison report.
pub fn daily_stats(points: &[PricePoint]) -> BTreeMap<NaiveDate, PeriodStats> {
    let mut by_date: BTreeMap<NaiveDate, Vec<PricePoint>> = BTreeMap::new();
    for point in points {
        by_date.entry(point.date).or_default().push(point.clone());
    }
    by_date
        .into_iter()
        .map(|(date, day_points)| (date, PeriodStats::from_points(&day_points)))
        .collect()
}

/// Percentage difference of `subject` relative to `reference`.
///
/// `None` when the reference is zero (no meaningful ratio).
pub fn percent_difference(subject: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        None
    } else {
        Some((subject - reference) / reference * 100.0)
    }
}

/// Keep only observations in the trailing window of `days` days ending at
/// the latest observed date. Empty input stays empty.
pub fn trailing_window(points: &[PricePoint], days: u64) -> Vec<PricePoint> {
    let Some(end) = points.iter().map(|p| p.date).max() else {
        return Vec::new();
    };
    let start = end
        .checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN);
    points
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn point(day: u32, price: i64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2025, 7, day).unwrap(),
            hotel: "H".into(),
            price: Decimal::from(price),
        }
    }

    #[test]
    fn stats_over_known_values() {
        let points = vec![point(1, 100), point(2, 200), point(3, 300), point(4, 400)];
        let stats = PeriodStats::from_points(&points);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(250.0));
        assert_eq!(stats.min, Some(100.0));
        assert_eq!(stats.max, Some(400.0));
        assert_eq!(stats.median, Some(250.0));
    }

    #[test]
    fn odd_count_median_is_middle_value() {
        let points = vec![point(1, 10), point(2, 90), point(3, 20)];
        let stats = PeriodStats::from_points(&points);
        assert_eq!(stats.median, Some(20.0));
    }

    #[test]
    fn empty_set_is_all_none() {
        let stats = PeriodStats::from_points(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.median, None);
    }

    #[test]
    fn median_by_date_groups_across_hotels() {
        let mut a = point(1, 100);
        a.hotel = "A".into();
        let mut b = point(1, 300);
        b.hotel = "B".into();
        let medians = median_by_date(&[a, b, point(2, 50)]);
        assert_eq!(medians.len(), 2);
        assert_eq!(medians[&NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()], 200.0);
        assert_eq!(medians[&NaiveDate::from_ymd_opt(2025, 7, 2).unwrap()], 50.0);
    }

    #[test]
    fn percent_difference_against_zero_is_none() {
        assert_eq!(percent_difference(120.0, 100.0), Some(20.0));
        assert_eq!(percent_difference(80.0, 100.0), Some(-20.0));
        assert_eq!(percent_difference(10.0, 0.0), None);
    }

    #[test]
    fn trailing_window_keeps_recent_dates() {
        let points = vec![point(1, 100), point(10, 110), point(20, 120)];
        let window = trailing_window(&points, 10);
        let dates: Vec<NaiveDate> = window.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 20).unwrap(),
            ]
        );
    }
}
