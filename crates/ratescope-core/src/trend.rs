//! Linear trend fitting for occupancy forecasting.
//!
//! Ordinary least squares of daily count against day index, plus a short
//! forward extension of the fitted line. This replaces the original
//! workflow's off-the-shelf regression call; the math is the standard
//! closed-form fit.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fitted line `y = slope * x + intercept` with its goodness of fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearTrend {
    /// Least-squares fit over `(x, y)` points.
    ///
    /// Returns `None` with fewer than two points or when all x values
    /// coincide (vertical data has no slope).
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let n = points.len() as f64;
        if points.len() < 2 {
            return None;
        }

        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut ss_xx = 0.0;
        let mut ss_xy = 0.0;
        let mut ss_yy = 0.0;
        for (x, y) in points {
            let dx = x - mean_x;
            let dy = y - mean_y;
            ss_xx += dx * dx;
            ss_xy += dx * dy;
            ss_yy += dy * dy;
        }
        if ss_xx == 0.0 {
            return None;
        }

        let slope = ss_xy / ss_xx;
        let intercept = mean_y - slope * mean_x;
        // Flat data fits itself perfectly
        let r_squared = if ss_yy == 0.0 { 1.0 } else { (ss_xy * ss_xy) / (ss_xx * ss_yy) };

        Some(Self { slope, intercept, r_squared })
    }

    /// Value of the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// A trend fitted over daily counts, anchored at the first observed date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountForecast {
    /// Day zero of the fit
    pub origin: NaiveDate,
    pub trend: LinearTrend,
}

impl CountForecast {
    /// Fit daily counts against days-since-first-observation.
    pub fn fit(counts: &BTreeMap<NaiveDate, u64>) -> Option<Self> {
        let origin = *counts.keys().next()?;
        let points: Vec<(f64, f64)> = counts
            .iter()
            .map(|(date, count)| {
                let day = (*date - origin).num_days() as f64;
                (day, *count as f64)
            })
            .collect();
        LinearTrend::fit(&points).map(|trend| Self { origin, trend })
    }

    /// Fitted values from the origin through `extend_days` past the last
    /// observation, one point per day.
    pub fn projection(
        &self,
        counts: &BTreeMap<NaiveDate, u64>,
        extend_days: u64,
    ) -> Vec<(NaiveDate, f64)> {
        let Some(last) = counts.keys().next_back() else {
            return Vec::new();
        };
        let end = last
            .checked_add_days(Days::new(extend_days))
            .unwrap_or(*last);

        let mut projected = Vec::new();
        let mut date = self.origin;
        loop {
            let day = (date - self.origin).num_days() as f64;
            projected.push((date, self.trend.predict(day)));
            if date >= end {
                break;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fits_exact_line() {
        let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 3.0 + 2.0 * i as f64)).collect();
        let trend = LinearTrend::fit(&points).unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 3.0).abs() < 1e-12);
        assert!((trend.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn noisy_fit_has_partial_r_squared() {
        let points = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0)];
        let trend = LinearTrend::fit(&points).unwrap();
        assert!(trend.slope > 0.0);
        assert!(trend.r_squared > 0.0 && trend.r_squared < 1.0);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert_eq!(LinearTrend::fit(&[]), None);
        assert_eq!(LinearTrend::fit(&[(1.0, 2.0)]), None);
        assert_eq!(LinearTrend::fit(&[(1.0, 2.0), (1.0, 4.0)]), None);
    }

    #[test]
    fn count_forecast_extends_past_last_date() {
        let mut counts = BTreeMap::new();
        for day in 1..=5u32 {
            let date = NaiveDate::from_ymd_opt(2025, 7, day).unwrap();
            counts.insert(date, 10 + u64::from(day));
        }
        let forecast = CountForecast::fit(&counts).unwrap();
        assert!((forecast.trend.slope - 1.0).abs() < 1e-9);

        let projection = forecast.projection(&counts, 3);
        // 5 observed days plus 3 forecast days
        assert_eq!(projection.len(), 8);
        let (last_date, last_value) = projection.last().unwrap();
        assert_eq!(*last_date, NaiveDate::from_ymd_opt(2025, 7, 8).unwrap());
        assert!((last_value - 18.0).abs() < 1e-9);
    }
}
