//! Occupancy counting.
//!
//! The number of rate rows observed for a check-in date is the analyst's
//! proxy for rooms still on sale that night. Counting ignores price validity
//! so unparseable rows still register as inventory.

use crate::RateRow;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Rate rows observed per check-in date, all hotels combined.
pub fn daily_counts(rows: &[RateRow]) -> BTreeMap<NaiveDate, u64> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.checkin_date).or_insert(0) += 1;
    }
    counts
}

/// Rows per check-in date, restricted to one occupancy.
///
/// The cross-hotel occupancy chart uses occupancy 2 so that hotels with
/// different room mixes stay comparable.
pub fn daily_counts_for_occupancy(rows: &[RateRow], occupancy: u32) -> BTreeMap<NaiveDate, u64> {
    let mut counts = BTreeMap::new();
    for row in rows.iter().filter(|r| r.occupancy == occupancy) {
        *counts.entry(row.checkin_date).or_insert(0) += 1;
    }
    counts
}

/// Per-hotel daily counts, keyed by hotel label.
pub fn counts_by_hotel(rows: &[RateRow]) -> BTreeMap<String, BTreeMap<NaiveDate, u64>> {
    let mut by_hotel: BTreeMap<String, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    for row in rows {
        *by_hotel
            .entry(row.hotel.clone())
            .or_default()
            .entry(row.checkin_date)
            .or_insert(0) += 1;
    }
    by_hotel
}
