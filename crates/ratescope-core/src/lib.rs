//! # ratescope-core
//!
//! Core domain model and rate-selection logic for the ratescope toolkit.
//!
//! This crate provides:
//! - Domain types: `RateRow`, `DailyRate`, `DaySelection`, `PricePoint`
//! - The cheapest-rate selector with its occupancy preference policy
//! - Cross-source merging of per-date results
//! - Period statistics, occupancy counting, and linear trend fitting
//!
//! The crate is pure computation: spreadsheet input lives in
//! `ratescope-ingest`, report output in `ratescope-render`.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use ratescope_core::{OccupancyPolicy, RateRow, select_range};
//!
//! let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
//! let rows = vec![
//!     RateRow::new(date, 2, Some(Decimal::from(120))).room_name("Deluxe Double"),
//!     RateRow::new(date, 2, Some(Decimal::from(95))).room_name("Standard Double"),
//! ];
//! let daily = select_range(&rows, &OccupancyPolicy::default());
//! assert_eq!(daily.len(), 1);
//! assert_eq!(daily[0].selection.price(), Some(Decimal::from(95)));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

pub mod occupancy;
pub mod price;
pub mod stats;
pub mod trend;

pub use price::clean_price;

// ============================================================================
// Domain Types
// ============================================================================

/// One offered rate for one check-in date and room configuration.
///
/// Rows are read-only once sourced; the selector never mutates them.
/// A row whose price could not be parsed carries `price: None` and is
/// excluded from selection, but still counts toward occupancy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    /// Check-in date (time component already dropped by the loader)
    pub checkin_date: NaiveDate,
    /// Guest count the rate is priced for
    pub occupancy: u32,
    /// Rate category; only [`RateRow::REGULAR`] rows are eligible
    pub rate_type: String,
    /// Nightly price; `None` when the source value was unparseable
    pub price: Option<Decimal>,
    /// Display name of the room / rate plan
    pub room_name: String,
    /// Carried through unchanged from the source
    pub breakfast_included: String,
    /// Carried through unchanged from the source
    pub refundable: String,
    /// Source label (hotel name or file stem)
    pub hotel: String,
}

impl RateRow {
    /// The only rate category eligible for selection.
    pub const REGULAR: &'static str = "Regular";

    /// Create a Regular-category row with the given date, occupancy and price.
    pub fn new(checkin_date: NaiveDate, occupancy: u32, price: Option<Decimal>) -> Self {
        Self {
            checkin_date,
            occupancy,
            rate_type: Self::REGULAR.into(),
            price,
            room_name: String::new(),
            breakfast_included: String::new(),
            refundable: String::new(),
            hotel: String::new(),
        }
    }

    /// Set the rate category
    pub fn rate_type(mut self, rate_type: impl Into<String>) -> Self {
        self.rate_type = rate_type.into();
        self
    }

    /// Set the room name
    pub fn room_name(mut self, name: impl Into<String>) -> Self {
        self.room_name = name.into();
        self
    }

    /// Set the breakfast flag
    pub fn breakfast(mut self, breakfast: impl Into<String>) -> Self {
        self.breakfast_included = breakfast.into();
        self
    }

    /// Set the refundability flag
    pub fn refundable(mut self, refundable: impl Into<String>) -> Self {
        self.refundable = refundable.into();
        self
    }

    /// Set the source hotel label
    pub fn hotel(mut self, hotel: impl Into<String>) -> Self {
        self.hotel = hotel.into();
        self
    }

    /// Whether this row can win a selection round
    pub fn is_eligible(&self) -> bool {
        self.rate_type == Self::REGULAR && self.price.is_some()
    }
}

/// The winning rate carried into a [`DailyRate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedRate {
    pub price: Decimal,
    pub room_name: String,
    pub occupancy: u32,
    pub breakfast_included: String,
    pub refundable: String,
}

impl SelectedRate {
    fn from_row(row: &RateRow, price: Decimal) -> Self {
        Self {
            price,
            room_name: row.room_name.clone(),
            occupancy: row.occupancy,
            breakfast_included: row.breakfast_included.clone(),
            refundable: row.refundable.clone(),
        }
    }
}

/// Outcome of selection for one calendar date.
///
/// Source exports overload a numeric price column with the string
/// "Sold Out"; here the absence of an eligible rate is a variant, and the
/// sentinel strings exist only in the renderers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DaySelection {
    Selected(SelectedRate),
    SoldOut,
}

impl DaySelection {
    /// Winning price, if any
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Self::Selected(rate) => Some(rate.price),
            Self::SoldOut => None,
        }
    }

    pub fn is_sold_out(&self) -> bool {
        matches!(self, Self::SoldOut)
    }

    /// Merge comparison: lowest price wins, Sold Out compares as infinite.
    /// Equal prices keep the incumbent (first source seen wins).
    fn beats(&self, other: &Self) -> bool {
        match (self.price(), other.price()) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// One row of selection output: a calendar date and its winning rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyRate {
    pub date: NaiveDate,
    pub selection: DaySelection,
}

/// One cleaned price observation from a detailed-prices export.
///
/// The comparison flow works on these rather than full [`RateRow`]s: the
/// exports it reads are already one-winner-per-date tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub hotel: String,
    pub price: Decimal,
}

// ============================================================================
// Occupancy Preference Policy
// ============================================================================

/// Ordered occupancy preference for rate selection.
///
/// Business policy constant: double occupancy is the comparison basis, single
/// occupancy is the last resort. Kept as explicit configuration so it can be
/// tested and changed without touching the selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyPolicy {
    order: Vec<u32>,
}

impl Default for OccupancyPolicy {
    fn default() -> Self {
        Self { order: vec![2, 3, 4, 5, 1] }
    }
}

impl OccupancyPolicy {
    /// Create a policy with a custom preference order
    pub fn new(order: impl Into<Vec<u32>>) -> Self {
        Self { order: order.into() }
    }

    /// Preference order, most preferred first
    pub fn order(&self) -> &[u32] {
        &self.order
    }
}

// ============================================================================
// Cheapest-Rate Selector
// ============================================================================

/// Select the winning rate for one target date.
///
/// Walks the occupancy preference order; at the first occupancy with at
/// least one eligible row (Regular category, parseable price, matching
/// date), returns the minimum-price row. Ties keep the first row in input
/// order. No eligible row at any occupancy yields [`DaySelection::SoldOut`].
///
/// Pure function of `(rows, date, policy)`.
pub fn select_for_date(
    rows: &[RateRow],
    date: NaiveDate,
    policy: &OccupancyPolicy,
) -> DaySelection {
    for &occupancy in policy.order() {
        let mut best: Option<(&RateRow, Decimal)> = None;
        for row in rows {
            if row.checkin_date != date
                || row.occupancy != occupancy
                || row.rate_type != RateRow::REGULAR
            {
                continue;
            }
            // Unparseable prices are ineligible, not winning
            let Some(price) = row.price else { continue };
            match best {
                Some((_, current)) if current <= price => {}
                _ => best = Some((row, price)),
            }
        }
        if let Some((row, price)) = best {
            return DaySelection::Selected(SelectedRate::from_row(row, price));
        }
    }
    DaySelection::SoldOut
}

/// Select a winner for every date in the observed range.
///
/// The range is the full inclusive span from the minimum to the maximum
/// `checkin_date` in `rows`; dates with no matching rows still produce a
/// Sold Out entry rather than being omitted. Empty input yields an empty
/// result.
pub fn select_range(rows: &[RateRow], policy: &OccupancyPolicy) -> Vec<DailyRate> {
    let Some(start) = rows.iter().map(|r| r.checkin_date).min() else {
        return Vec::new();
    };
    let end = rows
        .iter()
        .map(|r| r.checkin_date)
        .max()
        .unwrap_or(start);

    let mut daily = Vec::new();
    let mut date = start;
    loop {
        daily.push(DailyRate {
            date,
            selection: select_for_date(rows, date, policy),
        });
        if date >= end {
            break;
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    daily
}

// ============================================================================
// Cross-Source Merge
// ============================================================================

/// Merge per-date results from multiple sources into one table keyed by date.
///
/// Where sources overlap on a date, the lowest price wins; Sold Out never
/// wins against a real price. The comparison is explicit rather than
/// last-write-wins, so overlapping file coverage merges correctly regardless
/// of input order. Output is sorted by date ascending.
pub fn merge_cheapest<I>(rates: I) -> Vec<DailyRate>
where
    I: IntoIterator<Item = DailyRate>,
{
    let mut by_date: BTreeMap<NaiveDate, DaySelection> = BTreeMap::new();
    for rate in rates {
        match by_date.entry(rate.date) {
            Entry::Vacant(slot) => {
                slot.insert(rate.selection);
            }
            Entry::Occupied(mut slot) => {
                if rate.selection.beats(slot.get()) {
                    slot.insert(rate.selection);
                }
            }
        }
    }
    by_date
        .into_iter()
        .map(|(date, selection)| DailyRate { date, selection })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
