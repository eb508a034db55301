//! Workbook loading via calamine.
//!
//! Exports do not promise a sheet name, so loaders scan every sheet and use
//! the first one whose header row carries the required columns. Cell
//! handling is tolerant: dates arrive as Excel serials or ISO text, prices
//! as numbers or quote-prefixed text. A row with an unusable price is kept
//! with `price: None`; a row with an unusable date is dropped with a warning.

use crate::IngestError;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use ratescope_core::{clean_price, PricePoint, RateRow};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Columns a raw scraper export must carry.
const RATE_COLUMNS: &[&str] = &[
    "checkin_date",
    "price",
    "occupancy",
    "breakfast_included",
    "hotel_name",
    "refundable",
    "name",
    "type",
];

/// Columns a reduced export must carry for occupancy counting.
const CHECKIN_COLUMNS: &[&str] = &["checkin_date", "price", "occupancy"];

/// Columns a detailed-prices report must carry.
const PRICE_COLUMNS: &[&str] = &["date", "price"];

/// A loaded raw export: the rate rows plus the hotel name the file claims.
#[derive(Clone, Debug)]
pub struct RateTable {
    /// Hotel name from the `hotel_name` column, if the file had one
    pub hotel_name: Option<String>,
    pub rows: Vec<RateRow>,
}

/// Normalize a header for matching: lowercase, whitespace and underscores
/// removed, so `checkin_date` and `Checkin Date` are the same column.
fn normalize_header(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect()
}

/// Render a cell as trimmed text, integers without a trailing `.0`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - *f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => format!("{i}"),
        Data::Bool(b) => format!("{b}"),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Parse a cell as a calendar date, dropping any time component.
fn parse_date_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => parse_date_text(s),
        Data::String(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()
}

/// Parse a cell as a price, stripping export artifacts.
fn parse_price_cell(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) => Decimal::try_from(*f).ok(),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => clean_price(s),
        _ => None,
    }
}

fn parse_occupancy_cell(cell: &Data) -> Option<u32> {
    match cell {
        Data::Int(i) => u32::try_from(*i).ok(),
        Data::Float(f) if *f >= 0.0 => Some(*f as u32),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Find the first sheet carrying all required columns.
///
/// Returns the sheet data plus a map from canonical column name to index.
fn find_sheet(
    path: &Path,
    required: &[&str],
) -> Result<(Range<Data>, HashMap<String, usize>), IngestError> {
    let mut sheets = open_workbook_auto(path)?;
    let names = sheets.sheet_names().to_owned();

    for name in &names {
        let Ok(range) = sheets.worksheet_range(name) else {
            continue;
        };
        let Some(header_row) = range.rows().next() else {
            continue;
        };
        let headers: HashMap<String, usize> = header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| (normalize_header(&cell_to_string(cell)), idx))
            .collect();

        if required
            .iter()
            .all(|col| headers.contains_key(&normalize_header(col)))
        {
            // Rekey to the canonical names the loaders look up
            let columns = required
                .iter()
                .map(|&col| (col.to_string(), headers[&normalize_header(col)]))
                .collect();
            debug!(sheet = %name, path = %path.display(), "matched sheet");
            return Ok((range, columns));
        }
    }

    Err(IngestError::NoMatchingSheet {
        path: path.to_path_buf(),
        columns: required.join(", "),
    })
}

/// Load a raw scraper export into rate rows.
pub fn read_rate_rows(path: &Path, hotel: &str) -> Result<RateTable, IngestError> {
    let (range, columns) = find_sheet(path, RATE_COLUMNS)?;
    let col = |name: &str| columns[name];

    let mut hotel_name = None;
    let mut rows = Vec::new();
    for (idx, cells) in range.rows().enumerate().skip(1) {
        let Some(date) = cells.get(col("checkin_date")).and_then(parse_date_cell) else {
            warn!(row = idx, path = %path.display(), "skipping row without a parseable date");
            continue;
        };
        let Some(occupancy) = cells.get(col("occupancy")).and_then(parse_occupancy_cell) else {
            warn!(row = idx, path = %path.display(), "skipping row without a parseable occupancy");
            continue;
        };
        let price = cells.get(col("price")).and_then(parse_price_cell);
        let text = |name: &str| cells.get(col(name)).map(cell_to_string).unwrap_or_default();

        if hotel_name.is_none() {
            let claimed = text("hotel_name");
            if !claimed.is_empty() {
                hotel_name = Some(claimed);
            }
        }

        rows.push(
            RateRow::new(date, occupancy, price)
                .rate_type(text("type"))
                .room_name(text("name"))
                .breakfast(text("breakfast_included"))
                .refundable(text("refundable"))
                .hotel(hotel),
        );
    }

    debug!(path = %path.display(), rows = rows.len(), "loaded rate rows");
    Ok(RateTable { hotel_name, rows })
}

/// Load a reduced export for occupancy counting.
///
/// Only `checkin_date`, `price` and `occupancy` are required; the remaining
/// rate fields default to empty.
pub fn read_checkin_rows(path: &Path, hotel: &str) -> Result<Vec<RateRow>, IngestError> {
    let (range, columns) = find_sheet(path, CHECKIN_COLUMNS)?;
    let col = |name: &str| columns[name];

    let mut rows = Vec::new();
    for (idx, cells) in range.rows().enumerate().skip(1) {
        let Some(date) = cells.get(col("checkin_date")).and_then(parse_date_cell) else {
            warn!(row = idx, path = %path.display(), "skipping row without a parseable date");
            continue;
        };
        let Some(occupancy) = cells.get(col("occupancy")).and_then(parse_occupancy_cell) else {
            continue;
        };
        let price = cells.get(col("price")).and_then(parse_price_cell);
        rows.push(RateRow::new(date, occupancy, price).hotel(hotel));
    }
    Ok(rows)
}

/// Load a detailed-prices report as cleaned price points.
///
/// Sold Out rows and anything else without a numeric price are dropped, the
/// same way the comparison dashboards drop them before computing medians.
pub fn read_price_points(path: &Path, hotel: &str) -> Result<Vec<PricePoint>, IngestError> {
    let (range, columns) = find_sheet(path, PRICE_COLUMNS)?;
    let col = |name: &str| columns[name];

    let mut points = Vec::new();
    for cells in range.rows().skip(1) {
        let Some(date) = cells.get(col("date")).and_then(parse_date_cell) else {
            continue;
        };
        let Some(price) = cells.get(col("price")).and_then(parse_price_cell) else {
            continue;
        };
        points.push(PricePoint { date, hotel: hotel.to_string(), price });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn headers_normalize_case_spacing_and_underscores() {
        assert_eq!(normalize_header("Checkin Date"), "checkindate");
        assert_eq!(normalize_header("checkin_date"), "checkindate");
        assert_eq!(normalize_header("  PRICE "), "price");
        assert_eq!(normalize_header("breakfast_included"), "breakfastincluded");
    }

    #[test]
    fn date_text_variants_parse() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        assert_eq!(parse_date_text("2025-07-14"), Some(expected));
        assert_eq!(parse_date_text("2025-07-14 00:00:00"), Some(expected));
        assert_eq!(parse_date_text("2025-07-14T12:30:00"), Some(expected));
        assert_eq!(parse_date_text("14/07/2025"), Some(expected));
        assert_eq!(parse_date_text("not a date"), None);
    }

    #[test]
    fn price_cells_parse_with_artifacts() {
        assert_eq!(parse_price_cell(&Data::Float(120.5)), Some(dec!(120.5)));
        assert_eq!(parse_price_cell(&Data::Int(90)), Some(dec!(90)));
        assert_eq!(
            parse_price_cell(&Data::String("'2,400".into())),
            Some(dec!(2400))
        );
        assert_eq!(parse_price_cell(&Data::String("Sold Out".into())), None);
        assert_eq!(parse_price_cell(&Data::Empty), None);
    }

    #[test]
    fn occupancy_cells_parse() {
        assert_eq!(parse_occupancy_cell(&Data::Int(2)), Some(2));
        assert_eq!(parse_occupancy_cell(&Data::Float(3.0)), Some(3));
        assert_eq!(parse_occupancy_cell(&Data::String(" 4".into())), Some(4));
        assert_eq!(parse_occupancy_cell(&Data::String("two".into())), None);
    }

    #[test]
    fn integer_floats_render_without_fraction() {
        assert_eq!(cell_to_string(&Data::Float(5.0)), "5");
        assert_eq!(cell_to_string(&Data::Float(5.5)), "5.5");
        assert_eq!(cell_to_string(&Data::String("  yes ".into())), "yes");
    }
}
