//! Excel report renderers.
//!
//! Three workbook shapes, all one-row-per-date:
//! - price report: `Date | <hotel>` with the winning nightly price
//! - detailed report: winning price plus the room attributes behind it
//! - comparison report: subject and competitor statistics side by side
//!
//! The domain's `DaySelection::SoldOut` variant becomes the literal strings
//! `"Sold Out"` / `"N/A"` here and nowhere else.

use chrono::NaiveDate;
use ratescope_core::stats::PeriodStats;
use ratescope_core::{DailyRate, DaySelection};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::{BTreeMap, BTreeSet};

use crate::RenderError;

/// Sentinel written in the price column when no eligible rate existed.
pub const SOLD_OUT: &str = "Sold Out";
/// Sentinel written in the remaining columns of a sold-out row.
pub const NOT_AVAILABLE: &str = "N/A";

/// Reusable cell formats
struct ExcelFormats {
    header: Format,
    text: Format,
    date: Format,
    price: Format,
    integer: Format,
}

fn create_formats() -> ExcelFormats {
    let header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(0x4472C4)
        .set_font_color(0xFFFFFF)
        .set_border(FormatBorder::Thin);

    let text = Format::new().set_border(FormatBorder::Thin);

    let date = Format::new().set_border(FormatBorder::Thin);

    let price = Format::new()
        .set_num_format("#,##0.00")
        .set_border(FormatBorder::Thin);

    let integer = Format::new()
        .set_num_format("#,##0")
        .set_border(FormatBorder::Thin);

    ExcelFormats { header, text, date, price, integer }
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[&str],
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_with_format(0, col as u16, *header, &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// Price Reports
// ============================================================================

/// Renderer for per-hotel price workbooks.
#[derive(Clone, Debug)]
pub struct PriceReportRenderer {
    /// Hotel name used as the price column header
    pub hotel: String,
    /// Date display format
    pub date_format: String,
}

impl PriceReportRenderer {
    pub fn new(hotel: impl Into<String>) -> Self {
        Self {
            hotel: hotel.into(),
            date_format: "%Y-%m-%d".into(),
        }
    }

    /// Set the date display format
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    /// Render the two-column price report (`Date | <hotel>`).
    pub fn render_summary_to_bytes(&self, daily: &[DailyRate]) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = create_formats();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Prices")
            .map_err(|e| RenderError::Format(e.to_string()))?;
        write_headers(sheet, &["Date", self.hotel.as_str()], &formats)?;

        for (idx, rate) in daily.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet
                .write_with_format(row, 0, self.format_date(rate.date), &formats.date)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            write_price_cell(sheet, row, 1, &rate.selection, &formats)?;
        }

        sheet.autofit();
        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Render the detailed report with the room attributes behind each win.
    pub fn render_detailed_to_bytes(&self, daily: &[DailyRate]) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = create_formats();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Detailed Prices")
            .map_err(|e| RenderError::Format(e.to_string()))?;
        write_headers(
            sheet,
            &["Date", "Price", "Room Name", "Occupancy", "Breakfast Included", "Refundable"],
            &formats,
        )?;

        for (idx, rate) in daily.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet
                .write_with_format(row, 0, self.format_date(rate.date), &formats.date)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            write_price_cell(sheet, row, 1, &rate.selection, &formats)?;

            match &rate.selection {
                DaySelection::Selected(selected) => {
                    sheet
                        .write_with_format(row, 2, selected.room_name.as_str(), &formats.text)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                    sheet
                        .write_with_format(row, 3, f64::from(selected.occupancy), &formats.integer)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                    sheet
                        .write_with_format(row, 4, selected.breakfast_included.as_str(), &formats.text)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                    sheet
                        .write_with_format(row, 5, selected.refundable.as_str(), &formats.text)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                }
                DaySelection::SoldOut => {
                    for col in 2..=5u16 {
                        sheet
                            .write_with_format(row, col, NOT_AVAILABLE, &formats.text)
                            .map_err(|e| RenderError::Format(e.to_string()))?;
                    }
                }
            }
        }

        sheet.autofit();
        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }
}

fn write_price_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    selection: &DaySelection,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    match selection.price().and_then(|p| p.to_f64()) {
        Some(price) => sheet
            .write_with_format(row, col, price, &formats.price)
            .map_err(|e| RenderError::Format(e.to_string()))?,
        None => sheet
            .write_with_format(row, col, SOLD_OUT, &formats.text)
            .map_err(|e| RenderError::Format(e.to_string()))?,
    };
    Ok(())
}

// ============================================================================
// Comparison Report
// ============================================================================

/// Renderer for the subject-vs-competitors statistics workbook.
#[derive(Clone, Debug)]
pub struct ComparisonReportRenderer {
    pub subject_label: String,
    pub competitor_label: String,
}

impl Default for ComparisonReportRenderer {
    fn default() -> Self {
        Self {
            subject_label: "Subject".into(),
            competitor_label: "Competitors".into(),
        }
    }
}

impl ComparisonReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subject column label
    pub fn subject_label(mut self, label: impl Into<String>) -> Self {
        self.subject_label = label.into();
        self
    }

    /// Set the competitor column label
    pub fn competitor_label(mut self, label: impl Into<String>) -> Self {
        self.competitor_label = label.into();
        self
    }

    /// Render one row per date with both groups' statistics.
    ///
    /// Dates are the union of both maps; a group without data on a date
    /// gets empty cells rather than zeros.
    pub fn render_to_bytes(
        &self,
        subject: &BTreeMap<NaiveDate, PeriodStats>,
        competitors: &BTreeMap<NaiveDate, PeriodStats>,
    ) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = create_formats();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Detailed Report")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let group_headers = |label: &str| {
            [
                format!("Median {label}"),
                format!("Mean {label}"),
                format!("Min {label}"),
                format!("Max {label}"),
            ]
        };
        let mut headers = vec!["Date".to_string()];
        headers.extend(group_headers(&self.subject_label));
        headers.extend(group_headers(&self.competitor_label));
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        write_headers(sheet, &header_refs, &formats)?;

        let dates: BTreeSet<NaiveDate> = subject.keys().chain(competitors.keys()).copied().collect();

        for (idx, date) in dates.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet
                .write_with_format(row, 0, date.format("%Y-%m-%d").to_string(), &formats.date)
                .map_err(|e| RenderError::Format(e.to_string()))?;

            write_stats_cells(sheet, row, 1, subject.get(date), &formats)?;
            write_stats_cells(sheet, row, 5, competitors.get(date), &formats)?;
        }

        sheet.autofit();
        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }
}

fn write_stats_cells(
    sheet: &mut Worksheet,
    row: u32,
    start_col: u16,
    stats: Option<&PeriodStats>,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    let values = stats
        .map(|s| [s.median, s.mean, s.min, s.max])
        .unwrap_or([None; 4]);

    for (offset, value) in values.iter().enumerate() {
        let col = start_col + offset as u16;
        match value {
            Some(v) => sheet
                .write_with_format(row, col, *v, &formats.price)
                .map_err(|e| RenderError::Format(e.to_string()))?,
            None => sheet
                .write_with_format(row, col, "", &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?,
        };
    }
    Ok(())
}
