//! # ratescope-ingest
//!
//! Spreadsheet ingestion for ratescope: discovers xlsx exports on disk and
//! loads them into `ratescope-core` types.
//!
//! Two export shapes are understood:
//! - raw scraper exports with one row per offered rate
//!   (`checkin_date`, `price`, `occupancy`, `type`, ...)
//! - detailed-prices reports with one winning row per date
//!   (`Date`, `Price`, ...)
//!
//! Headers are matched case-insensitively ignoring whitespace, so exports
//! that rename `checkin_date` to `Checkin Date` still load.

use std::path::PathBuf;
use thiserror::Error;

pub mod discover;
pub mod workbook;

pub use discover::{classify, discover_recursive, discover_xlsx, HotelFile};
pub use workbook::{read_checkin_rows, read_price_points, read_rate_rows, RateTable};

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("no sheet with required columns [{columns}] in {}", path.display())]
    NoMatchingSheet { path: PathBuf, columns: String },

    #[error("no spreadsheet files found in {}", .0.display())]
    NoFiles(PathBuf),
}
