//! # ratescope-render
//!
//! Rendering backends for ratescope results.
//!
//! This crate provides:
//! - Excel price and comparison reports (one row per date)
//! - SVG line charts for price medians and occupancy trends
//!
//! ## Example
//!
//! ```rust,ignore
//! use ratescope_render::{LineChartRenderer, PriceReportRenderer, Series};
//!
//! let renderer = PriceReportRenderer::new("Bhandari");
//! let xlsx_bytes = renderer.render_detailed_to_bytes(&daily)?;
//! std::fs::write("Bhandari_detailed_prices.xlsx", xlsx_bytes)?;
//!
//! let chart = LineChartRenderer::new("Median Prices: Khaolak vs Competitors");
//! let svg = chart.render(&series)?;
//! std::fs::write("comparison.svg", svg)?;
//! ```

use thiserror::Error;

pub mod chart;
pub mod excel;

pub use chart::{LineChartRenderer, Series};
pub use excel::{ComparisonReportRenderer, PriceReportRenderer};

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
