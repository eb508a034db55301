//! ratescope CLI - Hotel Pricing Analytics
//!
//! Command-line interface for turning scraped rate exports into price
//! reports, competitor comparisons, and occupancy forecasts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "ratescope")]
#[command(author, version, about = "Hotel pricing analytics toolkit", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build per-hotel price reports from raw rate exports
    SortPrices {
        /// Directory containing the xlsx exports
        #[arg(value_name = "DIR")]
        dir: std::path::PathBuf,

        /// Directory for the generated reports (defaults to DIR)
        #[arg(short, long)]
        out_dir: Option<std::path::PathBuf>,

        /// Walk subdirectories; the directory name becomes the hotel label
        #[arg(short, long)]
        recursive: bool,
    },

    /// Compare a subject hotel's prices against its competitors
    Compare {
        /// Directory containing detailed-prices exports
        #[arg(value_name = "DIR")]
        dir: std::path::PathBuf,

        /// Filename keyword identifying the subject hotel
        #[arg(short, long)]
        subject: String,

        /// Restrict to the trailing N days of observations
        #[arg(short, long)]
        days: Option<u64>,

        /// Write a median-price comparison chart (SVG)
        #[arg(long)]
        chart: Option<std::path::PathBuf>,

        /// Write a per-date statistics report (XLSX)
        #[arg(long)]
        report: Option<std::path::PathBuf>,

        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Count offered rates per check-in date and forecast the trend
    Occupancy {
        /// Directory containing the xlsx exports
        #[arg(value_name = "DIR")]
        dir: std::path::PathBuf,

        /// Count only rows priced for this occupancy
        #[arg(short, long)]
        occupancy: Option<u32>,

        /// Extend the fitted trend this many days past the last observation
        #[arg(short, long, default_value_t = 30)]
        forecast_days: u64,

        /// Write an occupancy trend chart (SVG)
        #[arg(long)]
        chart: Option<std::path::PathBuf>,

        /// Walk subdirectories; the directory name becomes the hotel label
        #[arg(short, long)]
        recursive: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::SortPrices { dir, out_dir, recursive } => {
            commands::sort_prices(&dir, out_dir.as_deref(), recursive)
        }
        Commands::Compare { dir, subject, days, chart, report, json } => {
            commands::compare(&dir, &subject, days, chart.as_deref(), report.as_deref(), json)
        }
        Commands::Occupancy { dir, occupancy, forecast_days, chart, recursive } => {
            commands::occupancy(&dir, occupancy, forecast_days, chart.as_deref(), recursive)
        }
    }
}
