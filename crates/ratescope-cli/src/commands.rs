//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use ratescope_core::occupancy::{counts_by_hotel, daily_counts, daily_counts_for_occupancy};
use ratescope_core::stats::{
    daily_stats, median_by_date, percent_difference, trailing_window, PeriodStats,
};
use ratescope_core::trend::CountForecast;
use ratescope_core::{merge_cheapest, select_range, OccupancyPolicy, PricePoint, RateRow};
use ratescope_ingest::{
    classify, discover_recursive, discover_xlsx, read_checkin_rows, read_price_points,
    read_rate_rows, HotelFile,
};
use ratescope_render::{ComparisonReportRenderer, LineChartRenderer, PriceReportRenderer, Series};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// sort-prices
// ============================================================================

pub fn sort_prices(dir: &Path, out_dir: Option<&Path>, recursive: bool) -> Result<()> {
    let files = if recursive {
        discover_recursive(dir)?
    } else {
        discover_xlsx(dir, None)?
    };
    let out_dir = out_dir.unwrap_or(dir);
    let stamp = Local::now().date_naive().format("%Y%m%d").to_string();
    let policy = OccupancyPolicy::default();

    // One report set per hotel; a hotel may span several export files
    let mut by_hotel: BTreeMap<String, Vec<HotelFile>> = BTreeMap::new();
    for file in files {
        by_hotel.entry(file.hotel.clone()).or_default().push(file);
    }

    for (hotel, hotel_files) in by_hotel {
        let mut tables = Vec::new();
        let mut display_name = None;
        for file in &hotel_files {
            match read_rate_rows(&file.path, &hotel) {
                Ok(table) => {
                    if display_name.is_none() {
                        display_name.clone_from(&table.hotel_name);
                    }
                    tables.push(select_range(&table.rows, &policy));
                }
                Err(err) => {
                    warn!(path = %file.path.display(), %err, "skipping unreadable export");
                }
            }
        }
        if tables.is_empty() {
            warn!(%hotel, "no readable exports, skipping hotel");
            continue;
        }

        let daily = merge_cheapest(tables.into_iter().flatten());
        let display = display_name.unwrap_or_else(|| hotel.clone());
        let renderer = PriceReportRenderer::new(&display);

        let summary_path = out_dir.join(format!("{hotel}_prices_{stamp}.xlsx"));
        let bytes = renderer.render_summary_to_bytes(&daily)?;
        std::fs::write(&summary_path, bytes)
            .with_context(|| format!("writing {}", summary_path.display()))?;

        let detailed_path = out_dir.join(format!("{hotel}_detailed_prices_{stamp}.xlsx"));
        let bytes = renderer.render_detailed_to_bytes(&daily)?;
        std::fs::write(&detailed_path, bytes)
            .with_context(|| format!("writing {}", detailed_path.display()))?;

        let sold_out = daily.iter().filter(|d| d.selection.is_sold_out()).count();
        info!(
            %hotel,
            dates = daily.len(),
            sold_out,
            "wrote {} and {}",
            summary_path.display(),
            detailed_path.display()
        );
    }

    Ok(())
}

// ============================================================================
// compare
// ============================================================================

#[derive(Serialize)]
struct ComparisonSummary {
    subject: PeriodStats,
    competitors: PeriodStats,
    /// Subject median relative to competitor median, in percent
    median_difference_pct: Option<f64>,
}

pub fn compare(
    dir: &Path,
    subject_keyword: &str,
    days: Option<u64>,
    chart: Option<&Path>,
    report: Option<&Path>,
    json: bool,
) -> Result<()> {
    let files = discover_xlsx(dir, Some("detailed_prices"))?;
    let (subject_files, competitor_files) = classify(files, subject_keyword);
    if subject_files.is_empty() {
        bail!("no file in {} matches subject keyword '{subject_keyword}'", dir.display());
    }
    if competitor_files.is_empty() {
        bail!("no competitor files in {} besides '{subject_keyword}'", dir.display());
    }

    let subject_label = subject_files[0].hotel.clone();
    let mut subject_points = load_points(&subject_files);
    let mut competitor_points = load_points(&competitor_files);
    if let Some(days) = days {
        subject_points = trailing_window(&subject_points, days);
        competitor_points = trailing_window(&competitor_points, days);
    }
    if subject_points.is_empty() {
        bail!("no price observations for subject '{subject_label}'");
    }

    let subject_stats = PeriodStats::from_points(&subject_points);
    let competitor_stats = PeriodStats::from_points(&competitor_points);
    let median_difference_pct = match (subject_stats.median, competitor_stats.median) {
        (Some(subject), Some(reference)) => percent_difference(subject, reference),
        _ => None,
    };
    let summary = ComparisonSummary {
        subject: subject_stats,
        competitors: competitor_stats,
        median_difference_pct,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&subject_label, &summary);
    }

    if let Some(path) = chart {
        let series = vec![
            Series::new(&subject_label, to_series(&median_by_date(&subject_points))),
            Series::new("Competitors", to_series(&median_by_date(&competitor_points))),
        ];
        let title = format!("Median Prices: {subject_label} vs Competitors");
        let svg = LineChartRenderer::new(title).render(&series)?;
        std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    if let Some(path) = report {
        let renderer = ComparisonReportRenderer::new()
            .subject_label(&subject_label)
            .competitor_label("Competitors");
        let bytes = renderer.render_to_bytes(
            &daily_stats(&subject_points),
            &daily_stats(&competitor_points),
        )?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn load_points(files: &[HotelFile]) -> Vec<PricePoint> {
    let mut points = Vec::new();
    for file in files {
        match read_price_points(&file.path, &file.hotel) {
            Ok(mut loaded) => points.append(&mut loaded),
            Err(err) => {
                warn!(path = %file.path.display(), %err, "skipping unreadable export");
            }
        }
    }
    points
}

fn to_series(medians: &BTreeMap<NaiveDate, f64>) -> Vec<(NaiveDate, f64)> {
    medians.iter().map(|(date, value)| (*date, *value)).collect()
}

fn print_summary(subject_label: &str, summary: &ComparisonSummary) {
    let fmt = |value: Option<f64>| match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    };

    println!("{subject_label} ({} observations)", summary.subject.count);
    println!(
        "  median {}  mean {}  min {}  max {}",
        fmt(summary.subject.median),
        fmt(summary.subject.mean),
        fmt(summary.subject.min),
        fmt(summary.subject.max)
    );
    println!("Competitors ({} observations)", summary.competitors.count);
    println!(
        "  median {}  mean {}  min {}  max {}",
        fmt(summary.competitors.median),
        fmt(summary.competitors.mean),
        fmt(summary.competitors.min),
        fmt(summary.competitors.max)
    );
    match summary.median_difference_pct {
        Some(pct) if pct >= 0.0 => {
            println!("{subject_label} median is {pct:.1}% above the competitor median");
        }
        Some(pct) => {
            println!("{subject_label} median is {:.1}% below the competitor median", -pct);
        }
        None => println!("median comparison unavailable"),
    }
}

// ============================================================================
// occupancy
// ============================================================================

pub fn occupancy(
    dir: &Path,
    only_occupancy: Option<u32>,
    forecast_days: u64,
    chart: Option<&Path>,
    recursive: bool,
) -> Result<()> {
    let files = if recursive {
        discover_recursive(dir)?
    } else {
        discover_xlsx(dir, None)?
    };

    let mut rows: Vec<RateRow> = Vec::new();
    for file in &files {
        match read_checkin_rows(&file.path, &file.hotel) {
            Ok(mut loaded) => rows.append(&mut loaded),
            Err(err) => {
                warn!(path = %file.path.display(), %err, "skipping unreadable export");
            }
        }
    }

    let counts = match only_occupancy {
        Some(occupancy) => daily_counts_for_occupancy(&rows, occupancy),
        None => daily_counts(&rows),
    };
    if counts.is_empty() {
        bail!("no check-in rows found in {}", dir.display());
    }

    for (date, count) in &counts {
        println!("{date}  {count}");
    }

    let forecast = CountForecast::fit(&counts);
    match &forecast {
        Some(forecast) => {
            println!(
                "trend: {:+.2} rows/day (r² = {:.3})",
                forecast.trend.slope, forecast.trend.r_squared
            );
        }
        None => println!("trend: not enough observations to fit"),
    }

    if let Some(path) = chart {
        // One line per hotel so room-mix differences stay visible
        let per_hotel = match only_occupancy {
            Some(occupancy) => {
                let filtered: Vec<RateRow> = rows
                    .iter()
                    .filter(|r| r.occupancy == occupancy)
                    .cloned()
                    .collect();
                counts_by_hotel(&filtered)
            }
            None => counts_by_hotel(&rows),
        };
        let mut series: Vec<Series> = per_hotel
            .into_iter()
            .map(|(hotel, hotel_counts)| {
                let points: Vec<(NaiveDate, f64)> = hotel_counts
                    .into_iter()
                    .map(|(date, count)| (date, count as f64))
                    .collect();
                Series::new(hotel, points)
            })
            .collect();
        if let Some(forecast) = &forecast {
            series.push(Series::new("Trend", forecast.projection(&counts, forecast_days)).dashed());
        }

        let svg = LineChartRenderer::new("Offered Rates per Check-in Date").render(&series)?;
        std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    Ok(())
}
