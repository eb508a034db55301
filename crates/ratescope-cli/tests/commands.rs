//! End-to-end tests: generate export workbooks, run the binary, inspect the
//! files it writes.

use rust_xlsxwriter::Workbook;
use std::path::Path;
use std::process::Command;

fn ratescope() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ratescope"))
}

/// Write a raw scraper export with one sheet of rate rows.
fn write_raw_export(path: &Path, hotel: &str, prices: &[(&str, f64)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = [
        "checkin_date",
        "price",
        "occupancy",
        "breakfast_included",
        "hotel_name",
        "refundable",
        "name",
        "type",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write(0, col as u16, *header).unwrap();
    }
    for (idx, (date, price)) in prices.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write(row, 0, *date).unwrap();
        sheet.write(row, 1, *price).unwrap();
        sheet.write(row, 2, 2.0).unwrap();
        sheet.write(row, 3, "yes").unwrap();
        sheet.write(row, 4, hotel).unwrap();
        sheet.write(row, 5, "yes").unwrap();
        sheet.write(row, 6, "Standard Double").unwrap();
        sheet.write(row, 7, "Regular").unwrap();
    }
    workbook.save(path).unwrap();
}

/// Write a detailed-prices export (`Date | Price` plus attributes).
fn write_detailed_export(path: &Path, prices: &[(&str, f64)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Date", "Price", "Room Name"].iter().enumerate() {
        sheet.write(0, col as u16, *header).unwrap();
    }
    for (idx, (date, price)) in prices.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write(row, 0, *date).unwrap();
        sheet.write(row, 1, *price).unwrap();
        sheet.write(row, 2, "Standard Double").unwrap();
    }
    workbook.save(path).unwrap();
}

#[test]
fn sort_prices_writes_both_reports_per_hotel() {
    let dir = tempfile::tempdir().unwrap();
    write_raw_export(
        &dir.path().join("Seaside_202507.xlsx"),
        "Seaside Resort",
        &[("2025-07-01", 120.0), ("2025-07-02", 95.0)],
    );

    let status = ratescope()
        .arg("sort-prices")
        .arg(dir.path())
        .status()
        .expect("failed to run ratescope");
    assert!(status.success());

    let written: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        written.iter().any(|n| n.starts_with("Seaside_prices_") && n.ends_with(".xlsx")),
        "missing summary report in {written:?}"
    );
    assert!(
        written
            .iter()
            .any(|n| n.starts_with("Seaside_detailed_prices_") && n.ends_with(".xlsx")),
        "missing detailed report in {written:?}"
    );
}

#[test]
fn sort_prices_merges_overlapping_exports() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    // Same hotel twice with overlapping dates; the report set must be one
    write_raw_export(
        &dir.path().join("Seaside_week1.xlsx"),
        "Seaside Resort",
        &[("2025-07-01", 120.0), ("2025-07-02", 95.0)],
    );
    write_raw_export(
        &dir.path().join("Seaside_week2.xlsx"),
        "Seaside Resort",
        &[("2025-07-02", 80.0), ("2025-07-03", 130.0)],
    );

    let status = ratescope()
        .arg("sort-prices")
        .arg(dir.path())
        .arg("--out-dir")
        .arg(out.path())
        .status()
        .expect("failed to run ratescope");
    assert!(status.success());

    let reports = std::fs::read_dir(out.path()).unwrap().count();
    assert_eq!(reports, 2, "expected one summary and one detailed report");
}

#[test]
fn compare_writes_chart_and_report() {
    let dir = tempfile::tempdir().unwrap();
    write_detailed_export(
        &dir.path().join("Seaside_detailed_prices_20250701.xlsx"),
        &[("2025-07-01", 120.0), ("2025-07-02", 110.0)],
    );
    write_detailed_export(
        &dir.path().join("Palm_detailed_prices_20250701.xlsx"),
        &[("2025-07-01", 140.0), ("2025-07-02", 135.0)],
    );

    let chart = dir.path().join("comparison.svg");
    let report = dir.path().join("comparison.xlsx");
    let output = ratescope()
        .arg("compare")
        .arg(dir.path())
        .arg("--subject")
        .arg("Seaside")
        .arg("--chart")
        .arg(&chart)
        .arg("--report")
        .arg(&report)
        .output()
        .expect("failed to run ratescope");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Seaside"), "summary missing from {stdout}");
    assert!(stdout.contains("below the competitor median"), "stdout: {stdout}");

    let svg = std::fs::read_to_string(&chart).unwrap();
    assert!(svg.contains("<svg"));
    assert!(report.exists());
}

#[test]
fn compare_json_output_parses() {
    let dir = tempfile::tempdir().unwrap();
    write_detailed_export(
        &dir.path().join("Seaside_detailed_prices.xlsx"),
        &[("2025-07-01", 100.0)],
    );
    write_detailed_export(
        &dir.path().join("Palm_detailed_prices.xlsx"),
        &[("2025-07-01", 200.0)],
    );

    let output = ratescope()
        .arg("compare")
        .arg(dir.path())
        .arg("--subject")
        .arg("Seaside")
        .arg("--json")
        .output()
        .expect("failed to run ratescope");
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["subject"]["count"], 1);
    // 100 vs 200 is exactly -50% in f64
    assert_eq!(parsed["median_difference_pct"], -50.0);
}

#[test]
fn occupancy_counts_and_chart() {
    let dir = tempfile::tempdir().unwrap();
    write_raw_export(
        &dir.path().join("Seaside_202507.xlsx"),
        "Seaside Resort",
        &[
            ("2025-07-01", 120.0),
            ("2025-07-01", 95.0),
            ("2025-07-02", 110.0),
        ],
    );

    let chart = dir.path().join("occupancy.svg");
    let output = ratescope()
        .arg("occupancy")
        .arg(dir.path())
        .arg("--chart")
        .arg(&chart)
        .output()
        .expect("failed to run ratescope");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2025-07-01  2"), "stdout: {stdout}");
    assert!(stdout.contains("2025-07-02  1"), "stdout: {stdout}");
    assert!(chart.exists());
}

#[test]
fn empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let status = ratescope()
        .arg("sort-prices")
        .arg(dir.path())
        .status()
        .expect("failed to run ratescope");
    assert!(!status.success());
}
