//! Output formatting and persistence for ranked publisher reports.
//!
//! Supports a logged table, a JSON document and a flat CSV.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{ChartReport, PublisherAggregate};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;

/// One CSV line of the ranked table.
#[derive(Serialize)]
struct RankedRow<'a> {
    rank: usize,
    publisher: &'a str,
    sales_pre_2000: f64,
    sales_post_2000: f64,
    total_sales: f64,
}

/// Logs the ranked publishers, one line each.
pub fn print_pretty(report: &ChartReport) {
    info!(title = report.title(), "Ranked publishers");
    for (i, p) in report.publishers().iter().enumerate() {
        info!(
            rank = i + 1,
            publisher = p.publisher(),
            pre_2000 = p.sales_pre_2000(),
            post_2000 = p.sales_post_2000(),
            total = p.total_sales(),
            "Publisher"
        );
    }
}

pub fn to_json(report: &ChartReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

/// Writes the report as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &str, report: &ChartReport) -> Result<()> {
    debug!(path, "Writing JSON report");
    let mut file = File::create(path).with_context(|| format!("Failed to create `{path}`"))?;
    file.write_all(&to_json(report)?)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Serializes the ranked publishers as CSV rows with a leading `rank` column.
pub fn write_csv_to<W: Write>(writer: W, publishers: &[PublisherAggregate]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for (i, p) in publishers.iter().enumerate() {
        writer.serialize(RankedRow {
            rank: i + 1,
            publisher: p.publisher(),
            sales_pre_2000: p.sales_pre_2000(),
            sales_post_2000: p.sales_post_2000(),
            total_sales: p.total_sales(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the ranked publishers to a CSV file, replacing any existing file.
pub fn write_csv(path: &str, publishers: &[PublisherAggregate]) -> Result<()> {
    debug!(path, rows = publishers.len(), "Writing CSV report");
    let file = File::create(path).with_context(|| format!("Failed to create `{path}`"))?;
    write_csv_to(file, publishers)
}
