//! CSV parser for video-game sales exports.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::debug;

use crate::analyzers::types::SalesRecord;

pub const PUBLISHER_COLUMN: &str = "Publisher";
pub const YEAR_COLUMN: &str = "Year";
pub const SALES_COLUMN: &str = "Global_Sales";

/// Positions of the required columns within the header row.
struct Columns {
    publisher: usize,
    year: usize,
    sales: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            match headers.iter().position(|h| h == name) {
                Some(idx) => Ok(idx),
                None => bail!("CSV header is missing required column `{name}`"),
            }
        };

        Ok(Self {
            publisher: find(PUBLISHER_COLUMN)?,
            year: find(YEAR_COLUMN)?,
            sales: find(SALES_COLUMN)?,
        })
    }
}

/// Decodes a sales CSV held in memory.
pub fn parse_sales(bytes: &[u8]) -> Result<Vec<SalesRecord>> {
    parse_sales_from_reader(bytes)
}

/// Decodes a sales CSV into typed records.
///
/// Blank or unparseable `Year` / `Global_Sales` cells become `None` so the
/// aggregator can drop the row. Numeric cells are trimmed before parsing;
/// `Publisher` is kept verbatim since it is the grouping key.
///
/// # Errors
///
/// Returns an error if the header row lacks `Publisher`, `Year` or
/// `Global_Sales`, or if the CSV stream itself is malformed.
pub fn parse_sales_from_reader<R: Read>(reader: R) -> Result<Vec<SalesRecord>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV header row")?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut records = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let row = result.with_context(|| format!("Failed to read CSV row {}", index + 1))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        records.push(SalesRecord {
            publisher: cell(columns.publisher).to_string(),
            year: parse_year(cell(columns.year)),
            global_sales: parse_sales_value(cell(columns.sales)),
        });
    }

    debug!(rows = records.len(), "Parsed sales CSV");
    Ok(records)
}

/// Parses a release year. Integral decimals such as `2001.0` are accepted.
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }

    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// Parses a sales figure in millions. Non-finite values are rejected.
pub fn parse_sales_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_values() {
        assert_eq!(parse_year("2006"), Some(2006));
        assert_eq!(parse_year(" 1985 "), Some(1985));
        assert_eq!(parse_year("2001.0"), Some(2001));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("N/A"), None);
        assert_eq!(parse_year("2001.5"), None);
        assert_eq!(parse_year("NaN"), None);
    }

    #[test]
    fn test_parse_sales_values() {
        assert_eq!(parse_sales_value("82.74"), Some(82.74));
        assert_eq!(parse_sales_value("0.01"), Some(0.01));
        assert_eq!(parse_sales_value("-1.5"), Some(-1.5));
        assert_eq!(parse_sales_value(""), None);
        assert_eq!(parse_sales_value("inf"), None);
        assert_eq!(parse_sales_value("NaN"), None);
        assert_eq!(parse_sales_value("lots"), None);
    }

    #[test]
    fn test_parse_sales_reads_named_columns() {
        let csv = "Rank,Name,Year,Publisher,Global_Sales\n\
                   1,Wii Sports,2006,Nintendo,82.74\n\
                   2,Super Mario Bros.,1985,Nintendo,40.24\n";

        let records = parse_sales(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], SalesRecord::new("Nintendo", Some(2006), Some(82.74)));
        assert_eq!(records[1], SalesRecord::new("Nintendo", Some(1985), Some(40.24)));
    }

    #[test]
    fn test_blank_and_na_cells_become_none() {
        let csv = "Publisher,Year,Global_Sales\n\
                   Sega,N/A,1.0\n\
                   Sega,1999,\n\
                   Sega,,\n";

        let records = parse_sales(csv.as_bytes()).unwrap();

        assert_eq!(records[0].year, None);
        assert_eq!(records[0].global_sales, Some(1.0));
        assert_eq!(records[1].global_sales, None);
        assert_eq!(records[2], SalesRecord::new("Sega", None, None));
    }

    #[test]
    fn test_short_row_is_kept_as_unusable() {
        let csv = "Publisher,Year,Global_Sales\nCapcom,2004\n";

        let records = parse_sales(csv.as_bytes()).unwrap();

        assert_eq!(records, vec![SalesRecord::new("Capcom", Some(2004), None)]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "Publisher,Year,NA_Sales\nSega,1999,1.0\n";

        let err = parse_sales(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Global_Sales"));
    }

    #[test]
    fn test_publisher_is_not_trimmed() {
        let csv = "Publisher,Year,Global_Sales\n\
                   Sega , 1999 , 1.0 \n\
                   Sega,2001,2.0\n";

        let records = parse_sales(csv.as_bytes()).unwrap();

        assert_eq!(records[0], SalesRecord::new("Sega ", Some(1999), Some(1.0)));
        assert_eq!(records[1].publisher, "Sega");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let result = parse_sales(b"Publisher,Year,Global_Sales\n\xff\xfe,2001,1.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_header_only_yields_no_records() {
        let records = parse_sales(b"Publisher,Year,Global_Sales\n").unwrap();
        assert!(records.is_empty());
    }
}
