//! Data types used by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Sales from this year onward land in the post-2000 bucket.
pub const SPLIT_YEAR: i32 = 2000;

/// A single game row, typed at the CSV boundary.
///
/// `None` means the cell was blank or did not parse; such records are
/// dropped before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub publisher: String,
    pub year: Option<i32>,
    pub global_sales: Option<f64>,
}

impl SalesRecord {
    pub fn new(publisher: &str, year: Option<i32>, global_sales: Option<f64>) -> Self {
        Self {
            publisher: publisher.to_string(),
            year,
            global_sales,
        }
    }

    /// Returns the bucket and sales amount, or `None` if the record is unusable.
    pub fn usable(&self) -> Option<(Period, f64)> {
        match (self.year, self.global_sales) {
            (Some(year), Some(sales)) => Some((Period::from_year(year), sales)),
            _ => None,
        }
    }
}

/// Time bucket a sale is summed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Pre2000,
    Post2000,
}

impl Period {
    pub fn from_year(year: i32) -> Self {
        if year < SPLIT_YEAR {
            Period::Pre2000
        } else {
            Period::Post2000
        }
    }
}

/// Per-publisher sales split into the two periods.
///
/// The total is always derived from the two buckets and is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PublisherAggregate {
    publisher: String,
    sales_pre_2000: f64,
    sales_post_2000: f64,
}

impl PublisherAggregate {
    pub fn new(publisher: &str) -> Self {
        Self {
            publisher: publisher.to_string(),
            sales_pre_2000: 0.0,
            sales_post_2000: 0.0,
        }
    }

    pub fn add(&mut self, period: Period, sales: f64) {
        match period {
            Period::Pre2000 => self.sales_pre_2000 += sales,
            Period::Post2000 => self.sales_post_2000 += sales,
        }
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn sales_pre_2000(&self) -> f64 {
        self.sales_pre_2000
    }

    pub fn sales_post_2000(&self) -> f64 {
        self.sales_post_2000
    }

    pub fn total_sales(&self) -> f64 {
        self.sales_pre_2000 + self.sales_post_2000
    }
}

impl Serialize for PublisherAggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PublisherAggregate", 4)?;
        s.serialize_field("publisher", &self.publisher)?;
        s.serialize_field("sales_pre_2000", &self.sales_pre_2000)?;
        s.serialize_field("sales_post_2000", &self.sales_post_2000)?;
        s.serialize_field("total_sales", &self.total_sales())?;
        s.end()
    }
}

/// One stacked segment of the chart.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesInfo {
    pub(crate) key: &'static str,
    pub(crate) label: &'static str,
    pub(crate) color: &'static str,
}

/// Ranked publishers plus what a renderer needs to draw them.
#[derive(Debug, Serialize)]
pub struct ChartReport {
    pub(crate) schema_version: u8,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) source: String,
    pub(crate) title: String,
    pub(crate) x_axis_label: &'static str,
    pub(crate) y_axis_label: &'static str,
    pub(crate) series: Vec<SeriesInfo>,
    pub(crate) publishers: Vec<PublisherAggregate>,
}

impl ChartReport {
    pub fn new(source: &str, top_n: usize, publishers: Vec<PublisherAggregate>) -> Self {
        Self {
            schema_version: 1,
            generated_at: Utc::now(),
            source: source.to_string(),
            title: format!("Top {top_n} Publishers by Global Sales (Pre and Post 2000)"),
            x_axis_label: "Global Sales (in millions)",
            y_axis_label: "Publisher",
            series: vec![
                SeriesInfo {
                    key: "sales_pre_2000",
                    label: "Pre 2000",
                    color: "#69b3a2",
                },
                SeriesInfo {
                    key: "sales_post_2000",
                    label: "Post 2000",
                    color: "#404080",
                },
            ],
            publishers,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn publishers(&self) -> &[PublisherAggregate] {
        &self.publishers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_boundary() {
        assert_eq!(Period::from_year(1999), Period::Pre2000);
        assert_eq!(Period::from_year(2000), Period::Post2000);
        assert_eq!(Period::from_year(1980), Period::Pre2000);
        assert_eq!(Period::from_year(2016), Period::Post2000);
    }

    #[test]
    fn test_usable_requires_both_fields() {
        assert!(SalesRecord::new("A", Some(2001), Some(1.0)).usable().is_some());
        assert!(SalesRecord::new("A", None, Some(1.0)).usable().is_none());
        assert!(SalesRecord::new("A", Some(2001), None).usable().is_none());
    }

    #[test]
    fn test_total_is_sum_of_buckets() {
        let mut agg = PublisherAggregate::new("Nintendo");
        agg.add(Period::Pre2000, 0.1);
        agg.add(Period::Post2000, 0.2);
        agg.add(Period::Post2000, 0.3);

        assert_eq!(agg.total_sales(), agg.sales_pre_2000() + agg.sales_post_2000());
    }

    #[test]
    fn test_aggregate_serializes_renderer_field_names() {
        let mut agg = PublisherAggregate::new("Sega");
        agg.add(Period::Pre2000, 1.5);
        agg.add(Period::Post2000, 2.0);

        let value = serde_json::to_value(&agg).unwrap();
        assert_eq!(value["publisher"], "Sega");
        assert_eq!(value["sales_pre_2000"], 1.5);
        assert_eq!(value["sales_post_2000"], 2.0);
        assert_eq!(value["total_sales"], 3.5);
    }

    #[test]
    fn test_report_title_matches_top_n() {
        let report = ChartReport::new("vgsales.csv", 10, vec![]);
        assert_eq!(
            report.title(),
            "Top 10 Publishers by Global Sales (Pre and Post 2000)"
        );
        assert_eq!(report.series.len(), 2);
    }
}
