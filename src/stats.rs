use serde::Serialize;
use std::collections::HashSet;

use crate::analyzers::types::SalesRecord;

/// Row counts for one pass over a sales CSV.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PipelineStats {
    pub total_rows: usize,
    pub usable_rows: usize,

    // drop reasons; a row missing both is counted in both
    pub missing_year: usize,
    pub missing_sales: usize,

    pub publishers: usize,
}

impl PipelineStats {
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let mut s = PipelineStats {
            total_rows: records.len(),
            ..Default::default()
        };
        let mut publishers = HashSet::new();

        for r in records {
            if r.year.is_none() {
                s.missing_year += 1;
            }

            if r.global_sales.is_none() {
                s.missing_sales += 1;
            }

            if r.usable().is_some() {
                s.usable_rows += 1;
                publishers.insert(r.publisher.as_str());
            }
        }

        s.publishers = publishers.len();
        s
    }

    pub fn dropped_rows(&self) -> usize {
        self.total_rows - self.usable_rows
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn usable_pct(&self) -> f64 {
        Self::pct(self.usable_rows, self.total_rows)
    }
}
