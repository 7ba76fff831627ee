//! Publisher sales aggregation and ranking.
//!
//! This module groups per-game sales rows by publisher, splits them into
//! pre/post 2000 buckets, ranks publishers by total sales, and packages the
//! result as a chart report that can be written locally or uploaded to S3.

pub mod aggregate;
pub mod analyzer;
pub mod types;
pub mod writetos3;
