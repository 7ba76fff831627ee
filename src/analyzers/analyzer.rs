use crate::analyzers::aggregate::aggregate_top;
use crate::analyzers::types::ChartReport;
use crate::analyzers::writetos3::{prepare_payload, write_json_to_s3};
use crate::fetch::load_source;
use crate::output::to_json;
use crate::parser::parse_sales;
use crate::stats::PipelineStats;
use anyhow::Result;
use tracing::{debug, info};

/// Everything one pass over a sales CSV produces.
#[derive(Debug)]
pub struct Analysis {
    pub stats: PipelineStats,
    pub report: ChartReport,
}

/// Parses CSV bytes, ranks publishers and builds the chart report.
pub fn analyze_bytes(source: &str, bytes: &[u8], top_n: usize) -> Result<Analysis> {
    let records = parse_sales(bytes)?;
    let stats = PipelineStats::from_records(&records);

    if stats.dropped_rows() > 0 {
        debug!(
            dropped = stats.dropped_rows(),
            missing_year = stats.missing_year,
            missing_sales = stats.missing_sales,
            "Skipped unusable rows"
        );
    }

    let publishers = aggregate_top(&records, top_n);
    Ok(Analysis {
        stats,
        report: ChartReport::new(source, top_n, publishers),
    })
}

/// Loads the source and runs the full ranking pipeline.
#[tracing::instrument(skip(source), fields(source = %source))]
pub async fn analyze(source: &str, top_n: usize) -> Result<Analysis> {
    let bytes = load_source(source).await?;
    let analysis = analyze_bytes(source, &bytes, top_n)?;

    info!(
        rows = analysis.stats.total_rows,
        usable = analysis.stats.usable_rows,
        publishers = analysis.stats.publishers,
        ranked = analysis.report.publishers().len(),
        "Ranking complete"
    );
    Ok(analysis)
}

/// Ranks publishers and uploads the JSON chart report to S3.
pub async fn publish(source: &str, top_n: usize, bucket: &str, key: &str, gzip: bool) -> Result<()> {
    let analysis = analyze(source, top_n).await?;
    let payload = prepare_payload(key, to_json(&analysis.report)?, gzip)?;
    let uploaded_key = payload.key.clone();

    let config = aws_config::load_from_env().await;
    let s3 = aws_sdk_s3::Client::new(&config);
    write_json_to_s3(&s3, bucket, payload).await?;

    info!(bucket, key = %uploaded_key, gzip, "Report uploaded to S3");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Publisher,Year,Global_Sales\n\
                          A,1998,1.0\n\
                          A,2001,2.0\n\
                          B,1995,5.0\n\
                          C,,9.0\n";

    #[test]
    fn test_analyze_bytes_ranks_and_counts() {
        let analysis = analyze_bytes("inline", SAMPLE.as_bytes(), 10).unwrap();

        assert_eq!(analysis.stats.total_rows, 4);
        assert_eq!(analysis.stats.usable_rows, 3);
        let names: Vec<_> = analysis
            .report
            .publishers()
            .iter()
            .map(|p| p.publisher())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_analyze_bytes_bad_header_fails() {
        let result = analyze_bytes("inline", b"Name,Platform\nTetris,GB\n", 10);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_analyze_missing_source_fails() {
        let result = analyze("no/such/dir/vgsales.csv", 10).await;
        assert!(result.is_err());
    }
}
