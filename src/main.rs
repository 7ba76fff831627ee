//! CLI entry point for the publisher sales ranker.
//!
//! Provides subcommands for ranking publishers from a sales CSV, inspecting
//! how many rows are usable, and publishing the chart report to S3.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vgsales_rank::analyzers::aggregate::TOP_N;
use vgsales_rank::analyzers::analyzer::{analyze, publish};
use vgsales_rank::output::{print_pretty, to_json, write_csv, write_csv_to, write_json};

#[derive(Parser)]
#[command(name = "vgsales_rank")]
#[command(about = "Rank video-game publishers by global sales, split pre/post 2000", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank publishers from a sales CSV file or URL
    Rank {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL", default_value = "vgsales.csv")]
        source: String,

        /// Number of publishers to keep
        #[arg(short = 'n', long, default_value_t = TOP_N)]
        top: usize,

        /// Output format (inferred from the output file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// File to write a json or csv report to (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Report how many rows of a sales CSV are usable
    Inspect {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL", default_value = "vgsales.csv")]
        source: String,
    },
    /// Rank publishers and upload the JSON report to S3
    Publish {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL", default_value = "vgsales.csv")]
        source: String,

        /// S3 bucket name to upload the report to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: String,

        /// Object key for the report
        #[arg(long, default_value = "aggregates/top_publishers.json")]
        key: String,

        /// Number of publishers to keep
        #[arg(short = 'n', long, default_value_t = TOP_N)]
        top: usize,

        /// Gzip compress the report before uploading
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

/// Picks the report format for `rank`.
///
/// Without `--format`, a `.json` or `.csv` output path selects that format and
/// no output path means the logged table. The logged table cannot go to a file.
fn resolve_format(format: Option<Format>, output: Option<&str>) -> Result<Format> {
    let format = match (format, output) {
        (Some(format), _) => format,
        (None, None) => Format::Pretty,
        (None, Some(path)) => match Path::new(path).extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => bail!("Cannot infer report format from `{path}`; pass --format json or --format csv"),
        },
    };

    if format == Format::Pretty {
        if let Some(path) = output {
            bail!("--format pretty only logs the table; use json or csv to write `{path}`");
        }
    }

    Ok(format)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/vgsales_rank.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vgsales_rank.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            source,
            top,
            format,
            output,
        } => {
            let format = resolve_format(format, output.as_deref())?;
            let analysis = analyze(&source, top).await?;
            let report = &analysis.report;

            match (format, output) {
                (Format::Pretty, _) => print_pretty(report),
                (Format::Json, Some(path)) => {
                    write_json(&path, report)?;
                    info!(path = %path, "JSON report written");
                }
                (Format::Json, None) => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&to_json(report)?)?;
                    stdout.write_all(b"\n")?;
                }
                (Format::Csv, Some(path)) => {
                    write_csv(&path, report.publishers())?;
                    info!(path = %path, "CSV report written");
                }
                (Format::Csv, None) => write_csv_to(std::io::stdout().lock(), report.publishers())?,
            }
        }
        Commands::Inspect { source } => {
            let analysis = analyze(&source, TOP_N).await?;
            let stats = &analysis.stats;

            info!(
                total_rows = stats.total_rows,
                usable_rows = stats.usable_rows,
                usable_pct = stats.usable_pct(),
                missing_year = stats.missing_year,
                missing_sales = stats.missing_sales,
                publishers = stats.publishers,
                "Source summary"
            );
        }
        Commands::Publish {
            source,
            s3_bucket,
            key,
            top,
            gzip,
        } => {
            publish(&source, top, &s3_bucket, &key, gzip).await?;
        }
    }

    Ok(())
}
