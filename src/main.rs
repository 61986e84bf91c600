//! CLI entry point for the trip punctuality tool.
//!
//! Provides subcommands for building a full report from a trips CSV, writing
//! the corrected per-trip delays, and exporting a single summary table.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_punctuality::analyzers::company_delay::{
    delay_distribution, mean_delay_by_company, mean_delay_by_company_direction,
};
use trip_punctuality::analyzers::frequency::{average_delay_by_time, frequency_by_time};
use trip_punctuality::analyzers::performance::{performance_by_company, performance_by_direction};
use trip_punctuality::analyzers::ranking::{top_n_delayed, top_n_unperformed};
use trip_punctuality::analyzers::report::{analyze_trips, prepare_trips};
use trip_punctuality::analyzers::status_share::{companies_in, delay_status_percentages};
use trip_punctuality::{
    config::ReportConfig,
    output::{print_json, print_pretty, write_json, write_table},
    record::{PerformedTrip, TripRecord},
    source::{DataSource, load_trips},
    time_bucket::TimeGrouping,
};

#[derive(Parser)]
#[command(name = "trip_punctuality")]
#[command(about = "Delay and punctuality statistics for scheduled transit trips", long_about = None)]
struct Cli {
    /// JSON report configuration (companies, outlier correction, top N)
    #[arg(long, global = true, env = "TRIP_STATS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the number of lines kept in the top-N rankings
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Override the minutes added to or removed from wrapped delays
    #[arg(long, global = true)]
    day_minutes: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every summary table for a trips CSV
    Report {
        /// Path or URL of the trips CSV
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Extra CSV holding unperformed trips only
        #[arg(short, long, value_name = "FILE_OR_URL")]
        unperformed: Option<String>,

        /// Write the report as JSON to this file instead of logging it
        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Write the corrected per-trip delays as CSV
    Delays {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long, default_value = "delays.csv")]
        output: String,
    },
    /// Write a single summary table as CSV
    Summary {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long, value_name = "FILE_OR_URL")]
        unperformed: Option<String>,

        #[arg(short, long, value_enum)]
        table: Table,

        /// Time bucket for frequency and average-delay tables: "hour" or "weekday"
        #[arg(long, default_value = "hour")]
        by: String,

        #[arg(short, long, default_value = "summary.csv")]
        output: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    UnperformedFrequency,
    TopUnperformed,
    TopDelayed,
    StatusShares,
    AverageDelay,
    CompanyDelay,
    CompanyDirectionDelay,
    DelayDistribution,
    DirectionPerformance,
    CompanyPerformance,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/trip_punctuality.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_punctuality.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Report {
            source,
            unperformed,
            output,
            format,
        } => {
            let records = load_records(&source, unperformed.as_deref())?;
            let (_, report) = analyze_trips(records, &config)?;

            match (output, format) {
                (Some(path), _) => write_json(&path, &report)?,
                (None, Format::Json) => print_json(&report)?,
                (None, Format::Pretty) => print_pretty(&report),
            }
        }
        Commands::Delays { source, output } => {
            let (trips, _) = prepare_trips(load_records(&source, None)?, &config.outlier)?;
            write_table(&output, &trips)?;
        }
        Commands::Summary {
            source,
            unperformed,
            table,
            by,
            output,
        } => {
            let records = load_records(&source, unperformed.as_deref())?;
            let (trips, unperformed) = prepare_trips(records, &config.outlier)?;
            write_summary(table, &by, &trips, &unperformed, &config, &output)?;
        }
    }

    Ok(())
}

/// Reads the config file, if any, and applies the command-line overrides.
fn load_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = ReportConfig::load_or_default(cli.config.as_deref())?;
    if let Some(n) = cli.top_n {
        config.top_n = n;
    }
    if let Some(minutes) = cli.day_minutes {
        config.outlier = config.outlier.with_day_minutes(minutes);
    }
    info!(
        top_n = config.top_n,
        day_minutes = config.outlier.day_minutes,
        companies = ?config.companies,
        "Configuration ready"
    );
    Ok(config)
}

/// Loads the main source and appends the optional unperformed-only source.
fn load_records(source: &str, unperformed_source: Option<&str>) -> Result<Vec<TripRecord>> {
    let mut records = load_trips(&DataSource::parse(source))?;
    if let Some(extra) = unperformed_source {
        records.extend(load_trips(&DataSource::parse(extra))?);
    }
    Ok(records)
}

fn write_summary(
    table: Table,
    by: &str,
    trips: &[PerformedTrip],
    unperformed: &[TripRecord],
    config: &ReportConfig,
    output: &str,
) -> Result<()> {
    match table {
        Table::UnperformedFrequency => {
            let by: TimeGrouping = by.parse()?;
            write_table(output, &frequency_by_time(unperformed, by))
        }
        Table::TopUnperformed => write_table(output, &top_n_unperformed(unperformed, config.top_n)),
        Table::TopDelayed => write_table(output, &top_n_delayed(trips, config.top_n)),
        Table::StatusShares => {
            let companies = config.companies.clone().unwrap_or_else(|| companies_in(trips));
            write_table(output, &delay_status_percentages(trips, &companies)?)
        }
        Table::AverageDelay => {
            let by: TimeGrouping = by.parse()?;
            write_table(output, &average_delay_by_time(trips, by))
        }
        Table::CompanyDelay => write_table(output, &mean_delay_by_company(trips).companies),
        Table::CompanyDirectionDelay => write_table(output, &mean_delay_by_company_direction(trips)),
        Table::DelayDistribution => write_table(output, &delay_distribution(trips)),
        Table::DirectionPerformance => {
            write_table(output, &performance_by_direction(trips, unperformed))
        }
        Table::CompanyPerformance => write_table(output, &performance_by_company(trips, unperformed)),
    }
}
