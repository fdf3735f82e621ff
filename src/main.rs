//! CLI entry point for the bikeshare stats tool.
//!
//! Provides subcommands for digesting a single monthly trip CSV into a
//! dashboard JSON bundle, digesting a whole directory of monthly exports,
//! and listing ranked stations.

use anyhow::Result;
use bikeshare_stats::analyzers::aggregate::rank_stations;
use bikeshare_stats::analyzers::analyzer::{digest, digest_dir};
use bikeshare_stats::analyzers::area::{AreaConfig, UniversityArea};
use bikeshare_stats::analyzers::period::PeriodScheme;
use bikeshare_stats::analyzers::types::StationView;
use bikeshare_stats::fetch::{BasicClient, fetch_bytes};
use bikeshare_stats::output::{rankings_to_csv, write_json};
use bikeshare_stats::parser::{parse_trips, stations_from_trips};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "A tool to summarize bike-share trip data for dashboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Digest one monthly trip CSV into a dashboard JSON bundle
    Digest {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON file to write the bundle to
        #[arg(short, long, default_value = "dashboard.json")]
        output: String,

        /// Time-period partition for duration curves
        #[arg(long, value_enum, default_value = "four-way")]
        periods: SchemeArg,

        /// Optional JSON file with university region definitions
        #[arg(long)]
        regions: Option<String>,
    },
    /// Digest every monthly CSV in a directory and write an index
    DigestAll {
        /// Directory containing *-tripdata.csv files
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: String,

        /// Directory to write per-month bundles and index.json to
        #[arg(short, long, default_value = "site")]
        out_dir: String,

        /// Time-period partition for duration curves
        #[arg(long, value_enum, default_value = "four-way")]
        periods: SchemeArg,

        /// Optional JSON file with university region definitions
        #[arg(long)]
        regions: Option<String>,
    },
    /// List the busiest stations from a monthly trip CSV
    Stations {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// How many stations to show
        #[arg(short = 'n', long, default_value_t = 15)]
        top: usize,

        /// Which trip counts to rank by
        #[arg(long, value_enum, default_value = "combined")]
        view: ViewArg,

        /// Restrict the ranking to one university area
        #[arg(long, value_enum)]
        area: Option<AreaArg>,

        /// Optional CSV file to export the ranking to
        #[arg(long)]
        export: Option<String>,

        /// Optional JSON file with university region definitions
        #[arg(long)]
        regions: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    FourWay,
    SixWay,
}

impl From<SchemeArg> for PeriodScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::FourWay => PeriodScheme::FourWay,
            SchemeArg::SixWay => PeriodScheme::SixWay,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Starts,
    Ends,
    Combined,
}

impl From<ViewArg> for StationView {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Starts => StationView::Starts,
            ViewArg::Ends => StationView::Ends,
            ViewArg::Combined => StationView::Combined,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AreaArg {
    Mit,
    Harvard,
    Bu,
    Neu,
    None,
}

impl From<AreaArg> for UniversityArea {
    fn from(arg: AreaArg) -> Self {
        match arg {
            AreaArg::Mit => UniversityArea::Mit,
            AreaArg::Harvard => UniversityArea::Harvard,
            AreaArg::Bu => UniversityArea::Bu,
            AreaArg::Neu => UniversityArea::Northeastern,
            AreaArg::None => UniversityArea::None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Digest {
            source,
            output,
            periods,
            regions,
        } => {
            let areas = load_areas(regions.as_deref())?;
            let bytes = fetcher(&source).await?;
            let parsed = parse_trips(&bytes)?;
            info!(
                trips = parsed.trips.len(),
                skipped = parsed.skipped,
                "Trip CSV parsed"
            );

            let dashboard = digest(&parsed.trips, parsed.skipped, &areas, periods.into());
            write_json(&output, &dashboard)?;

            info!(
                trips = dashboard.trips_total,
                stations = dashboard.station_rankings.len(),
                curves = dashboard.duration_curves.len(),
                output = %output,
                "Dashboard bundle written"
            );
        }
        Commands::DigestAll {
            data_dir,
            out_dir,
            periods,
            regions,
        } => {
            let areas = load_areas(regions.as_deref())?;
            let index = digest_dir(&data_dir, &out_dir, &areas, periods.into())?;

            for entry in &index.months {
                info!(
                    month = %entry.month,
                    trips = entry.trips,
                    members = entry.members,
                    casuals = entry.casuals,
                    top_station = entry.top_station.as_deref().unwrap_or("-"),
                    "Month digested"
                );
            }
        }
        Commands::Stations {
            source,
            top,
            view,
            area,
            export,
            regions,
        } => {
            let areas = load_areas(regions.as_deref())?;
            let bytes = fetcher(&source).await?;
            let parsed = parse_trips(&bytes)?;

            let stations = stations_from_trips(&parsed.trips);
            let view: StationView = view.into();
            let ranked = rank_stations(&stations, view, top, area.map(Into::into), &areas);

            for (i, row) in ranked.iter().enumerate() {
                info!(
                    rank = i + 1,
                    station = %row.name,
                    trips = row.trips,
                    area = row.area.label(),
                    "Station"
                );
            }

            info!(
                total_stations = stations.len(),
                shown = ranked.len(),
                view = view.label(),
                "Station ranking summary"
            );

            if let Some(path) = export {
                rankings_to_csv(&path, &ranked)?;
                info!(path = %path, "Ranking exported");
            }
        }
    }

    Ok(())
}

/// Loads region definitions from a JSON file, or the built-in Boston set.
fn load_areas(path: Option<&str>) -> Result<AreaConfig> {
    match path {
        Some(path) => AreaConfig::load(path),
        None => Ok(AreaConfig::default()),
    }
}

/// Loads trip data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url)?
    };
    Ok(bytes)
}
