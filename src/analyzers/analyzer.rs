//! End-to-end digestion: monthly CSVs in, JSON bundles out.

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analyzers::aggregate::{class_split, rank_stations};
use crate::analyzers::area::AreaConfig;
use crate::analyzers::density::{DEFAULT_BANDWIDTH, duration_curves, synthetic_duration_curves};
use crate::analyzers::period::PeriodScheme;
use crate::analyzers::types::{
    Dashboard, DayTypeShares, MonthIndex, MonthIndexEntry, StationView,
};
use crate::output::write_json;
use crate::parser::{parse_trips, stations_from_trips};
use crate::records::TripRecord;
use crate::summary::UsageSummary;

pub const SCHEMA_VERSION: u8 = 1;
pub const RANKING_TOP_N: usize = 15;

/// Fixed seed so fallback demo curves come out identical run to run.
const SYNTHETIC_SEED: u64 = 0x5eed_b1ce;

/// Builds the complete dashboard bundle for one set of validated trips.
///
/// Duration curves come from the real records; only when no bucket reaches
/// the sample minimum does the digest fall back to flagged synthetic curves
/// derived from the day x hour matrix.
pub fn digest(
    trips: &[TripRecord],
    records_skipped: u64,
    areas: &AreaConfig,
    scheme: PeriodScheme,
) -> Dashboard {
    let usage = UsageSummary::from_trips(trips);
    let stations = stations_from_trips(trips);
    let station_rankings =
        rank_stations(&stations, StationView::Combined, RANKING_TOP_N, None, areas);

    let mut curves = duration_curves(trips, scheme, DEFAULT_BANDWIDTH);
    if curves.is_empty() && usage.trips_total > 0 {
        warn!("No duration bucket reached the sample minimum, using synthetic demo curves");
        curves = synthetic_duration_curves(
            &usage.day_hour_matrix,
            scheme,
            &DayTypeShares::default(),
            SYNTHETIC_SEED,
            DEFAULT_BANDWIDTH,
        );
    }

    Dashboard {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        trips_total: usage.trips_total,
        records_skipped,
        hourly: usage.hourly,
        by_day_of_week: usage.by_day_of_week,
        weekday_avg: usage.weekday_avg(),
        weekend_avg: usage.weekend_avg(),
        day_hour_matrix: usage.day_hour_matrix,
        by_class: class_split(trips),
        station_rankings,
        duration_curves: curves,
    }
}

/// Digests a single monthly CSV file into a dashboard bundle.
pub fn digest_file(path: &Path, areas: &AreaConfig, scheme: PeriodScheme) -> Result<Dashboard> {
    let bytes = fs::read(path)?;
    let parsed = parse_trips(&bytes)?;
    info!(
        path = %path.display(),
        trips = parsed.trips.len(),
        skipped = parsed.skipped,
        "Monthly CSV parsed"
    );
    Ok(digest(&parsed.trips, parsed.skipped, areas, scheme))
}

/// Digests every `*-tripdata.csv` under `data_dir`, writing one bundle per
/// month to `out_dir/aggregates/` plus a top-level `index.json`.
pub fn digest_dir(
    data_dir: &str,
    out_dir: &str,
    areas: &AreaConfig,
    scheme: PeriodScheme,
) -> Result<MonthIndex> {
    let mut paths: Vec<PathBuf> = fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("-tripdata.csv"))
        })
        .collect();
    paths.sort();

    let mut months = Vec::new();

    for path in &paths {
        let month = month_of(path);
        let dashboard = digest_file(path, areas, scheme)?;

        let out_path = Path::new(out_dir)
            .join("aggregates")
            .join(format!("{month}.json"));
        write_json(&out_path, &dashboard)?;

        months.push(MonthIndexEntry {
            month,
            trips: dashboard.trips_total,
            members: dashboard.by_class.member.iter().sum(),
            casuals: dashboard.by_class.casual.iter().sum(),
            top_station: dashboard.station_rankings.first().map(|r| r.name.clone()),
        });
    }

    let index = MonthIndex {
        generated_at: Utc::now(),
        months,
    };
    write_json(Path::new(out_dir).join("index.json"), &index)?;

    info!(months = index.months.len(), out_dir, "Digest complete");
    Ok(index)
}

/// `202501-bluebikes-tripdata.csv` → `202501`.
fn month_of(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.split('-').next().unwrap_or(stem).to_string()
}
