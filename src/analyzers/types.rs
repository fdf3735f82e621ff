//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::area::UniversityArea;
use crate::analyzers::period::TimePeriod;
use crate::records::RiderClass;

/// Which trip counts a station ranking is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationView {
    Starts,
    Ends,
    Combined,
}

impl StationView {
    pub fn label(self) -> &'static str {
        match self {
            StationView::Starts => "starts",
            StationView::Ends => "ends",
            StationView::Combined => "combined",
        }
    }
}

/// One row of a station ranking, sorted descending by `trips`.
#[derive(Debug, Clone, Serialize)]
pub struct RankedStation {
    pub name: String,
    pub trips: u64,
    pub area: UniversityArea,
}

/// Per-day-of-week trip counts split by rider class, Monday=0 .. Sunday=6.
///
/// `synthetic` marks counts derived from the documented share fallback
/// rather than real per-record classes; consumers must never conflate the
/// two.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSplit {
    pub member: [u64; 7],
    pub casual: [u64; 7],
    pub synthetic: bool,
}

/// Member share of trips per day type, the documented demo fallback for
/// inputs that only carry pre-aggregated counts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DayTypeShares {
    pub weekday_member_share: f64,
    pub weekend_member_share: f64,
}

impl Default for DayTypeShares {
    fn default() -> Self {
        DayTypeShares {
            weekday_member_share: 0.7,
            weekend_member_share: 0.4,
        }
    }
}

/// One evaluated point of a density curve.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Smoothed duration density for one (period, rider class) bucket.
#[derive(Debug, Clone, Serialize)]
pub struct DurationCurve {
    pub period: TimePeriod,
    pub rider_class: RiderClass,
    /// Samples behind the curve, always at least the bucket minimum.
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    pub synthetic: bool,
    pub points: Vec<DensityPoint>,
}

/// Complete chart-ready bundle for one month of trips, written as JSON.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,

    pub trips_total: u64,
    pub records_skipped: u64,

    pub hourly: [u64; 24],
    pub by_day_of_week: [u64; 7],
    pub day_hour_matrix: [[u64; 24]; 7],
    pub weekday_avg: [f64; 24],
    pub weekend_avg: [f64; 24],

    pub by_class: ClassSplit,
    pub station_rankings: Vec<RankedStation>,
    pub duration_curves: Vec<DurationCurve>,
}

/// Summary entry for the month index listing.
#[derive(Debug, Serialize)]
pub struct MonthIndexEntry {
    pub month: String,
    pub trips: u64,
    pub members: u64,
    pub casuals: u64,
    pub top_station: Option<String>,
}

/// Top-level index of all digested months, written as `index.json`.
#[derive(Debug, Serialize)]
pub struct MonthIndex {
    pub generated_at: DateTime<Utc>,
    pub months: Vec<MonthIndexEntry>,
}
