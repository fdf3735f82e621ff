//! Station rankings and rider-class splits.

use std::collections::HashMap;

use crate::analyzers::area::{AreaConfig, UniversityArea};
use crate::analyzers::types::{ClassSplit, DayTypeShares, RankedStation, StationView};
use crate::records::{RiderClass, StationRecord, TripRecord};

/// Display-name replacements, applied in order. Patterns overlap (the
/// broad `at Mass Ave` rule fires before the station-specific ones), so the
/// order is load-bearing.
const NAME_REPLACEMENTS: &[(&str, &str)] = &[
    ("- Cambridge St", ""),
    ("at Mass Ave", "@ Mass Ave"),
    ("at Amherst St", "@ Amherst"),
    ("at Main St", "@ Main"),
    ("at Vassar St", "@ Vassar"),
    ("Central Square at Mass Ave", "Central Square"),
    ("MIT Stata Center at Vassar St / Main St", "Stata Center"),
    ("Central Square at Mass Ave / Essex St", "Central Square"),
    ("MIT at Mass Ave / Amherst St", "MIT Mass Ave"),
    ("MIT Pacific St at Purrington St", "MIT Pacific"),
    ("Linear Park - Mass. Ave. at Cameron Ave.", "Linear Park"),
    ("Davis Square", "Davis Sq"),
    ("MIT Vassar St", "Vassar St"),
    ("Ames St at Main", "Ames @ Main"),
];

/// Applies the ordered display-name replacements and trims the result.
pub fn clean_station_name(name: &str) -> String {
    let mut cleaned = name.to_string();
    for (from, to) in NAME_REPLACEMENTS {
        cleaned = cleaned.replace(from, to);
    }
    cleaned.trim().to_string()
}

/// Ranks stations by trip count under the requested view.
///
/// Names are cleaned first and stations sharing a display name merge their
/// counts. The sort is stable and descending, so tied stations keep their
/// input order; the result is cut to `top_n` rows. `area_filter` restricts
/// the ranking to one university area before the cut.
pub fn rank_stations(
    stations: &[StationRecord],
    view: StationView,
    top_n: usize,
    area_filter: Option<UniversityArea>,
    areas: &AreaConfig,
) -> Vec<RankedStation> {
    struct Merged {
        name: String,
        lat: f64,
        lng: f64,
        starts: u64,
        ends: u64,
    }

    let mut merged: Vec<Merged> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for station in stations {
        let name = clean_station_name(&station.name);
        match index.get(&name) {
            Some(&i) => {
                merged[i].starts += station.trips;
                merged[i].ends += station.end_trips.unwrap_or(0);
            }
            None => {
                index.insert(name.clone(), merged.len());
                merged.push(Merged {
                    name,
                    lat: station.lat,
                    lng: station.lng,
                    starts: station.trips,
                    ends: station.end_trips.unwrap_or(0),
                });
            }
        }
    }

    let mut ranked: Vec<RankedStation> = merged
        .into_iter()
        .map(|m| {
            let area = areas.classify(&m.name, m.lat, m.lng);
            let trips = match view {
                StationView::Starts => m.starts,
                StationView::Ends => m.ends,
                StationView::Combined => m.starts + m.ends,
            };
            RankedStation {
                name: m.name,
                trips,
                area,
            }
        })
        .filter(|r| area_filter.is_none_or(|a| r.area == a))
        .collect();

    ranked.sort_by(|a, b| b.trips.cmp(&a.trips));
    ranked.truncate(top_n);
    ranked
}

/// Counts trips per day of week split by rider class. Real data, so
/// `synthetic` is false.
pub fn class_split(trips: &[TripRecord]) -> ClassSplit {
    let mut split = ClassSplit {
        member: [0; 7],
        casual: [0; 7],
        synthetic: false,
    };

    for trip in trips {
        let day = trip.day_of_week() as usize;
        match trip.rider_class {
            RiderClass::Member => split.member[day] += 1,
            RiderClass::Casual => split.casual[day] += 1,
        }
    }

    split
}

/// Splits a pre-aggregated day x hour matrix into per-class day counts using
/// the day-type member shares. The result is flagged `synthetic`: the shares
/// are a documented demo fallback, not observed classes.
pub fn class_split_from_matrix(matrix: &[[u64; 24]; 7], shares: &DayTypeShares) -> ClassSplit {
    let mut split = ClassSplit {
        member: [0; 7],
        casual: [0; 7],
        synthetic: true,
    };

    for (day, row) in matrix.iter().enumerate() {
        let total: u64 = row.iter().sum();
        let share = if day >= 5 {
            shares.weekend_member_share
        } else {
            shares.weekday_member_share
        };

        let members = ((total as f64) * share).round() as u64;
        let members = members.min(total);
        split.member[day] = members;
        split.casual[day] = total - members;
    }

    split
}
