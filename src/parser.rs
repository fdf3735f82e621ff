//! CSV parsing for monthly trip exports.
//!
//! Reading is best-effort: rows that fail to deserialize or validate are
//! skipped and counted, so one bad line never loses the month.

use anyhow::Result;
use std::collections::HashMap;
use tracing::debug;

use crate::records::{RawTripRow, StationRecord, TripRecord};

/// Result of one CSV read: the usable trips plus how many rows were dropped.
#[derive(Debug)]
pub struct ParsedTrips {
    pub trips: Vec<TripRecord>,
    pub skipped: u64,
}

/// Decodes a monthly trip CSV from raw bytes.
///
/// # Errors
///
/// Returns an error only when the header row itself is unreadable; individual
/// record defects are skipped, not fatal.
pub fn parse_trips(bytes: &[u8]) -> Result<ParsedTrips> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let mut trips = Vec::new();
    let mut skipped = 0u64;

    for result in rdr.deserialize() {
        let row: RawTripRow = match result {
            Ok(row) => row,
            Err(e) => {
                debug!(error = %e, "Unreadable CSV row, skipping");
                skipped += 1;
                continue;
            }
        };

        match TripRecord::from_raw(row) {
            Some(trip) => trips.push(trip),
            None => skipped += 1,
        }
    }

    Ok(ParsedTrips { trips, skipped })
}

/// Groups trips into one [`StationRecord`] per start station.
///
/// Only trips carrying start coordinates contribute; the first observed
/// lat/lng wins and is rounded to 4 decimal places. `end_trips` counts every
/// trip ending at the station. Output order is first appearance in the input.
pub fn stations_from_trips(trips: &[TripRecord]) -> Vec<StationRecord> {
    let mut stations: Vec<StationRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for trip in trips {
        let (Some(lat), Some(lng)) = (trip.start_lat, trip.start_lng) else {
            continue;
        };

        match index.get(&trip.start_station) {
            Some(&i) => stations[i].trips += 1,
            None => {
                index.insert(trip.start_station.clone(), stations.len());
                stations.push(StationRecord {
                    name: trip.start_station.clone(),
                    lat: round4(lat),
                    lng: round4(lng),
                    trips: 1,
                    end_trips: Some(0),
                });
            }
        }
    }

    for trip in trips {
        if let Some(end) = &trip.end_station {
            if let Some(&i) = index.get(end) {
                *stations[i].end_trips.get_or_insert(0) += 1;
            }
        }
    }

    stations
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
