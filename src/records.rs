//! Input schema for monthly trip exports.
//!
//! `RawTripRow` mirrors one CSV line exactly as published; `TripRecord` is
//! the validated form the aggregation pipeline works with. Validation is
//! per-row and best-effort: a row that fails any check is skipped, never
//! fatal.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Shortest trip kept, in minutes. Sub-minute rows are dock re-racks.
pub const MIN_DURATION_MIN: f64 = 1.0;
/// Longest trip kept, in minutes.
pub const MAX_DURATION_MIN: f64 = 180.0;

/// Subscription rider vs pay-per-ride rider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiderClass {
    Member,
    Casual,
}

impl RiderClass {
    /// Parses the `member_casual` CSV field. Anything outside the
    /// two-element set is rejected.
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "member" => Some(RiderClass::Member),
            "casual" => Some(RiderClass::Casual),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiderClass::Member => "member",
            RiderClass::Casual => "casual",
        }
    }
}

/// One line of a monthly trip CSV, every field optional so a single bad
/// column never aborts the read.
#[derive(Debug, Deserialize)]
pub struct RawTripRow {
    pub ride_id: Option<String>,
    pub rideable_type: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub start_station_name: Option<String>,
    pub start_station_id: Option<String>,
    pub end_station_name: Option<String>,
    pub end_station_id: Option<String>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lng: Option<f64>,
    pub member_casual: Option<String>,
}

/// One validated, completed ride.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub started_at: NaiveDateTime,
    pub duration_minutes: f64,
    pub rider_class: RiderClass,
    pub start_station: String,
    pub end_station: Option<String>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
}

impl TripRecord {
    /// Validates a raw CSV row into a `TripRecord`.
    ///
    /// Returns `None` when the row is unusable: missing or unparseable
    /// timestamps, duration outside [`MIN_DURATION_MIN`, `MAX_DURATION_MIN`],
    /// a rider class outside the two-element set, or no start station name.
    pub fn from_raw(row: RawTripRow) -> Option<Self> {
        let started_at = parse_timestamp(row.started_at.as_deref()?)?;
        let ended_at = parse_timestamp(row.ended_at.as_deref()?)?;

        let duration_minutes = (ended_at - started_at).num_seconds() as f64 / 60.0;
        if !(MIN_DURATION_MIN..=MAX_DURATION_MIN).contains(&duration_minutes) {
            return None;
        }

        let rider_class = RiderClass::from_field(row.member_casual.as_deref()?)?;

        let start_station = row.start_station_name.filter(|n| !n.trim().is_empty())?;
        let end_station = row.end_station_name.filter(|n| !n.trim().is_empty());

        Some(TripRecord {
            started_at,
            duration_minutes,
            rider_class,
            start_station,
            end_station,
            start_lat: row.start_lat,
            start_lng: row.start_lng,
        })
    }

    /// Start hour of day, 0-23.
    pub fn hour(&self) -> u32 {
        self.started_at.hour()
    }

    /// Day of week normalized to Monday=0 .. Sunday=6.
    ///
    /// The source timestamp's native numbering has Sunday=0, so the value is
    /// remapped with `(day + 6) % 7`.
    pub fn day_of_week(&self) -> u32 {
        let native = self.started_at.weekday().num_days_from_sunday();
        (native + 6) % 7
    }
}

/// One physical dock location with its aggregate trip counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Trips starting at this station.
    pub trips: u64,
    /// Trips ending at this station, when tracked separately.
    pub end_trips: Option<u64>,
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    // Exports switched to fractional seconds partway through; %.f accepts both.
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(started: &str, ended: &str, class: &str, station: &str) -> RawTripRow {
        RawTripRow {
            ride_id: Some("abc123".to_string()),
            rideable_type: Some("classic_bike".to_string()),
            started_at: Some(started.to_string()),
            ended_at: Some(ended.to_string()),
            start_station_name: Some(station.to_string()),
            start_station_id: None,
            end_station_name: Some("Ames St at Main St".to_string()),
            end_station_id: None,
            start_lat: Some(42.3601),
            start_lng: Some(-71.0912),
            end_lat: None,
            end_lng: None,
            member_casual: Some(class.to_string()),
        }
    }

    #[test]
    fn test_valid_row_parses() {
        let trip = TripRecord::from_raw(raw(
            "2025-01-06 08:15:00",
            "2025-01-06 08:27:30",
            "member",
            "MIT at Mass Ave",
        ))
        .unwrap();

        assert_eq!(trip.hour(), 8);
        assert_eq!(trip.duration_minutes, 12.5);
        assert_eq!(trip.rider_class, RiderClass::Member);
    }

    #[test]
    fn test_fractional_seconds_accepted() {
        let trip = TripRecord::from_raw(raw(
            "2025-01-06 08:15:00.123",
            "2025-01-06 08:30:00.456",
            "casual",
            "Central Square at Mass Ave",
        ));
        assert!(trip.is_some());
    }

    #[test]
    fn test_duration_bounds_rejected() {
        // 30 seconds: below the 1-minute floor
        assert!(
            TripRecord::from_raw(raw(
                "2025-01-06 08:15:00",
                "2025-01-06 08:15:30",
                "member",
                "MIT at Mass Ave",
            ))
            .is_none()
        );

        // Four hours: above the 180-minute cap
        assert!(
            TripRecord::from_raw(raw(
                "2025-01-06 08:15:00",
                "2025-01-06 12:15:00",
                "member",
                "MIT at Mass Ave",
            ))
            .is_none()
        );
    }

    #[test]
    fn test_unknown_rider_class_rejected() {
        assert!(
            TripRecord::from_raw(raw(
                "2025-01-06 08:15:00",
                "2025-01-06 08:30:00",
                "Subscriber",
                "MIT at Mass Ave",
            ))
            .is_none()
        );
    }

    #[test]
    fn test_missing_start_station_rejected() {
        let mut row = raw(
            "2025-01-06 08:15:00",
            "2025-01-06 08:30:00",
            "member",
            "ignored",
        );
        row.start_station_name = Some("   ".to_string());
        assert!(TripRecord::from_raw(row).is_none());
    }

    #[test]
    fn test_day_of_week_remap_is_bijection() {
        // 2025-01-05 is a Sunday; walking one week covers every native value.
        let mut seen = [false; 7];
        for offset in 0..7 {
            let row = raw(
                &format!("2025-01-{:02} 10:00:00", 5 + offset),
                &format!("2025-01-{:02} 10:30:00", 5 + offset),
                "member",
                "MIT at Mass Ave",
            );
            let trip = TripRecord::from_raw(row).unwrap();
            seen[trip.day_of_week() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_sunday_maps_to_six() {
        // 2025-01-05 is a Sunday: native 0 remaps to 6.
        let trip = TripRecord::from_raw(raw(
            "2025-01-05 10:00:00",
            "2025-01-05 10:30:00",
            "casual",
            "MIT at Mass Ave",
        ))
        .unwrap();
        assert_eq!(trip.day_of_week(), 6);
    }
}
