//! Usage counting over validated trips.
//!
//! One pass over the records produces every count-shaped summary the
//! dashboard needs; the per-hour averages are derived from the day x hour
//! matrix afterwards.

use serde::Serialize;

use crate::records::{RiderClass, TripRecord};

/// Count-shaped summaries for one set of trips.
///
/// All counting is commutative, so the result does not depend on input
/// order. Empty input produces all zeros.
#[derive(Debug, Default, Serialize)]
pub struct UsageSummary {
    pub trips_total: u64,

    /// Trips per start hour, index = hour of day.
    pub hourly: [u64; 24],
    /// Trips per day of week, Monday=0 .. Sunday=6.
    pub by_day_of_week: [u64; 7],
    /// Full day x hour count matrix, rows Monday=0 .. Sunday=6.
    pub day_hour_matrix: [[u64; 24]; 7],

    pub members: u64,
    pub casuals: u64,
}

impl UsageSummary {
    /// Counts every trip into the hourly, day-of-week, day x hour, and
    /// rider-class buckets.
    pub fn from_trips(trips: &[TripRecord]) -> Self {
        let mut s = UsageSummary::default();

        for trip in trips {
            let hour = trip.hour() as usize;
            let day = trip.day_of_week() as usize;

            s.trips_total += 1;
            s.hourly[hour] += 1;
            s.by_day_of_week[day] += 1;
            s.day_hour_matrix[day][hour] += 1;

            match trip.rider_class {
                RiderClass::Member => s.members += 1,
                RiderClass::Casual => s.casuals += 1,
            }
        }

        s
    }

    /// Per-hour mean across the five weekday rows.
    pub fn weekday_avg(&self) -> [f64; 24] {
        row_means(&self.day_hour_matrix[0..5])
    }

    /// Per-hour mean across the two weekend rows.
    pub fn weekend_avg(&self) -> [f64; 24] {
        row_means(&self.day_hour_matrix[5..7])
    }

    /// Per-hour mean across all seven rows.
    pub fn all_days_avg(&self) -> [f64; 24] {
        row_means(&self.day_hour_matrix)
    }
}

fn row_means(rows: &[[u64; 24]]) -> [f64; 24] {
    let mut means = [0.0f64; 24];
    if rows.is_empty() {
        return means;
    }

    for (hour, mean) in means.iter_mut().enumerate() {
        let sum: u64 = rows.iter().map(|row| row[hour]).sum();
        *mean = sum as f64 / rows.len() as f64;
    }

    means
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RiderClass;
    use chrono::NaiveDateTime;

    // 2025-01-06 is a Monday.
    fn trip(day: u32, hour: u32, class: RiderClass) -> TripRecord {
        let started = format!("2025-01-{:02} {:02}:15:00", 6 + day, hour);
        TripRecord {
            started_at: NaiveDateTime::parse_from_str(&started, "%Y-%m-%d %H:%M:%S").unwrap(),
            duration_minutes: 12.0,
            rider_class: class,
            start_station: "MIT at Mass Ave".to_string(),
            end_station: None,
            start_lat: None,
            start_lng: None,
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let s = UsageSummary::from_trips(&[]);
        assert_eq!(s.trips_total, 0);
        assert_eq!(s.hourly, [0; 24]);
        assert_eq!(s.by_day_of_week, [0; 7]);
        assert_eq!(s.weekday_avg(), [0.0; 24]);
        assert_eq!(s.weekend_avg(), [0.0; 24]);
    }

    #[test]
    fn test_hourly_counts() {
        let trips = vec![
            trip(0, 8, RiderClass::Member),
            trip(0, 8, RiderClass::Casual),
            trip(0, 20, RiderClass::Member),
        ];
        let s = UsageSummary::from_trips(&trips);

        assert_eq!(s.hourly[8], 2);
        assert_eq!(s.hourly[20], 1);
        let other: u64 = s
            .hourly
            .iter()
            .enumerate()
            .filter(|(h, _)| *h != 8 && *h != 20)
            .map(|(_, c)| c)
            .sum();
        assert_eq!(other, 0);
        assert_eq!(s.members, 2);
        assert_eq!(s.casuals, 1);
    }

    #[test]
    fn test_hourly_sum_matches_total() {
        let trips: Vec<_> = (0..7)
            .flat_map(|d| (0..24).map(move |h| trip(d, h, RiderClass::Member)))
            .collect();
        let s = UsageSummary::from_trips(&trips);

        assert_eq!(s.hourly.iter().sum::<u64>(), s.trips_total);
        assert_eq!(s.by_day_of_week.iter().sum::<u64>(), s.trips_total);
    }

    #[test]
    fn test_day_of_week_rows() {
        // day offsets 0..6 land on Monday..Sunday
        let trips = vec![
            trip(0, 9, RiderClass::Member),
            trip(5, 9, RiderClass::Casual),
            trip(6, 9, RiderClass::Casual),
        ];
        let s = UsageSummary::from_trips(&trips);

        assert_eq!(s.by_day_of_week[0], 1);
        assert_eq!(s.by_day_of_week[5], 1);
        assert_eq!(s.by_day_of_week[6], 1);
        assert_eq!(s.day_hour_matrix[6][9], 1);
    }

    #[test]
    fn test_weekday_weekend_averages() {
        // 5 weekday trips at hour 8, 1 weekend trip at hour 8
        let trips = vec![
            trip(0, 8, RiderClass::Member),
            trip(1, 8, RiderClass::Member),
            trip(2, 8, RiderClass::Member),
            trip(3, 8, RiderClass::Member),
            trip(4, 8, RiderClass::Member),
            trip(5, 8, RiderClass::Casual),
        ];
        let s = UsageSummary::from_trips(&trips);

        assert_eq!(s.weekday_avg()[8], 1.0);
        assert_eq!(s.weekend_avg()[8], 0.5);
        assert_eq!(s.weekday_avg()[9], 0.0);
        assert_eq!(s.all_days_avg()[8], 6.0 / 7.0);

        // mean over the matrix rows matches a hand computation
        let manual: f64 = (0..5).map(|d| s.day_hour_matrix[d][8] as f64).sum::<f64>() / 5.0;
        assert_eq!(s.weekday_avg()[8], manual);
    }
}
