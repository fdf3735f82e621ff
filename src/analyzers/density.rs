//! Kernel density estimation for trip-duration summaries.
//!
//! Produces the smoothed curves behind the violin charts: one curve per
//! (period, rider class) bucket, skipping buckets too small to estimate
//! honestly. A seeded synthetic generator covers demo/empty-data setups and
//! always flags its output.

use std::collections::HashMap;

use crate::analyzers::period::{PeriodScheme, TimePeriod};
use crate::analyzers::types::{DayTypeShares, DensityPoint, DurationCurve};
use crate::analyzers::utility::{mean, median};
use crate::records::{RiderClass, TripRecord};

pub const DEFAULT_BANDWIDTH: f64 = 4.0;
/// Query points per curve, evenly spaced over the plottable range.
pub const DENSITY_POINTS: usize = 50;
/// Buckets below this sample count are omitted rather than plotted.
pub const MIN_BUCKET_SAMPLES: usize = 10;
/// Durations above this are dropped before estimation; charts cap at 60.
pub const PLOT_DURATION_CAP: f64 = 60.0;

/// Epanechnikov kernel: 0.75(1 - u^2) for |u| <= 1, zero outside.
pub fn epanechnikov(u: f64) -> f64 {
    if u.abs() <= 1.0 { 0.75 * (1.0 - u * u) } else { 0.0 }
}

/// `n` evenly spaced query points covering [lo, hi] inclusive.
pub fn query_points(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![lo];
    }
    (0..n)
        .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
        .collect()
}

/// Evaluates density(x) = mean over samples v of K((x - v)/h)/h at each
/// query point. Empty samples give an all-zero curve.
pub fn kernel_density(samples: &[f64], bandwidth: f64, xs: &[f64]) -> Vec<DensityPoint> {
    xs.iter()
        .map(|&x| {
            let y = if samples.is_empty() {
                0.0
            } else {
                samples
                    .iter()
                    .map(|&v| epanechnikov((x - v) / bandwidth))
                    .sum::<f64>()
                    / (bandwidth * samples.len() as f64)
            };
            DensityPoint { x, y }
        })
        .collect()
}

/// Buckets real trip durations by (period, rider class) and estimates one
/// curve per bucket with at least [`MIN_BUCKET_SAMPLES`] samples.
pub fn duration_curves(
    trips: &[TripRecord],
    scheme: PeriodScheme,
    bandwidth: f64,
) -> Vec<DurationCurve> {
    let mut buckets: HashMap<(TimePeriod, RiderClass), Vec<f64>> = HashMap::new();

    for trip in trips {
        if trip.duration_minutes > PLOT_DURATION_CAP {
            continue;
        }
        buckets
            .entry((scheme.of_hour(trip.hour()), trip.rider_class))
            .or_default()
            .push(trip.duration_minutes);
    }

    curves_from_buckets(buckets, scheme, bandwidth, false)
}

/// Estimates curves from synthetic durations derived from a day x hour count
/// matrix: each day's counts split by the day-type member shares, then turned
/// into jittered durations around the period's base value. Every curve is
/// flagged `synthetic`.
pub fn synthetic_duration_curves(
    matrix: &[[u64; 24]; 7],
    scheme: PeriodScheme,
    shares: &DayTypeShares,
    seed: u64,
    bandwidth: f64,
) -> Vec<DurationCurve> {
    let mut jitter = Jitter::new(seed);
    let mut buckets: HashMap<(TimePeriod, RiderClass), Vec<f64>> = HashMap::new();

    for (day, row) in matrix.iter().enumerate() {
        let share = if day >= 5 {
            shares.weekend_member_share
        } else {
            shares.weekday_member_share
        };

        for (hour, &count) in row.iter().enumerate() {
            let count = count as usize;
            let members = ((count as f64) * share).round() as usize;
            let members = members.min(count);
            let casuals = count - members;

            let period = scheme.of_hour(hour as u32);
            buckets.entry((period, RiderClass::Member)).or_default().extend(
                synthetic_durations(members, period, RiderClass::Member, &mut jitter),
            );
            buckets.entry((period, RiderClass::Casual)).or_default().extend(
                synthetic_durations(casuals, period, RiderClass::Casual, &mut jitter),
            );
        }
    }

    curves_from_buckets(buckets, scheme, bandwidth, true)
}

fn curves_from_buckets(
    mut buckets: HashMap<(TimePeriod, RiderClass), Vec<f64>>,
    scheme: PeriodScheme,
    bandwidth: f64,
    synthetic: bool,
) -> Vec<DurationCurve> {
    let xs = query_points(0.0, PLOT_DURATION_CAP, DENSITY_POINTS);
    let mut curves = Vec::new();

    for &period in scheme.periods() {
        for class in [RiderClass::Member, RiderClass::Casual] {
            let Some(samples) = buckets.remove(&(period, class)) else {
                continue;
            };
            if samples.len() < MIN_BUCKET_SAMPLES {
                continue;
            }

            curves.push(DurationCurve {
                period,
                rider_class: class,
                n: samples.len(),
                mean: mean(&samples),
                median: median(&samples),
                synthetic,
                points: kernel_density(&samples, bandwidth, &xs),
            });
        }
    }

    curves
}

/// Base duration multiplier per period; the six-way periods take the
/// multiplier of the four-way period covering the same hours.
fn period_multiplier(period: TimePeriod) -> f64 {
    match period {
        TimePeriod::Morning | TimePeriod::EarlyMorning | TimePeriod::MorningRush => 1.0,
        TimePeriod::Afternoon | TimePeriod::Midday => 1.3,
        TimePeriod::Evening | TimePeriod::EveningRush => 1.1,
        TimePeriod::Night => 0.8,
    }
}

fn synthetic_durations(
    count: usize,
    period: TimePeriod,
    class: RiderClass,
    jitter: &mut Jitter,
) -> Vec<f64> {
    let (base, variability) = match class {
        RiderClass::Member => (15.0, 5.0),
        RiderClass::Casual => (25.0, 10.0),
    };
    let center = base * period_multiplier(period);

    (0..count)
        .map(|_| (center + (jitter.next_f64() - 0.5) * 2.0 * variability).clamp(1.0, 60.0))
        .collect()
}

/// xorshift64* stream; enough to jitter demo data and fully reproducible
/// from its seed.
struct Jitter {
    state: u64,
}

impl Jitter {
    fn new(seed: u64) -> Self {
        Jitter { state: seed | 1 }
    }

    /// Next value in [0, 1).
    fn next_f64(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        let bits = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (bits >> 11) as f64 / (1u64 << 53) as f64
    }
}
