//! Time-of-day bucketing for duration summaries.

use serde::Serialize;

/// A named bucket of hours used to group duration samples.
///
/// The four canonical periods and the four extra ones used by the six-way
/// scheme share one type so curves from either scheme carry the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimePeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
    #[serde(rename = "Early Morning")]
    EarlyMorning,
    #[serde(rename = "Morning Rush")]
    MorningRush,
    Midday,
    #[serde(rename = "Evening Rush")]
    EveningRush,
}

impl TimePeriod {
    pub fn label(self) -> &'static str {
        match self {
            TimePeriod::Morning => "Morning",
            TimePeriod::Afternoon => "Afternoon",
            TimePeriod::Evening => "Evening",
            TimePeriod::Night => "Night",
            TimePeriod::EarlyMorning => "Early Morning",
            TimePeriod::MorningRush => "Morning Rush",
            TimePeriod::Midday => "Midday",
            TimePeriod::EveningRush => "Evening Rush",
        }
    }
}

/// How the 24 hours partition into periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodScheme {
    /// Morning 5-11, Afternoon 11-16, Evening 16-21, Night 21-5.
    #[default]
    FourWay,
    /// Early Morning 5-8, Morning Rush 8-10, Midday 10-15,
    /// Evening Rush 15-19, Evening 19-22, Night 22-5.
    SixWay,
}

impl PeriodScheme {
    /// Assigns an hour of day (0-23) to its period. Night wraps past
    /// midnight in both schemes.
    pub fn of_hour(self, hour: u32) -> TimePeriod {
        match self {
            PeriodScheme::FourWay => match hour {
                5..=10 => TimePeriod::Morning,
                11..=15 => TimePeriod::Afternoon,
                16..=20 => TimePeriod::Evening,
                _ => TimePeriod::Night,
            },
            PeriodScheme::SixWay => match hour {
                5..=7 => TimePeriod::EarlyMorning,
                8..=9 => TimePeriod::MorningRush,
                10..=14 => TimePeriod::Midday,
                15..=18 => TimePeriod::EveningRush,
                19..=21 => TimePeriod::Evening,
                _ => TimePeriod::Night,
            },
        }
    }

    /// The scheme's periods in display order.
    pub fn periods(self) -> &'static [TimePeriod] {
        match self {
            PeriodScheme::FourWay => &[
                TimePeriod::Morning,
                TimePeriod::Afternoon,
                TimePeriod::Evening,
                TimePeriod::Night,
            ],
            PeriodScheme::SixWay => &[
                TimePeriod::EarlyMorning,
                TimePeriod::MorningRush,
                TimePeriod::Midday,
                TimePeriod::EveningRush,
                TimePeriod::Evening,
                TimePeriod::Night,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_way_boundaries() {
        let s = PeriodScheme::FourWay;
        assert_eq!(s.of_hour(4), TimePeriod::Night);
        assert_eq!(s.of_hour(5), TimePeriod::Morning);
        assert_eq!(s.of_hour(10), TimePeriod::Morning);
        assert_eq!(s.of_hour(11), TimePeriod::Afternoon);
        assert_eq!(s.of_hour(15), TimePeriod::Afternoon);
        assert_eq!(s.of_hour(16), TimePeriod::Evening);
        assert_eq!(s.of_hour(20), TimePeriod::Evening);
        assert_eq!(s.of_hour(21), TimePeriod::Night);
        assert_eq!(s.of_hour(23), TimePeriod::Night);
        assert_eq!(s.of_hour(0), TimePeriod::Night);
    }

    #[test]
    fn test_six_way_boundaries() {
        let s = PeriodScheme::SixWay;
        assert_eq!(s.of_hour(5), TimePeriod::EarlyMorning);
        assert_eq!(s.of_hour(7), TimePeriod::EarlyMorning);
        assert_eq!(s.of_hour(8), TimePeriod::MorningRush);
        assert_eq!(s.of_hour(9), TimePeriod::MorningRush);
        assert_eq!(s.of_hour(10), TimePeriod::Midday);
        assert_eq!(s.of_hour(14), TimePeriod::Midday);
        assert_eq!(s.of_hour(15), TimePeriod::EveningRush);
        assert_eq!(s.of_hour(18), TimePeriod::EveningRush);
        assert_eq!(s.of_hour(19), TimePeriod::Evening);
        assert_eq!(s.of_hour(21), TimePeriod::Evening);
        assert_eq!(s.of_hour(22), TimePeriod::Night);
        assert_eq!(s.of_hour(2), TimePeriod::Night);
    }

    #[test]
    fn test_every_hour_lands_in_a_listed_period() {
        for scheme in [PeriodScheme::FourWay, PeriodScheme::SixWay] {
            for hour in 0..24 {
                assert!(scheme.periods().contains(&scheme.of_hour(hour)));
            }
        }
    }
}
