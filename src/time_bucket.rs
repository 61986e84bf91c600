//! Hour-of-day and weekday buckets used by the time-based aggregators.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;

/// Weekday labels indexed by days from Monday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// How a time-based aggregator buckets its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeGrouping {
    Hour,
    Weekday,
}

impl TimeGrouping {
    pub fn bucket(self, at: NaiveDateTime) -> TimeBucket {
        match self {
            TimeGrouping::Hour => TimeBucket::Hour(at.hour()),
            TimeGrouping::Weekday => TimeBucket::Weekday(at.weekday()),
        }
    }
}

impl FromStr for TimeGrouping {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(TimeGrouping::Hour),
            "weekday" => Ok(TimeGrouping::Weekday),
            other => Err(StatsError::InvalidArgument {
                name: "by",
                value: other.to_string(),
                expected: "hour, weekday",
            }),
        }
    }
}

/// One bucket of a time-grouped summary table.
///
/// Ordering follows the natural order of the bucket: hours ascending,
/// weekdays Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    Hour(u32),
    Weekday(Weekday),
}

impl TimeBucket {
    fn sort_key(&self) -> (u8, u32) {
        match self {
            TimeBucket::Hour(h) => (0, *h),
            TimeBucket::Weekday(d) => (1, d.num_days_from_monday()),
        }
    }
}

impl PartialOrd for TimeBucket {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeBucket {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Hour(h) => write!(f, "{h}"),
            TimeBucket::Weekday(d) => {
                write!(f, "{}", WEEKDAY_NAMES[d.num_days_from_monday() as usize])
            }
        }
    }
}

impl Serialize for TimeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeBucket::Hour(h) => serializer.serialize_u32(*h),
            TimeBucket::Weekday(_) => serializer.collect_str(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouping() {
        assert_eq!("hour".parse::<TimeGrouping>(), Ok(TimeGrouping::Hour));
        assert_eq!("weekday".parse::<TimeGrouping>(), Ok(TimeGrouping::Weekday));
    }

    #[test]
    fn test_parse_grouping_rejects_other_values() {
        let err = "month".parse::<TimeGrouping>().unwrap_err();
        assert!(matches!(err, StatsError::InvalidArgument { name: "by", .. }));
        assert!("Hour".parse::<TimeGrouping>().is_err());
    }

    #[test]
    fn test_bucket_for_timestamp() {
        // 2022-03-07 is a Monday
        let at = NaiveDateTime::parse_from_str("2022-03-07 23:15:00", "%Y-%m-%d %H:%M:%S").unwrap();

        assert_eq!(TimeGrouping::Hour.bucket(at), TimeBucket::Hour(23));
        assert_eq!(TimeGrouping::Weekday.bucket(at), TimeBucket::Weekday(Weekday::Mon));
    }

    #[test]
    fn test_weekdays_order_from_monday() {
        let mut days = vec![
            TimeBucket::Weekday(Weekday::Sun),
            TimeBucket::Weekday(Weekday::Wed),
            TimeBucket::Weekday(Weekday::Mon),
        ];
        days.sort();

        assert_eq!(
            days,
            vec![
                TimeBucket::Weekday(Weekday::Mon),
                TimeBucket::Weekday(Weekday::Wed),
                TimeBucket::Weekday(Weekday::Sun),
            ]
        );
    }

    #[test]
    fn test_bucket_serialization() {
        assert_eq!(serde_json::to_string(&TimeBucket::Hour(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&TimeBucket::Weekday(Weekday::Sat)).unwrap(),
            "\"Saturday\""
        );
    }
}
