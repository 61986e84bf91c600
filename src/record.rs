//! Trip rows as loaded from the dataset and as augmented by the delay pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Timestamp layouts accepted in the input table, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Direction the vehicle was running for the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripDirection {
    Outbound,
    Return,
}

impl fmt::Display for TripDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripDirection::Outbound => write!(f, "outbound"),
            TripDirection::Return => write!(f, "return"),
        }
    }
}

/// Timing outcome of a performed trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayStatus {
    Late,
    Early,
    OnTime,
}

impl DelayStatus {
    /// Three-way comparison of the scheduled and actual times.
    pub fn classify(scheduled: NaiveDateTime, actual: NaiveDateTime) -> Self {
        match scheduled.cmp(&actual) {
            std::cmp::Ordering::Less => DelayStatus::Late,
            std::cmp::Ordering::Greater => DelayStatus::Early,
            std::cmp::Ordering::Equal => DelayStatus::OnTime,
        }
    }
}

impl fmt::Display for DelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayStatus::Late => write!(f, "late"),
            DelayStatus::Early => write!(f, "early"),
            DelayStatus::OnTime => write!(f, "on_time"),
        }
    }
}

/// A single row deserialized from the trips CSV.
///
/// An empty `actual_time` cell marks a trip that was scheduled but not
/// performed. The column itself is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripRecord {
    #[serde(deserialize_with = "de_timestamp")]
    pub scheduled_time: NaiveDateTime,
    #[serde(deserialize_with = "de_opt_timestamp")]
    pub actual_time: Option<NaiveDateTime>,
    pub line_name: String,
    pub company_nickname: String,
    pub trip_direction: TripDirection,
}

impl TripRecord {
    pub fn is_performed(&self) -> bool {
        self.actual_time.is_some()
    }
}

/// A performed trip carrying the fields derived by the delay pipeline.
///
/// `delay_minutes` is only meaningful once
/// [`calculate_delays`](crate::preprocessing::calculate_delays) has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformedTrip {
    pub scheduled_time: NaiveDateTime,
    pub actual_time: NaiveDateTime,
    pub line_name: String,
    pub company_nickname: String,
    pub trip_direction: TripDirection,
    pub delay_status: DelayStatus,
    pub delay_minutes: f64,
}

/// Grouping keys shared by raw and performed trips.
pub trait Trip {
    fn scheduled_time(&self) -> NaiveDateTime;
    fn line_name(&self) -> &str;
    fn company_nickname(&self) -> &str;
    fn trip_direction(&self) -> TripDirection;
}

impl Trip for TripRecord {
    fn scheduled_time(&self) -> NaiveDateTime {
        self.scheduled_time
    }

    fn line_name(&self) -> &str {
        &self.line_name
    }

    fn company_nickname(&self) -> &str {
        &self.company_nickname
    }

    fn trip_direction(&self) -> TripDirection {
        self.trip_direction
    }
}

impl Trip for PerformedTrip {
    fn scheduled_time(&self) -> NaiveDateTime {
        self.scheduled_time
    }

    fn line_name(&self) -> &str {
        &self.line_name
    }

    fn company_nickname(&self) -> &str {
        &self.company_nickname
    }

    fn trip_direction(&self) -> TripDirection {
        self.trip_direction
    }
}

/// Splits a mixed table into (performed, unperformed) rows, keeping order.
pub fn split_performed(records: Vec<TripRecord>) -> (Vec<TripRecord>, Vec<TripRecord>) {
    records.into_iter().partition(TripRecord::is_performed)
}

/// Parses a timestamp cell in any of the [`TIMESTAMP_FORMATS`].
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp '{raw}'")))
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_three_ways() {
        let early = ts("2022-03-01 08:00:00");
        let late = ts("2022-03-01 08:05:00");

        assert_eq!(DelayStatus::classify(early, late), DelayStatus::Late);
        assert_eq!(DelayStatus::classify(late, early), DelayStatus::Early);
        assert_eq!(DelayStatus::classify(early, early), DelayStatus::OnTime);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2022-03-01 08:00:00"), Some(ts("2022-03-01 08:00:00")));
        assert_eq!(parse_timestamp("2022-03-01T08:00:00"), Some(ts("2022-03-01 08:00:00")));
        assert_eq!(parse_timestamp(" 2022-03-01 08:00 "), Some(ts("2022-03-01 08:00:00")));
        assert_eq!(parse_timestamp("08:00"), None);
    }

    #[test]
    fn test_split_performed_keeps_order() {
        let records = vec![
            record("L1", Some("2022-03-01 08:01:00")),
            record("L2", None),
            record("L3", Some("2022-03-01 08:02:00")),
        ];

        let (performed, unperformed) = split_performed(records);

        assert_eq!(performed.len(), 2);
        assert_eq!(performed[0].line_name, "L1");
        assert_eq!(performed[1].line_name, "L3");
        assert_eq!(unperformed.len(), 1);
        assert_eq!(unperformed[0].line_name, "L2");
    }

    #[test]
    fn test_status_display_matches_serde() {
        assert_eq!(DelayStatus::OnTime.to_string(), "on_time");
        assert_eq!(
            serde_json::to_string(&DelayStatus::OnTime).unwrap(),
            "\"on_time\""
        );
        assert_eq!(TripDirection::Return.to_string(), "return");
    }

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn record(line: &str, actual: Option<&str>) -> TripRecord {
        TripRecord {
            scheduled_time: ts("2022-03-01 08:00:00"),
            actual_time: actual.map(ts),
            line_name: line.to_string(),
            company_nickname: "Veleiro".to_string(),
            trip_direction: TripDirection::Outbound,
        }
    }
}
