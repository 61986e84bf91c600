//! Top-N line rankings.
//!
//! Both rankings list their rows ascending, largest last. Groups are visited
//! in (line, company) order and sorted stably, so ties keep that order and
//! the cut at `n` is deterministic.

use std::collections::BTreeMap;

use crate::analyzers::types::{LineCount, LineDelayShare};
use crate::analyzers::utility::{pct, round_to};
use crate::record::{DelayStatus, PerformedTrip, Trip};

type LineKey = (String, String);

fn line_key<T: Trip>(r: &T) -> LineKey {
    (r.line_name().to_string(), r.company_nickname().to_string())
}

/// Keeps the last `n` rows of an ascending table.
fn keep_last<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    let cut = rows.len().saturating_sub(n);
    rows.split_off(cut)
}

/// The `n` (line, company) pairs with the most rows.
///
/// Meant for the unperformed-trip table, where the row count is the number
/// of trips that did not run.
pub fn top_n_unperformed<T: Trip>(records: &[T], n: usize) -> Vec<LineCount> {
    let mut counts: BTreeMap<LineKey, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(line_key(r)).or_default() += 1;
    }

    let mut rows: Vec<LineCount> = counts
        .into_iter()
        .map(|((line_name, company_nickname), trips)| LineCount {
            line_name,
            company_nickname,
            trips,
        })
        .collect();
    rows.sort_by_key(|r| r.trips);

    keep_last(rows, n)
}

/// The `n` (line, company) pairs with the highest share of late trips.
///
/// The share is the count of Late trips over all trips of the pair, as a
/// percentage rounded to one decimal. Pairs that never ran late are left out.
pub fn top_n_delayed(trips: &[PerformedTrip], n: usize) -> Vec<LineDelayShare> {
    let mut counts: BTreeMap<LineKey, (usize, usize)> = BTreeMap::new();
    for t in trips {
        let (late, total) = counts.entry(line_key(t)).or_default();
        *total += 1;
        if t.delay_status == DelayStatus::Late {
            *late += 1;
        }
    }

    let mut rows: Vec<LineDelayShare> = counts
        .into_iter()
        .filter(|(_, (late, _))| *late > 0)
        .map(|((line_name, company_nickname), (late, total))| LineDelayShare {
            line_name,
            company_nickname,
            late_trips: late,
            total_trips: total,
            late_percent: round_to(pct(late, total), 1),
        })
        .collect();
    rows.sort_by(|a, b| a.late_percent.total_cmp(&b.late_percent));

    keep_last(rows, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{TripDirection, TripRecord};
    use chrono::NaiveDateTime;

    #[test]
    fn test_top_unperformed_ascending_largest_last() {
        let mut records = vec![];
        records.extend(repeat("A", "Veleiro", 3));
        records.extend(repeat("B", "Veleiro", 1));
        records.extend(repeat("C", "Real Alagoas", 5));
        records.extend(repeat("A", "Real Alagoas", 2));

        let rows = top_n_unperformed(&records, 2);

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].line_name.as_str(), rows[0].trips), ("A", 3));
        assert_eq!((rows[1].line_name.as_str(), rows[1].trips), ("C", 5));
    }

    #[test]
    fn test_top_unperformed_fewer_pairs_than_n() {
        let mut records = repeat("A", "Veleiro", 2);
        records.extend(repeat("B", "Veleiro", 1));

        let rows = top_n_unperformed(&records, 10);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].line_name, "A");
    }

    #[test]
    fn test_top_unperformed_ties_keep_key_order() {
        let mut records = repeat("Z", "Veleiro", 2);
        records.extend(repeat("M", "Veleiro", 2));
        records.extend(repeat("A", "Veleiro", 2));

        let rows = top_n_unperformed(&records, 2);

        let lines: Vec<&str> = rows.iter().map(|r| r.line_name.as_str()).collect();
        assert_eq!(lines, vec!["M", "Z"]);
    }

    #[test]
    fn test_top_unperformed_zero() {
        assert!(top_n_unperformed(&repeat("A", "Veleiro", 2), 0).is_empty());
    }

    #[test]
    fn test_top_delayed_share() {
        let trips = vec![
            performed("A", DelayStatus::Late),
            performed("A", DelayStatus::Early),
            performed("A", DelayStatus::OnTime),
            performed("B", DelayStatus::Late),
            performed("B", DelayStatus::Late),
            performed("C", DelayStatus::Early),
        ];

        let rows = top_n_delayed(&trips, 10);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line_name, "A");
        assert_eq!(rows[0].late_trips, 1);
        assert_eq!(rows[0].total_trips, 3);
        assert_eq!(rows[0].late_percent, 33.3);
        assert_eq!(rows[1].line_name, "B");
        assert_eq!(rows[1].late_percent, 100.0);
    }

    #[test]
    fn test_top_delayed_keeps_highest() {
        let trips = vec![
            performed("A", DelayStatus::Late),
            performed("A", DelayStatus::Early),
            performed("B", DelayStatus::Late),
            performed("C", DelayStatus::Late),
            performed("C", DelayStatus::Early),
            performed("C", DelayStatus::Early),
        ];

        let rows = top_n_delayed(&trips, 1);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line_name, "B");
    }

    fn ts() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2022-03-07 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn repeat(line: &str, company: &str, times: usize) -> Vec<TripRecord> {
        (0..times)
            .map(|_| TripRecord {
                scheduled_time: ts(),
                actual_time: None,
                line_name: line.to_string(),
                company_nickname: company.to_string(),
                trip_direction: TripDirection::Outbound,
            })
            .collect()
    }

    fn performed(line: &str, status: DelayStatus) -> PerformedTrip {
        PerformedTrip {
            scheduled_time: ts(),
            actual_time: ts(),
            line_name: line.to_string(),
            company_nickname: "Cidade de Maceió".to_string(),
            trip_direction: TripDirection::Return,
            delay_status: status,
            delay_minutes: 0.0,
        }
    }
}
