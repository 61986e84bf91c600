use std::collections::BTreeMap;

use crate::analyzers::types::{AverageDelayRow, FrequencyRow};
use crate::analyzers::utility::{mean, round_to};
use crate::record::{PerformedTrip, Trip};
use crate::time_bucket::{TimeBucket, TimeGrouping};

/// Counts trips per scheduled hour of day or scheduled weekday.
///
/// Only buckets with at least one trip are listed, in bucket order. The
/// counts add up to `records.len()`.
pub fn frequency_by_time<T: Trip>(records: &[T], by: TimeGrouping) -> Vec<FrequencyRow> {
    let mut counts: BTreeMap<TimeBucket, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(by.bucket(r.scheduled_time())).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(bucket, trips)| FrequencyRow { bucket, trips })
        .collect()
}

/// Mean delay per bucket, rounded to two decimals.
///
/// Hour buckets use the hour the trip was actually run; weekday buckets use
/// the scheduled weekday.
pub fn average_delay_by_time(trips: &[PerformedTrip], by: TimeGrouping) -> Vec<AverageDelayRow> {
    let mut delays: BTreeMap<TimeBucket, Vec<f64>> = BTreeMap::new();
    for t in trips {
        let at = match by {
            TimeGrouping::Hour => t.actual_time,
            TimeGrouping::Weekday => t.scheduled_time,
        };
        delays.entry(by.bucket(at)).or_default().push(t.delay_minutes);
    }

    delays
        .into_iter()
        .map(|(bucket, series)| AverageDelayRow {
            bucket,
            avg_delay_minutes: round_to(mean(&series), 2),
        })
        .collect()
}
