use tracing::debug;

use crate::error::{StatsError, StatsResult};
use crate::record::{DelayStatus, PerformedTrip, TripRecord};

/// Labels every trip Late, Early or OnTime by comparing its scheduled and
/// actual times.
///
/// Returns the performed-trip table with `delay_status` set and
/// `delay_minutes` still zero.
///
/// # Errors
///
/// Fails with [`StatsError::MissingActualTime`] on the first trip that has
/// no actual time; no table is returned in that case.
pub fn label_statuses(records: &[TripRecord]) -> StatsResult<Vec<PerformedTrip>> {
    let trips = records
        .iter()
        .enumerate()
        .map(|(row, r)| -> StatsResult<PerformedTrip> {
            let actual_time = r.actual_time.ok_or_else(|| StatsError::MissingActualTime {
                row,
                line_name: r.line_name.clone(),
            })?;

            Ok(PerformedTrip {
                scheduled_time: r.scheduled_time,
                actual_time,
                line_name: r.line_name.clone(),
                company_nickname: r.company_nickname.clone(),
                trip_direction: r.trip_direction,
                delay_status: DelayStatus::classify(r.scheduled_time, actual_time),
                delay_minutes: 0.0,
            })
        })
        .collect::<StatsResult<Vec<_>>>()?;

    debug!(rows = trips.len(), "Labeled delay statuses");
    Ok(trips)
}
