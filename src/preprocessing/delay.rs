use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::record::{DelayStatus, PerformedTrip};

const SECONDS_PER_DAY: i64 = 86_400;

/// Sub-day remainder of `delta` in minutes.
///
/// Whole days are dropped, so a difference spanning midnight on the same
/// date shows up as a value close to a full day. The outlier pass undoes that.
pub fn day_remainder_minutes(delta: TimeDelta) -> f64 {
    delta.num_seconds().rem_euclid(SECONDS_PER_DAY) as f64 / 60.0
}

/// Signed delay in minutes for a single trip: positive when late, negative
/// when early, zero when on time.
pub fn delay_minutes(status: DelayStatus, scheduled: NaiveDateTime, actual: NaiveDateTime) -> f64 {
    match status {
        DelayStatus::Early => -day_remainder_minutes(scheduled - actual),
        DelayStatus::Late => day_remainder_minutes(actual - scheduled),
        DelayStatus::OnTime => 0.0,
    }
}

/// Fills `delay_minutes` for every labeled trip from its `delay_status`.
pub fn calculate_delays(trips: &mut [PerformedTrip]) {
    for trip in trips.iter_mut() {
        trip.delay_minutes = delay_minutes(trip.delay_status, trip.scheduled_time, trip.actual_time);
    }

    debug!(rows = trips.len(), "Calculated delays");
}
