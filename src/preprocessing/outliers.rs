use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StatsError, StatsResult};
use crate::record::{DelayStatus, PerformedTrip};

/// Largest magnitude [`calculate_delays`](super::calculate_delays) can produce.
const MAX_RAW_DELAY_MINUTES: f64 = 1440.0;

/// Status given to a trip whose delay was wrapped back across midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelabelPolicy {
    /// Always Early, whatever the sign of the corrected delay.
    #[default]
    ForceEarly,
    /// Re-derived from the sign of the corrected delay.
    FromSign,
}

/// Parameters of the midnight-wraparound correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierCorrection {
    /// Delays with a larger magnitude are treated as wrapped.
    pub threshold_minutes: f64,
    /// Amount added to or removed from a wrapped delay. Observed data was
    /// corrected with 1400 rather than the 1440 minutes of a full day.
    pub day_minutes: f64,
    pub relabel: RelabelPolicy,
}

impl Default for OutlierCorrection {
    fn default() -> Self {
        Self {
            threshold_minutes: 1000.0,
            day_minutes: 1400.0,
            relabel: RelabelPolicy::ForceEarly,
        }
    }
}

impl OutlierCorrection {
    pub fn with_day_minutes(mut self, day_minutes: f64) -> Self {
        self.day_minutes = day_minutes;
        self
    }

    /// Checks that one pass leaves every delay within the threshold.
    ///
    /// Raw delays never exceed 1440 minutes, so the correction has to pull
    /// 1440 back under the threshold without pushing a value just over the
    /// threshold past it on the other side.
    pub fn validate(&self) -> StatsResult<()> {
        let OutlierCorrection {
            threshold_minutes: t,
            day_minutes: d,
            ..
        } = *self;

        if !t.is_finite() || !d.is_finite() || t <= 0.0 || d <= 0.0 {
            return Err(StatsError::InvalidCorrection(format!(
                "threshold ({t}) and day length ({d}) must be positive"
            )));
        }
        if MAX_RAW_DELAY_MINUTES - d > t || d > 2.0 * t {
            return Err(StatsError::InvalidCorrection(format!(
                "day length {d} does not map delays over {t} back within {t}"
            )));
        }
        Ok(())
    }

    fn relabel(&self, corrected: f64) -> DelayStatus {
        match self.relabel {
            RelabelPolicy::ForceEarly => DelayStatus::Early,
            RelabelPolicy::FromSign if corrected > 0.0 => DelayStatus::Late,
            RelabelPolicy::FromSign if corrected < 0.0 => DelayStatus::Early,
            RelabelPolicy::FromSign => DelayStatus::OnTime,
        }
    }
}

/// Pulls delays distorted by midnight wraparound back near zero.
///
/// Any delay over `threshold_minutes` loses `day_minutes`, any delay under
/// `-threshold_minutes` gains it, and the trip is relabeled per
/// [`RelabelPolicy`]. Running it again on a corrected table changes nothing.
///
/// Returns the number of corrected trips.
///
/// # Errors
///
/// Fails with [`StatsError::InvalidCorrection`], leaving the table untouched,
/// when the parameters do not validate or a delay lies outside the
/// ±1440 minutes that [`calculate_delays`](super::calculate_delays) can
/// produce.
pub fn correct_outliers(
    trips: &mut [PerformedTrip],
    correction: &OutlierCorrection,
) -> StatsResult<usize> {
    correction.validate()?;

    if let Some(trip) = trips
        .iter()
        .find(|t| t.delay_minutes.is_nan() || t.delay_minutes.abs() > MAX_RAW_DELAY_MINUTES)
    {
        return Err(StatsError::InvalidCorrection(format!(
            "delay {} of line {} is outside ±{MAX_RAW_DELAY_MINUTES} minutes",
            trip.delay_minutes, trip.line_name
        )));
    }

    let threshold = correction.threshold_minutes;
    let mut corrected = 0;

    for trip in trips.iter_mut() {
        let adjusted = if trip.delay_minutes > threshold {
            trip.delay_minutes - correction.day_minutes
        } else if trip.delay_minutes < -threshold {
            trip.delay_minutes + correction.day_minutes
        } else {
            continue;
        };

        debug!(
            line = %trip.line_name,
            scheduled = %trip.scheduled_time,
            from = trip.delay_minutes,
            to = adjusted,
            "Corrected wrapped delay"
        );
        trip.delay_minutes = adjusted;
        trip.delay_status = correction.relabel(adjusted);
        corrected += 1;
    }

    if corrected > 0 {
        warn!(corrected, total = trips.len(), "Delays corrected for midnight wraparound");
    }

    Ok(corrected)
}
