//! Delay pipeline over performed trips.
//!
//! Three stages run in a fixed order on the whole table: status labeling,
//! delay calculation, then correction of delays distorted by midnight
//! wraparound. [`run_delay_pipeline`] chains them.

mod delay;
mod outliers;
mod pipeline;
mod status;

pub use delay::{calculate_delays, day_remainder_minutes, delay_minutes};
pub use outliers::{OutlierCorrection, RelabelPolicy, correct_outliers};
pub use pipeline::run_delay_pipeline;
pub use status::label_statuses;
