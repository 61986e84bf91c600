pub mod analyzers;
pub mod config;
pub mod error;
pub mod output;
pub mod preprocessing;
pub mod record;
pub mod source;
pub mod time_bucket;

pub use error::{StatsError, StatsResult};
