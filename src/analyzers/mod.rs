//! Summary tables over the corrected trip tables.
//!
//! Every aggregator is a pure function of its input slices: none of them
//! mutates the trips, so they can run in any order. [`report::build_report`]
//! runs them all and collects the tables into one [`types::TripReport`].

pub mod company_delay;
pub mod frequency;
pub mod performance;
pub mod ranking;
pub mod report;
pub mod status_share;
pub mod types;
pub mod utility;
