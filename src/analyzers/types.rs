//! Summary rows produced by the aggregators.
//!
//! All rows serialize flat so any table can be written as CSV as well as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::{DelayStatus, TripDirection};
use crate::time_bucket::TimeBucket;

/// Number of trips in a time bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub bucket: TimeBucket,
    pub trips: usize,
}

/// Number of trips of a line run by a company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineCount {
    pub line_name: String,
    pub company_nickname: String,
    pub trips: usize,
}

/// How often a line ran late.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDelayShare {
    pub line_name: String,
    pub company_nickname: String,
    pub late_trips: usize,
    pub total_trips: usize,
    /// Rounded to one decimal.
    pub late_percent: f64,
}

/// Share of a company's trips with a given delay status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub company_nickname: String,
    pub status: DelayStatus,
    pub trips: usize,
    pub company_total: usize,
    /// Rounded to two decimals.
    pub percent: f64,
}

/// Mean delay in a time bucket, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageDelayRow {
    pub bucket: TimeBucket,
    pub avg_delay_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyMeanDelay {
    pub company_nickname: String,
    pub avg_delay_minutes: f64,
}

/// Mean delay per company plus the mean of those means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanDelayByCompany {
    pub companies: Vec<CompanyMeanDelay>,
    pub overall_avg_delay_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDirectionDelay {
    pub company_nickname: String,
    pub trip_direction: TripDirection,
    pub avg_delay_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionPerformance {
    pub trip_direction: TripDirection,
    pub performed: usize,
    pub unperformed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyPerformance {
    pub company_nickname: String,
    pub performed: usize,
    pub unperformed: usize,
}

/// Five-number summary of a company's delays, the data behind a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayDistribution {
    pub company_nickname: String,
    pub trips: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
}

/// Every summary table for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub performed_trips: usize,
    pub unperformed_trips: usize,
    pub performance_by_direction: Vec<DirectionPerformance>,
    pub performance_by_company: Vec<CompanyPerformance>,
    pub unperformed_by_hour: Vec<FrequencyRow>,
    pub unperformed_by_weekday: Vec<FrequencyRow>,
    pub top_unperformed: Vec<LineCount>,
    pub top_delayed: Vec<LineDelayShare>,
    pub delay_status_shares: Vec<StatusShare>,
    pub avg_delay_by_hour: Vec<AverageDelayRow>,
    pub avg_delay_by_weekday: Vec<AverageDelayRow>,
    pub mean_delay_by_company: MeanDelayByCompany,
    pub mean_delay_by_company_direction: Vec<CompanyDirectionDelay>,
    pub delay_distribution: Vec<DelayDistribution>,
}
