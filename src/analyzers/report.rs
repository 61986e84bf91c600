use chrono::Utc;
use tracing::info;

use crate::analyzers::company_delay::{
    delay_distribution, mean_delay_by_company, mean_delay_by_company_direction,
};
use crate::analyzers::frequency::{average_delay_by_time, frequency_by_time};
use crate::analyzers::performance::{performance_by_company, performance_by_direction};
use crate::analyzers::ranking::{top_n_delayed, top_n_unperformed};
use crate::analyzers::status_share::{companies_in, delay_status_percentages};
use crate::analyzers::types::TripReport;
use crate::config::ReportConfig;
use crate::error::StatsResult;
use crate::preprocessing::{OutlierCorrection, run_delay_pipeline};
use crate::record::{PerformedTrip, TripRecord, split_performed};
use crate::time_bucket::TimeGrouping;

const SCHEMA_VERSION: u8 = 1;

/// Runs every aggregator over a corrected performed-trip table and the
/// matching unperformed trips.
///
/// Delay-status shares are checked against `config.companies` when set,
/// otherwise against the companies found in `performed`; with no company
/// set and no performed trips that table is empty.
pub fn build_report(
    performed: &[PerformedTrip],
    unperformed: &[TripRecord],
    config: &ReportConfig,
) -> StatsResult<TripReport> {
    let delay_status_shares = match &config.companies {
        Some(companies) => delay_status_percentages(performed, companies)?,
        None if performed.is_empty() => Vec::new(),
        None => delay_status_percentages(performed, &companies_in(performed))?,
    };

    let report = TripReport {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        performed_trips: performed.len(),
        unperformed_trips: unperformed.len(),
        performance_by_direction: performance_by_direction(performed, unperformed),
        performance_by_company: performance_by_company(performed, unperformed),
        unperformed_by_hour: frequency_by_time(unperformed, TimeGrouping::Hour),
        unperformed_by_weekday: frequency_by_time(unperformed, TimeGrouping::Weekday),
        top_unperformed: top_n_unperformed(unperformed, config.top_n),
        top_delayed: top_n_delayed(performed, config.top_n),
        delay_status_shares,
        avg_delay_by_hour: average_delay_by_time(performed, TimeGrouping::Hour),
        avg_delay_by_weekday: average_delay_by_time(performed, TimeGrouping::Weekday),
        mean_delay_by_company: mean_delay_by_company(performed),
        mean_delay_by_company_direction: mean_delay_by_company_direction(performed),
        delay_distribution: delay_distribution(performed),
    };

    info!(
        performed = report.performed_trips,
        unperformed = report.unperformed_trips,
        top_n = config.top_n,
        "Report built"
    );
    Ok(report)
}

/// Splits a mixed table and runs the delay pipeline on the performed trips.
///
/// Returns the corrected performed-trip table and the unperformed trips.
pub fn prepare_trips(
    records: Vec<TripRecord>,
    correction: &OutlierCorrection,
) -> StatsResult<(Vec<PerformedTrip>, Vec<TripRecord>)> {
    let (performed, unperformed) = split_performed(records);
    let trips = run_delay_pipeline(&performed, correction)?;
    Ok((trips, unperformed))
}

/// [`prepare_trips`] followed by [`build_report`].
///
/// Returns the corrected performed-trip table alongside the report.
pub fn analyze_trips(
    records: Vec<TripRecord>,
    config: &ReportConfig,
) -> StatsResult<(Vec<PerformedTrip>, TripReport)> {
    let (trips, unperformed) = prepare_trips(records, &config.outlier)?;
    let report = build_report(&trips, &unperformed, config)?;
    Ok((trips, report))
}
