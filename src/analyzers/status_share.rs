use std::collections::{BTreeMap, BTreeSet};

use crate::analyzers::types::StatusShare;
use crate::analyzers::utility::{pct, round_to};
use crate::error::{StatsError, StatsResult};
use crate::record::{DelayStatus, PerformedTrip};

/// The set of companies present in a table.
pub fn companies_in(trips: &[PerformedTrip]) -> BTreeSet<String> {
    trips.iter().map(|t| t.company_nickname.clone()).collect()
}

/// Percentage of each company's trips per delay status, rounded to two
/// decimals.
///
/// Rows are ordered by company, then status. A configured company with no
/// trips produces no rows.
///
/// # Errors
///
/// [`StatsError::EmptyCompanySet`] if `companies` is empty,
/// [`StatsError::UnexpectedCompany`] for the first trip whose company is not
/// in `companies`.
pub fn delay_status_percentages(
    trips: &[PerformedTrip],
    companies: &BTreeSet<String>,
) -> StatsResult<Vec<StatusShare>> {
    if companies.is_empty() {
        return Err(StatsError::EmptyCompanySet);
    }

    let mut counts: BTreeMap<(&str, DelayStatus), usize> = BTreeMap::new();
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();

    for t in trips {
        let company = t.company_nickname.as_str();
        if !companies.contains(company) {
            return Err(StatsError::UnexpectedCompany(company.to_string()));
        }
        *counts.entry((company, t.delay_status)).or_default() += 1;
        *totals.entry(company).or_default() += 1;
    }

    Ok(counts
        .into_iter()
        .map(|((company, status), trips)| {
            let company_total = totals[company];
            StatusShare {
                company_nickname: company.to_string(),
                status,
                trips,
                company_total,
                percent: round_to(pct(trips, company_total), 2),
            }
        })
        .collect())
}
