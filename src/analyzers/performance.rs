use std::collections::BTreeMap;

use crate::analyzers::types::{CompanyPerformance, DirectionPerformance};
use crate::record::Trip;

/// Tallies (performed, unperformed) per key, in key order.
fn tally<K, P, U>(
    performed: &[P],
    unperformed: &[U],
    key_p: impl Fn(&P) -> K,
    key_u: impl Fn(&U) -> K,
) -> BTreeMap<K, (usize, usize)>
where
    K: Ord,
{
    let mut counts: BTreeMap<K, (usize, usize)> = BTreeMap::new();
    for p in performed {
        counts.entry(key_p(p)).or_default().0 += 1;
    }
    for u in unperformed {
        counts.entry(key_u(u)).or_default().1 += 1;
    }
    counts
}

/// Performed and unperformed trip counts per direction.
///
/// A direction that appears in neither table is omitted.
pub fn performance_by_direction<P: Trip, U: Trip>(
    performed: &[P],
    unperformed: &[U],
) -> Vec<DirectionPerformance> {
    tally(
        performed,
        unperformed,
        |p| p.trip_direction(),
        |u| u.trip_direction(),
    )
    .into_iter()
    .map(|(trip_direction, (performed, unperformed))| DirectionPerformance {
        trip_direction,
        performed,
        unperformed,
    })
    .collect()
}

/// Performed and unperformed trip counts per company.
pub fn performance_by_company<P: Trip, U: Trip>(
    performed: &[P],
    unperformed: &[U],
) -> Vec<CompanyPerformance> {
    tally(
        performed,
        unperformed,
        |p| p.company_nickname().to_string(),
        |u| u.company_nickname().to_string(),
    )
    .into_iter()
    .map(|(company_nickname, (performed, unperformed))| CompanyPerformance {
        company_nickname,
        performed,
        unperformed,
    })
    .collect()
}
