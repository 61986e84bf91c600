use std::collections::BTreeMap;

use crate::analyzers::types::{
    CompanyDirectionDelay, CompanyMeanDelay, DelayDistribution, MeanDelayByCompany,
};
use crate::analyzers::utility::{mean, quantile_sorted, round_to, stddev};
use crate::record::{PerformedTrip, TripDirection};

fn delays_by_company(trips: &[PerformedTrip]) -> BTreeMap<&str, Vec<f64>> {
    let mut delays: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for t in trips {
        delays
            .entry(t.company_nickname.as_str())
            .or_default()
            .push(t.delay_minutes);
    }
    delays
}

/// Mean delay per company, ascending, and the mean across companies.
///
/// The overall figure weighs every company equally, whatever its trip count.
pub fn mean_delay_by_company(trips: &[PerformedTrip]) -> MeanDelayByCompany {
    let raw: Vec<(&str, f64)> = delays_by_company(trips)
        .into_iter()
        .map(|(company, series)| (company, mean(&series)))
        .collect();

    let means: Vec<f64> = raw.iter().map(|(_, m)| *m).collect();
    let mut companies: Vec<CompanyMeanDelay> = raw
        .into_iter()
        .map(|(company, m)| CompanyMeanDelay {
            company_nickname: company.to_string(),
            avg_delay_minutes: round_to(m, 2),
        })
        .collect();
    companies.sort_by(|a, b| a.avg_delay_minutes.total_cmp(&b.avg_delay_minutes));

    MeanDelayByCompany {
        companies,
        overall_avg_delay_minutes: round_to(mean(&means), 2),
    }
}

/// Mean delay per (company, direction), rounded to two decimals, ascending.
pub fn mean_delay_by_company_direction(trips: &[PerformedTrip]) -> Vec<CompanyDirectionDelay> {
    let mut delays: BTreeMap<(&str, TripDirection), Vec<f64>> = BTreeMap::new();
    for t in trips {
        delays
            .entry((t.company_nickname.as_str(), t.trip_direction))
            .or_default()
            .push(t.delay_minutes);
    }

    let mut rows: Vec<CompanyDirectionDelay> = delays
        .into_iter()
        .map(|((company, trip_direction), series)| CompanyDirectionDelay {
            company_nickname: company.to_string(),
            trip_direction,
            avg_delay_minutes: round_to(mean(&series), 2),
        })
        .collect();
    rows.sort_by(|a, b| a.avg_delay_minutes.total_cmp(&b.avg_delay_minutes));
    rows
}

/// Spread of delays per company, ordered by company.
pub fn delay_distribution(trips: &[PerformedTrip]) -> Vec<DelayDistribution> {
    delays_by_company(trips)
        .into_iter()
        .map(|(company, mut series)| {
            series.sort_by(f64::total_cmp);
            let avg = mean(&series);
            DelayDistribution {
                company_nickname: company.to_string(),
                trips: series.len(),
                min: quantile_sorted(&series, 0.0),
                q1: quantile_sorted(&series, 0.25),
                median: quantile_sorted(&series, 0.5),
                q3: quantile_sorted(&series, 0.75),
                max: quantile_sorted(&series, 1.0),
                mean: round_to(avg, 2),
                stddev: round_to(stddev(&series, avg), 2),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DelayStatus;
    use chrono::NaiveDateTime;

    #[test]
    fn test_mean_delay_by_company() {
        let trips = vec![
            trip("Veleiro", TripDirection::Outbound, 4.0),
            trip("Veleiro", TripDirection::Return, 2.0),
            trip("Veleiro", TripDirection::Return, 0.0),
            trip("Real Alagoas", TripDirection::Outbound, -1.0),
        ];

        let summary = mean_delay_by_company(&trips);

        assert_eq!(summary.companies.len(), 2);
        assert_eq!(summary.companies[0].company_nickname, "Real Alagoas");
        assert_eq!(summary.companies[0].avg_delay_minutes, -1.0);
        assert_eq!(summary.companies[1].avg_delay_minutes, 2.0);
        assert_eq!(summary.overall_avg_delay_minutes, 0.5);
    }

    #[test]
    fn test_mean_delay_empty() {
        let summary = mean_delay_by_company(&[]);
        assert!(summary.companies.is_empty());
        assert_eq!(summary.overall_avg_delay_minutes, 0.0);
    }

    #[test]
    fn test_mean_delay_by_company_direction() {
        let trips = vec![
            trip("Veleiro", TripDirection::Outbound, 4.0),
            trip("Veleiro", TripDirection::Return, 2.0),
            trip("Veleiro", TripDirection::Return, 1.0),
            trip("Real Alagoas", TripDirection::Return, -3.0),
        ];

        let rows = mean_delay_by_company_direction(&trips);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].company_nickname, "Real Alagoas");
        assert_eq!(rows[1].trip_direction, TripDirection::Return);
        assert_eq!(rows[1].avg_delay_minutes, 1.5);
        assert_eq!(rows[2].trip_direction, TripDirection::Outbound);
        assert_eq!(rows[2].avg_delay_minutes, 4.0);
    }

    #[test]
    fn test_delay_distribution() {
        let trips: Vec<PerformedTrip> = [3.0, -2.0, 10.0, 1.0, 0.0]
            .into_iter()
            .map(|d| trip("Veleiro", TripDirection::Outbound, d))
            .collect();

        let dist = delay_distribution(&trips);

        assert_eq!(dist.len(), 1);
        let d = &dist[0];
        assert_eq!(d.trips, 5);
        assert_eq!(d.min, -2.0);
        assert_eq!(d.q1, 0.0);
        assert_eq!(d.median, 1.0);
        assert_eq!(d.q3, 3.0);
        assert_eq!(d.max, 10.0);
        assert_eq!(d.mean, 2.4);
    }

    fn trip(company: &str, direction: TripDirection, delay: f64) -> PerformedTrip {
        let at = NaiveDateTime::parse_from_str("2022-03-07 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        PerformedTrip {
            scheduled_time: at,
            actual_time: at,
            line_name: "600".to_string(),
            company_nickname: company.to_string(),
            trip_direction: direction,
            delay_status: DelayStatus::Late,
            delay_minutes: delay,
        }
    }
}
