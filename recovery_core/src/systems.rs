//! Body-system health sub-model.
//!
//! A system's health for one substance is the fraction of that system's
//! tagged milestones already completed. When several active substances
//! affect the same system their percentages are averaged.

use crate::relapse::resolve_effective_quit_date;
use crate::{BodySystem, Catalog, Event, QuitDates, Substance, SystemHealthRecord};
use chrono::{DateTime, Utc};

/// Health of one body system across all active substances
///
/// Substances without a quit date are excluded. A system no active
/// substance affects reports 0% with zero contributors.
pub fn compute_system_health(
    now: DateTime<Utc>,
    quit_dates: &QuitDates,
    events: &[Event],
    catalog: &Catalog,
    system: BodySystem,
) -> SystemHealthRecord {
    let mut total = 0.0;
    let mut contributing = 0usize;

    for substance in Substance::ALL {
        let Some(&quit) = quit_dates.get(&substance) else {
            continue;
        };

        let relevant: Vec<_> = catalog
            .milestones_for(substance)
            .iter()
            .filter(|m| m.systems.contains(&system))
            .collect();
        if relevant.is_empty() {
            continue;
        }

        let effective = resolve_effective_quit_date(quit, events, substance);
        let elapsed_ms = (now - effective).num_milliseconds().max(0);

        let completed = relevant.iter().filter(|m| m.offset_ms <= elapsed_ms).count();
        total += 100.0 * completed as f64 / relevant.len() as f64;
        contributing += 1;
    }

    let percent = if contributing == 0 {
        0.0
    } else {
        total / contributing as f64
    };

    SystemHealthRecord {
        system,
        percent,
        contributing,
    }
}

/// Health of every body system, in display order
pub fn system_health_profile(
    now: DateTime<Utc>,
    quit_dates: &QuitDates,
    events: &[Event],
    catalog: &Catalog,
) -> Vec<SystemHealthRecord> {
    BodySystem::ALL
        .iter()
        .map(|&system| compute_system_health(now, quit_dates, events, catalog, system))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::{Milestone, MS_PER_DAY};
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn heart_milestone(offset_days: i64, progress: f64) -> Milestone {
        Milestone {
            offset_ms: offset_days * MS_PER_DAY,
            progress,
            label: format!("day {}", offset_days),
            systems: vec![BodySystem::Heart],
        }
    }

    /// Four heart milestones at days 1, 2, 3, 4 for two substances
    fn heart_catalog() -> Catalog {
        let table = vec![
            heart_milestone(1, 25.0),
            heart_milestone(2, 50.0),
            heart_milestone(3, 75.0),
            heart_milestone(4, 100.0),
        ];
        let mut milestones = HashMap::new();
        milestones.insert(Substance::Cigarettes, table.clone());
        milestones.insert(Substance::Alcohol, table);
        Catalog {
            milestones,
            profiles: HashMap::new(),
        }
    }

    #[test]
    fn test_fraction_of_completed_milestones() {
        let catalog = heart_catalog();
        let mut quits = QuitDates::new();
        quits.insert(Substance::Cigarettes, now() - Duration::days(2));

        let record = compute_system_health(now(), &quits, &[], &catalog, BodySystem::Heart);
        assert!((record.percent - 50.0).abs() < 1e-9);
        assert_eq!(record.contributing, 1);
    }

    #[test]
    fn test_multiple_substances_averaged() {
        let catalog = heart_catalog();
        let mut quits = QuitDates::new();
        quits.insert(Substance::Cigarettes, now() - Duration::days(4)); // 100%
        quits.insert(Substance::Alcohol, now() - Duration::days(2)); // 50%

        let record = compute_system_health(now(), &quits, &[], &catalog, BodySystem::Heart);
        assert!((record.percent - 75.0).abs() < 1e-9);
        assert_eq!(record.contributing, 2);
    }

    #[test]
    fn test_untouched_system_reports_zero() {
        let catalog = heart_catalog();
        let mut quits = QuitDates::new();
        quits.insert(Substance::Cigarettes, now() - Duration::days(2));

        let record = compute_system_health(now(), &quits, &[], &catalog, BodySystem::Liver);
        assert_eq!(record.percent, 0.0);
        assert_eq!(record.contributing, 0);
    }

    #[test]
    fn test_inactive_substances_excluded() {
        let catalog = heart_catalog();
        // alcohol in the catalog but never quit
        let mut quits = QuitDates::new();
        quits.insert(Substance::Cigarettes, now() - Duration::days(4));

        let record = compute_system_health(now(), &quits, &[], &catalog, BodySystem::Heart);
        assert!((record.percent - 100.0).abs() < 1e-9);
        assert_eq!(record.contributing, 1);
    }

    #[test]
    fn test_profile_covers_all_systems() {
        let catalog = build_default_catalog();
        let mut quits = QuitDates::new();
        quits.insert(Substance::Alcohol, now() - Duration::days(30));

        let profile = system_health_profile(now(), &quits, &[], &catalog);
        assert_eq!(profile.len(), BodySystem::ALL.len());
    }
}
