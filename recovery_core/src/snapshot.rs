//! Recompute-on-snapshot entry point.
//!
//! The host (CLI, timer loop) holds no derived state: it calls
//! `compute_snapshot` whenever the event log changes or a tick fires, and
//! replaces whatever snapshot it held before. Results are independent value
//! objects, so overlapping recomputes cannot race.

use crate::aggregate::{advanced_analytics, combined_timeline, overall_health};
use crate::engine::compute_progress;
use crate::streak::compute_streak;
use crate::{
    AnalyticsRecord, Catalog, CostConfig, Event, ProgressRecord, QuitDates, StreakRecord,
    Substance, TimelineEntry,
};
use chrono::{DateTime, Utc};

/// How many combined timeline entries a snapshot carries
const TIMELINE_ITEMS: usize = 8;

/// Recovery state of one substance inside a snapshot
#[derive(Clone, Debug, serde::Serialize)]
pub struct SubstanceSnapshot {
    pub substance: Substance,
    pub progress: ProgressRecord,
    pub streak: StreakRecord,
}

/// Full derived state at one instant
#[derive(Clone, Debug, serde::Serialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    /// Active substances only, in display order
    pub substances: Vec<SubstanceSnapshot>,
    pub overall_health: f64,
    pub analytics: AnalyticsRecord,
    pub timeline: Vec<TimelineEntry>,
}

/// Recompute the complete derived state from an input snapshot
pub fn compute_snapshot(
    now: DateTime<Utc>,
    quit_dates: &QuitDates,
    events: &[Event],
    cost_config: &CostConfig,
    catalog: &Catalog,
) -> Snapshot {
    let substances = Substance::ALL
        .iter()
        .filter_map(|&substance| {
            let quit = *quit_dates.get(&substance)?;
            Some(SubstanceSnapshot {
                substance,
                progress: compute_progress(now, Some(quit), substance, events, catalog),
                streak: compute_streak(now, Some(quit), events, substance),
            })
        })
        .collect();

    Snapshot {
        generated_at: now,
        substances,
        overall_health: overall_health(now, quit_dates, events, catalog),
        analytics: advanced_analytics(now, quit_dates, events, cost_config, catalog),
        timeline: combined_timeline(now, quit_dates, events, catalog, TIMELINE_ITEMS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_inputs_yield_neutral_snapshot() {
        let catalog = build_default_catalog();
        let snapshot =
            compute_snapshot(now(), &QuitDates::new(), &[], &CostConfig::new(), &catalog);

        assert!(snapshot.substances.is_empty());
        assert_eq!(snapshot.overall_health, 0.0);
        assert_eq!(snapshot.analytics.money_saved, 0.0);
        assert!(snapshot.timeline.is_empty());
    }

    #[test]
    fn test_snapshot_includes_only_active_substances() {
        let catalog = build_default_catalog();
        let mut quits = QuitDates::new();
        quits.insert(Substance::Cigarettes, now() - Duration::days(10));
        quits.insert(Substance::Cannabis, now() - Duration::days(3));

        let snapshot = compute_snapshot(now(), &quits, &[], &CostConfig::new(), &catalog);

        assert_eq!(snapshot.substances.len(), 2);
        assert!(snapshot.overall_health > 0.0);
        assert!(snapshot.analytics.money_saved > 0.0);
        assert!(!snapshot.timeline.is_empty());
    }

    #[test]
    fn test_snapshot_deterministic_for_fixed_now() {
        let catalog = build_default_catalog();
        let mut quits = QuitDates::new();
        quits.insert(Substance::Alcohol, now() - Duration::days(20));

        let a = compute_snapshot(now(), &quits, &[], &CostConfig::new(), &catalog);
        let b = compute_snapshot(now(), &quits, &[], &CostConfig::new(), &catalog);

        assert_eq!(a.overall_health, b.overall_health);
        assert_eq!(a.analytics.money_saved, b.analytics.money_saved);
        assert_eq!(a.timeline.len(), b.timeline.len());
    }
}
