//! Cross-substance aggregators layered on top of the progress engine:
//! overall health score, combined milestone timeline and the savings /
//! life-regained analytics.

use crate::engine::compute_progress;
use crate::relapse::resolve_effective_quit_date;
use crate::{
    AnalyticsRecord, Catalog, CostConfig, Event, QuitDates, Substance, SubstanceAnalytics,
    TimelineEntry, MS_PER_DAY,
};
use chrono::{DateTime, Utc};

/// How many completed milestones the combined timeline keeps
const COMPLETED_LIMIT: usize = 3;

/// Mean recovery percentage over the active substances
///
/// Substances without a quit date are excluded from the average entirely.
/// With no active substances the score is 0.
pub fn overall_health(
    now: DateTime<Utc>,
    quit_dates: &QuitDates,
    events: &[Event],
    catalog: &Catalog,
) -> f64 {
    let mut total = 0.0;
    let mut active = 0usize;

    for substance in Substance::ALL {
        let Some(&quit) = quit_dates.get(&substance) else {
            continue;
        };
        let record = compute_progress(now, Some(quit), substance, events, catalog);
        total += record.progress;
        active += 1;
    }

    if active == 0 {
        return 0.0;
    }
    total / active as f64
}

/// Merge every active substance's milestones into one timeline
///
/// Recently completed milestones come first (most recent first, at most
/// three), followed by upcoming milestones ordered by soonest. The combined
/// list is truncated to `max_items`.
pub fn combined_timeline(
    now: DateTime<Utc>,
    quit_dates: &QuitDates,
    events: &[Event],
    catalog: &Catalog,
    max_items: usize,
) -> Vec<TimelineEntry> {
    let mut completed: Vec<TimelineEntry> = Vec::new();
    let mut upcoming: Vec<TimelineEntry> = Vec::new();

    for substance in Substance::ALL {
        let Some(&quit) = quit_dates.get(&substance) else {
            continue;
        };
        let effective = resolve_effective_quit_date(quit, events, substance);
        let elapsed_ms = (now - effective).num_milliseconds();

        for m in catalog.milestones_for(substance) {
            let entry = TimelineEntry {
                substance,
                label: m.label.clone(),
                progress: m.progress,
                is_completed: elapsed_ms >= m.offset_ms,
                time_to_event_ms: m.offset_ms - elapsed_ms,
            };
            if entry.is_completed {
                completed.push(entry);
            } else {
                upcoming.push(entry);
            }
        }
    }

    // Most recently passed first; time_to_event is negative for these
    completed.sort_by_key(|e| std::cmp::Reverse(e.time_to_event_ms));
    completed.truncate(COMPLETED_LIMIT);

    // Soonest first
    upcoming.sort_by_key(|e| e.time_to_event_ms);

    completed.extend(upcoming);
    completed.truncate(max_items);
    completed
}

/// Pick a finite, non-negative per-day cost: user override first, then the
/// catalog profile, then 0
fn effective_cost(override_value: Option<f64>, profile_default: f64) -> f64 {
    match override_value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(_) => {
            if profile_default.is_finite() {
                profile_default
            } else {
                0.0
            }
        }
        None => {
            if profile_default.is_finite() {
                profile_default
            } else {
                0.0
            }
        }
    }
}

/// Coerce any non-finite intermediate to 0 so NaN never reaches a total
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Money saved, life-minutes regained and heartbeats saved across all
/// active substances
///
/// Per-day cost comes from the user's cost config when present and sane,
/// otherwise from the substance's catalog profile. Usage and per-unit
/// constants always come from the profile. Totals are guaranteed finite.
pub fn advanced_analytics(
    now: DateTime<Utc>,
    quit_dates: &QuitDates,
    events: &[Event],
    cost_config: &CostConfig,
    catalog: &Catalog,
) -> AnalyticsRecord {
    let mut record = AnalyticsRecord::default();

    for substance in Substance::ALL {
        let Some(&quit) = quit_dates.get(&substance) else {
            continue;
        };
        let Some(profile) = catalog.profile_for(substance) else {
            tracing::warn!(substance = substance.name(), "no analytics profile");
            continue;
        };

        let effective = resolve_effective_quit_date(quit, events, substance);
        let elapsed_ms = (now - effective).num_milliseconds().max(0);
        let days = elapsed_ms as f64 / MS_PER_DAY as f64;

        let cost_per_day =
            effective_cost(cost_config.get(&substance).copied(), profile.cost_per_day);

        let money = finite_or_zero(days * cost_per_day);
        let minutes = finite_or_zero(days * profile.units_per_day * profile.life_minutes_per_unit);
        let beats = finite_or_zero(days * profile.units_per_day * profile.heartbeats_per_unit);

        record.money_saved += money;
        record.life_minutes_regained += minutes;
        record.heartbeats_saved += beats;
        record.breakdown.push(SubstanceAnalytics {
            substance,
            days_clean: days,
            money_saved: money,
            life_minutes_regained: minutes,
            heartbeats_saved: beats,
        });
    }

    record
}
