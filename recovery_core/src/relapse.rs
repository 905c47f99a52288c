//! Relapse impact resolution.
//!
//! A relapse does not wipe a streak back to zero. Only the most recent
//! relapse after the quit date matters, and it pushes the effective quit
//! date forward from the relapse moment by a severity-scaled setback of up
//! to three days.

use crate::{Event, EventKind, RelapseAmount, Substance, MS_PER_DAY};
use chrono::{DateTime, Duration, Utc};

/// Full setback window a heavy relapse costs, in milliseconds
const SETBACK_WINDOW_MS: i64 = 3 * MS_PER_DAY;

/// Severity multiplier for a relapse amount
///
/// Unspecified amounts get the middle-ground 0.5 factor.
pub fn impact_factor(amount: Option<RelapseAmount>) -> f64 {
    match amount {
        Some(RelapseAmount::Light) => 0.3,
        Some(RelapseAmount::Moderate) => 0.7,
        Some(RelapseAmount::Heavy) => 1.0,
        None => 0.5,
    }
}

/// Resolve the effective quit date for a substance
///
/// Filters `events` to relapses for `substance` strictly after `original`,
/// takes the most recent one, and returns its timestamp pushed forward by
/// `impact_factor * 3 days`. With no qualifying relapse the original quit
/// date is returned unchanged. The result is always >= `original`.
pub fn resolve_effective_quit_date(
    original: DateTime<Utc>,
    events: &[Event],
    substance: Substance,
) -> DateTime<Utc> {
    let latest = events
        .iter()
        .filter(|e| {
            e.substance == substance && e.kind == EventKind::Relapse && e.occurred_at > original
        })
        .max_by_key(|e| e.occurred_at);

    let Some(relapse) = latest else {
        return original;
    };

    let setback_ms = (impact_factor(relapse.amount) * SETBACK_WINDOW_MS as f64) as i64;
    let effective = relapse.occurred_at + Duration::milliseconds(setback_ms);

    tracing::debug!(
        substance = substance.name(),
        relapse_at = %relapse.occurred_at,
        setback_ms,
        "resolved effective quit date"
    );

    effective
}
