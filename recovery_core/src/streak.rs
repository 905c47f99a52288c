//! Streak calculation: whole days clean since the effective quit date.

use crate::relapse::resolve_effective_quit_date;
use crate::{Event, StreakRecord, Substance, MS_PER_DAY};
use chrono::{DateTime, Utc};

/// Compute the current streak for one substance
///
/// Days are floored whole days since the effective quit date, never
/// negative. The streak is active whenever a quit date exists and the
/// effective date is not in the future.
pub fn compute_streak(
    now: DateTime<Utc>,
    quit_date: Option<DateTime<Utc>>,
    events: &[Event],
    substance: Substance,
) -> StreakRecord {
    let Some(quit) = quit_date else {
        return StreakRecord {
            days: 0,
            is_active: false,
            effective_quit_date: None,
        };
    };

    let effective = resolve_effective_quit_date(quit, events, substance);
    let elapsed_ms = (now - effective).num_milliseconds();

    StreakRecord {
        days: (elapsed_ms.max(0)) / MS_PER_DAY,
        is_active: elapsed_ms >= 0,
        effective_quit_date: Some(effective),
    }
}
