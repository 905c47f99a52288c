//! Progress engine: maps elapsed recovery time onto the milestone catalog.
//!
//! This is the heart of the system. Given a quit date, the relapse history
//! and a substance's ordered milestone table, it produces a `ProgressRecord`
//! with an interpolated recovery percentage, the current/next milestones and
//! the completed/upcoming milestone sets. Pure and deterministic: `now` is
//! an explicit argument, never read from the clock.

use crate::relapse::resolve_effective_quit_date;
use crate::{Catalog, Event, Milestone, ProgressRecord, Substance};
use chrono::{DateTime, Utc};

/// How many upcoming milestones a record carries
const UPCOMING_LIMIT: usize = 5;

/// Compute the recovery state for one substance
///
/// - `None` quit date means the substance is inactive: a zero record.
/// - A quit date that resolves into the future yields zero progress with
///   the first milestone as `next_milestone`.
/// - Between milestones, progress interpolates linearly inside the interval
///   and is clamped so it never exceeds the next milestone's value. Before
///   the first milestone the interpolation starts from the (0 ms, 0 %)
///   origin; past the last milestone progress holds at the final value.
pub fn compute_progress(
    now: DateTime<Utc>,
    quit_date: Option<DateTime<Utc>>,
    substance: Substance,
    events: &[Event],
    catalog: &Catalog,
) -> ProgressRecord {
    let Some(quit) = quit_date else {
        return ProgressRecord::inactive();
    };

    let table = catalog.milestones_for(substance);
    if table.is_empty() {
        tracing::warn!(substance = substance.name(), "no milestone table");
        return ProgressRecord::inactive();
    }

    let effective = resolve_effective_quit_date(quit, events, substance);
    let raw_elapsed_ms = (now - effective).num_milliseconds();

    // Quit date in the future: zero progress, everything still ahead
    if raw_elapsed_ms < 0 {
        return ProgressRecord {
            progress: 0.0,
            current_milestone: None,
            next_milestone: Some(table[0].clone()),
            elapsed_ms: 0,
            effective_quit_date: Some(effective),
            time_to_next_ms: Some(table[0].offset_ms - raw_elapsed_ms),
            completed: Vec::new(),
            upcoming: table.iter().take(UPCOMING_LIMIT).cloned().collect(),
        };
    }

    let elapsed_ms = raw_elapsed_ms;

    // Walk the ordered table: last reached milestone and first still ahead
    let reached = table.iter().take_while(|m| m.offset_ms <= elapsed_ms).count();
    let current = reached.checked_sub(1).map(|i| &table[i]);
    let next = table.get(reached);

    let progress = interpolate(current, next, elapsed_ms).clamp(0.0, 100.0);

    ProgressRecord {
        progress,
        current_milestone: current.cloned(),
        next_milestone: next.cloned(),
        elapsed_ms,
        effective_quit_date: Some(effective),
        time_to_next_ms: next.map(|m| m.offset_ms - elapsed_ms),
        completed: table[..reached].to_vec(),
        upcoming: table[reached..].iter().take(UPCOMING_LIMIT).cloned().collect(),
    }
}

/// Linear interpolation between the current milestone (or the origin) and
/// the next one, clamped to the next milestone's progress value
fn interpolate(current: Option<&Milestone>, next: Option<&Milestone>, elapsed_ms: i64) -> f64 {
    let (base_ms, base_progress) = match current {
        Some(m) => (m.offset_ms, m.progress),
        None => (0, 0.0),
    };

    let Some(next) = next else {
        // All milestones completed
        return base_progress;
    };

    let span_ms = next.offset_ms - base_ms;
    if span_ms <= 0 {
        return base_progress;
    }

    let fraction = (elapsed_ms - base_ms) as f64 / span_ms as f64;
    let value = base_progress + fraction * (next.progress - base_progress);
    value.min(next.progress)
}
