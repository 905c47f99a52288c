//! Withdrawal symptom (mood) sub-model.
//!
//! Each (substance, indicator) pair has a triangular severity curve: it
//! rises linearly from 0 to 100 until the peak, falls linearly back to 0 by
//! the recovery point, then holds at 0. Pairs without a curve are reported
//! as not affected.

use crate::relapse::resolve_effective_quit_date;
use crate::{
    Event, MoodIndicator, MoodPhase, MoodRecord, Substance, MS_PER_DAY,
};
use chrono::{DateTime, Utc};

/// Symptom curve: time to peak severity and time to full recovery
#[derive(Clone, Copy, Debug)]
pub struct MoodCurve {
    pub peak_ms: i64,
    pub recovery_ms: i64,
}

const fn days(n: i64) -> i64 {
    n * MS_PER_DAY
}

const fn curve(peak_days: i64, recovery_days: i64) -> Option<MoodCurve> {
    Some(MoodCurve {
        peak_ms: days(peak_days),
        recovery_ms: days(recovery_days),
    })
}

/// Curve for a (substance, indicator) pair; `None` means not affected
pub fn mood_curve(substance: Substance, indicator: MoodIndicator) -> Option<MoodCurve> {
    use MoodIndicator::*;
    use Substance::*;

    match (substance, indicator) {
        (Cigarettes, Anxiety) => curve(3, 14),
        (Cigarettes, Irritability) => curve(3, 28),
        (Cigarettes, Insomnia) => curve(3, 21),
        (Cigarettes, Cravings) => curve(3, 90),
        (Cigarettes, BrainFog) => curve(7, 14),
        (Cigarettes, Appetite) => curve(14, 90),

        (Vape, Anxiety) => curve(2, 10),
        (Vape, Irritability) => curve(2, 21),
        (Vape, Insomnia) => curve(3, 14),
        (Vape, Cravings) => curve(3, 60),
        (Vape, BrainFog) => curve(5, 10),
        (Vape, Appetite) => None,

        (Cannabis, Anxiety) => curve(3, 28),
        (Cannabis, Irritability) => curve(7, 28),
        (Cannabis, Insomnia) => curve(7, 45),
        (Cannabis, Cravings) => curve(7, 60),
        (Cannabis, BrainFog) => curve(7, 30),
        (Cannabis, Appetite) => curve(3, 14),

        (Alcohol, Anxiety) => curve(3, 30),
        (Alcohol, Irritability) => curve(5, 30),
        (Alcohol, Insomnia) => curve(7, 42),
        (Alcohol, Cravings) => curve(14, 90),
        (Alcohol, BrainFog) => curve(7, 21),
        (Alcohol, Appetite) => None,
    }
}

/// Severity of one withdrawal symptom at a point in time
///
/// An inactive substance or an unaffected pair yields severity 0 and the
/// `NotAffected` phase.
pub fn compute_mood_progress(
    now: DateTime<Utc>,
    quit_date: Option<DateTime<Utc>>,
    events: &[Event],
    substance: Substance,
    indicator: MoodIndicator,
) -> MoodRecord {
    let not_affected = MoodRecord {
        indicator,
        severity: 0.0,
        phase: MoodPhase::NotAffected,
    };

    let Some(quit) = quit_date else {
        return not_affected;
    };
    let Some(curve) = mood_curve(substance, indicator) else {
        return not_affected;
    };

    let effective = resolve_effective_quit_date(quit, events, substance);
    let elapsed_ms = (now - effective).num_milliseconds().max(0);

    if elapsed_ms >= curve.recovery_ms {
        return MoodRecord {
            indicator,
            severity: 0.0,
            phase: MoodPhase::Recovered,
        };
    }

    if elapsed_ms < curve.peak_ms {
        let severity = 100.0 * elapsed_ms as f64 / curve.peak_ms as f64;
        return MoodRecord {
            indicator,
            severity: severity.clamp(0.0, 100.0),
            phase: MoodPhase::Building,
        };
    }

    let fall_span = (curve.recovery_ms - curve.peak_ms).max(1);
    let severity = 100.0 * (1.0 - (elapsed_ms - curve.peak_ms) as f64 / fall_span as f64);
    MoodRecord {
        indicator,
        severity: severity.clamp(0.0, 100.0),
        phase: MoodPhase::Declining,
    }
}

/// All indicators for one substance, in display order
pub fn mood_profile(
    now: DateTime<Utc>,
    quit_date: Option<DateTime<Utc>>,
    events: &[Event],
    substance: Substance,
) -> Vec<MoodRecord> {
    MoodIndicator::ALL
        .iter()
        .map(|&indicator| compute_mood_progress(now, quit_date, events, substance, indicator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_no_quit_date_not_affected() {
        let record =
            compute_mood_progress(now(), None, &[], Substance::Cigarettes, MoodIndicator::Anxiety);
        assert_eq!(record.phase, MoodPhase::NotAffected);
        assert_eq!(record.severity, 0.0);
    }

    #[test]
    fn test_unaffected_pair_not_affected() {
        let quit = now() - Duration::days(5);
        let record =
            compute_mood_progress(now(), Some(quit), &[], Substance::Vape, MoodIndicator::Appetite);
        assert_eq!(record.phase, MoodPhase::NotAffected);
    }

    #[test]
    fn test_building_phase_rises_linearly() {
        // cigarettes anxiety peaks at day 3
        let quit = now() - Duration::days(1) - Duration::hours(12);
        let record = compute_mood_progress(
            now(),
            Some(quit),
            &[],
            Substance::Cigarettes,
            MoodIndicator::Anxiety,
        );
        assert_eq!(record.phase, MoodPhase::Building);
        assert!((record.severity - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_declining_phase_falls_toward_zero() {
        // cigarettes anxiety: peak day 3, recovered day 14
        let quit = now() - Duration::days(10);
        let record = compute_mood_progress(
            now(),
            Some(quit),
            &[],
            Substance::Cigarettes,
            MoodIndicator::Anxiety,
        );
        assert_eq!(record.phase, MoodPhase::Declining);
        assert!(record.severity > 0.0 && record.severity < 100.0);
    }

    #[test]
    fn test_recovered_after_curve_end() {
        let quit = now() - Duration::days(20);
        let record = compute_mood_progress(
            now(),
            Some(quit),
            &[],
            Substance::Cigarettes,
            MoodIndicator::Anxiety,
        );
        assert_eq!(record.phase, MoodPhase::Recovered);
        assert_eq!(record.severity, 0.0);
    }

    #[test]
    fn test_profile_covers_all_indicators() {
        let quit = now() - Duration::days(5);
        let profile = mood_profile(now(), Some(quit), &[], Substance::Cannabis);
        assert_eq!(profile.len(), MoodIndicator::ALL.len());
    }
}
