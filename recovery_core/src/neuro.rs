//! Neurotransmitter recovery sub-model: a simple linear ramp from 0 to 100
//! over a per-(substance, transmitter) recovery window.

use crate::relapse::resolve_effective_quit_date;
use crate::{Event, NeuroPhase, NeuroRecord, Neurotransmitter, Substance, MS_PER_DAY};
use chrono::{DateTime, Utc};

/// Recovery window for a (substance, transmitter) pair; `None` means the
/// transmitter system is not affected by that substance
pub fn recovery_window_ms(
    substance: Substance,
    transmitter: Neurotransmitter,
) -> Option<i64> {
    use Neurotransmitter::*;
    use Substance::*;

    let days = match (substance, transmitter) {
        (Cigarettes, Dopamine) => 90,
        (Cigarettes, Serotonin) => 60,
        (Cigarettes, Acetylcholine) => 30,
        (Cigarettes, Endorphins) => 45,
        (Cigarettes, Gaba) => return None,

        (Vape, Dopamine) => 60,
        (Vape, Serotonin) => 45,
        (Vape, Acetylcholine) => 21,
        (Vape, Gaba) | (Vape, Endorphins) => return None,

        (Cannabis, Dopamine) => 90,
        (Cannabis, Serotonin) => 60,
        (Cannabis, Gaba) => 45,
        (Cannabis, Acetylcholine) | (Cannabis, Endorphins) => return None,

        (Alcohol, Gaba) => 60,
        (Alcohol, Dopamine) => 90,
        (Alcohol, Serotonin) => 90,
        (Alcohol, Endorphins) => 30,
        (Alcohol, Acetylcholine) => return None,
    };

    Some(days * MS_PER_DAY)
}

/// Phase thresholds over the ramp percentage
fn phase_for(progress: f64) -> NeuroPhase {
    if progress >= 75.0 {
        NeuroPhase::Recovered
    } else if progress >= 25.0 {
        NeuroPhase::Progressing
    } else {
        NeuroPhase::Early
    }
}

/// Recovery of one neurotransmitter system at a point in time
///
/// Progress ramps linearly to 100 over the recovery window and is capped
/// there. Inactive substances and unaffected pairs yield a neutral record.
pub fn compute_neuro_progress(
    now: DateTime<Utc>,
    quit_date: Option<DateTime<Utc>>,
    events: &[Event],
    substance: Substance,
    transmitter: Neurotransmitter,
) -> NeuroRecord {
    let not_affected = NeuroRecord {
        transmitter,
        progress: 0.0,
        phase: NeuroPhase::NotAffected,
    };

    let Some(quit) = quit_date else {
        return not_affected;
    };
    let Some(window_ms) = recovery_window_ms(substance, transmitter) else {
        return not_affected;
    };

    let effective = resolve_effective_quit_date(quit, events, substance);
    let elapsed_ms = (now - effective).num_milliseconds().max(0);

    let progress = (100.0 * elapsed_ms as f64 / window_ms as f64).min(100.0);

    NeuroRecord {
        transmitter,
        progress,
        phase: phase_for(progress),
    }
}

/// All transmitter systems for one substance, in display order
pub fn neuro_profile(
    now: DateTime<Utc>,
    quit_date: Option<DateTime<Utc>>,
    events: &[Event],
    substance: Substance,
) -> Vec<NeuroRecord> {
    Neurotransmitter::ALL
        .iter()
        .map(|&t| compute_neuro_progress(now, quit_date, events, substance, t))
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
        let record = compute_neuro_progress(
            now(),
            None,
            &[],
            Substance::Cigarettes,
            Neurotransmitter::Dopamine,
        );
        assert_eq!(record.phase, NeuroPhase::NotAffected);
        assert_eq!(record.progress, 0.0);
    }

    #[test]
    fn test_unaffected_pair_not_affected() {
        let quit = now() - Duration::days(30);
        let record = compute_neuro_progress(
            now(),
            Some(quit),
            &[],
            Substance::Cigarettes,
            Neurotransmitter::Gaba,
        );
        assert_eq!(record.phase, NeuroPhase::NotAffected);
    }

    #[test]
    fn test_early_phase_below_quarter() {
        // dopamine window for cigarettes is 90 days
        let quit = now() - Duration::days(9);
        let record = compute_neuro_progress(
            now(),
            Some(quit),
            &[],
            Substance::Cigarettes,
            Neurotransmitter::Dopamine,
        );
        assert_eq!(record.phase, NeuroPhase::Early);
        assert!((record.progress - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_progressing_phase_midway() {
        let quit = now() - Duration::days(45);
        let record = compute_neuro_progress(
            now(),
            Some(quit),
            &[],
            Substance::Cigarettes,
            Neurotransmitter::Dopamine,
        );
        assert_eq!(record.phase, NeuroPhase::Progressing);
        assert!((record.progress - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_capped_at_hundred_and_recovered() {
        let quit = now() - Duration::days(400);
        let record = compute_neuro_progress(
            now(),
            Some(quit),
            &[],
            Substance::Cigarettes,
            Neurotransmitter::Dopamine,
        );
        assert_eq!(record.progress, 100.0);
        assert_eq!(record.phase, NeuroPhase::Recovered);
    }

    #[test]
    fn test_profile_covers_all_transmitters() {
        let quit = now() - Duration::days(10);
        let profile = neuro_profile(now(), Some(quit), &[], Substance::Alcohol);
        assert_eq!(profile.len(), Neurotransmitter::ALL.len());
    }
}
