//! Default milestone catalog and analytics profiles.
//!
//! This module provides the built-in recovery timelines for each substance.
//! Milestone tables are ordered by offset and carry cumulative progress
//! percentages; the final milestone of every table sits at 100%.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
///
/// This function returns a reference to the pre-built catalog, avoiding
/// the overhead of rebuilding the milestone tables on every recompute.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in milestone tables and profiles
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn milestone(offset_ms: i64, progress: f64, label: &str, systems: &[BodySystem]) -> Milestone {
    Milestone {
        offset_ms,
        progress,
        label: label.into(),
        systems: systems.to_vec(),
    }
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    use BodySystem::*;

    let mut milestones = HashMap::new();
    let mut profiles = HashMap::new();

    // ========================================================================
    // Cigarettes
    // ========================================================================

    milestones.insert(
        Substance::Cigarettes,
        vec![
            milestone(
                20 * MS_PER_MINUTE,
                1.0,
                "Heart rate and blood pressure drop back to baseline",
                &[Heart, Circulation],
            ),
            milestone(
                12 * MS_PER_HOUR,
                5.0,
                "Carbon monoxide in the blood returns to normal",
                &[Circulation],
            ),
            milestone(
                MS_PER_DAY,
                8.0,
                "Heart attack risk begins to fall",
                &[Heart],
            ),
            milestone(
                2 * MS_PER_DAY,
                12.0,
                "Nerve endings regrow; taste and smell sharpen",
                &[Brain],
            ),
            milestone(
                3 * MS_PER_DAY,
                18.0,
                "Nicotine fully eliminated; breathing eases",
                &[Lungs, Brain],
            ),
            milestone(
                14 * MS_PER_DAY,
                35.0,
                "Circulation and walking endurance improve",
                &[Circulation, Heart],
            ),
            milestone(
                30 * MS_PER_DAY,
                50.0,
                "Lung function up; coughing and sinus congestion decline",
                &[Lungs],
            ),
            milestone(
                90 * MS_PER_DAY,
                70.0,
                "Cilia regrown; lung infection risk drops",
                &[Lungs],
            ),
            milestone(
                270 * MS_PER_DAY,
                85.0,
                "Fatigue and shortness of breath resolved",
                &[Lungs],
            ),
            milestone(
                365 * MS_PER_DAY,
                100.0,
                "Excess heart disease risk cut in half",
                &[Heart],
            ),
        ],
    );
    profiles.insert(
        Substance::Cigarettes,
        AnalyticsProfile {
            cost_per_day: 12.0,
            units_per_day: 20.0,
            life_minutes_per_unit: 11.0,
            heartbeats_per_unit: 250.0,
        },
    );

    // ========================================================================
    // Vape
    // ========================================================================

    milestones.insert(
        Substance::Vape,
        vec![
            milestone(
                20 * MS_PER_MINUTE,
                1.0,
                "Heart rate settles back to baseline",
                &[Heart],
            ),
            milestone(
                MS_PER_DAY,
                8.0,
                "Nicotine levels drop sharply",
                &[Brain],
            ),
            milestone(
                3 * MS_PER_DAY,
                15.0,
                "Nicotine eliminated; cravings peak and begin to fade",
                &[Brain],
            ),
            milestone(
                7 * MS_PER_DAY,
                25.0,
                "Taste and smell noticeably sharper",
                &[Brain],
            ),
            milestone(
                21 * MS_PER_DAY,
                45.0,
                "Nicotine receptors rebalancing; focus returns",
                &[Brain],
            ),
            milestone(
                30 * MS_PER_DAY,
                55.0,
                "Airway irritation and coughing subside",
                &[Lungs],
            ),
            milestone(
                90 * MS_PER_DAY,
                75.0,
                "Circulation and lung capacity restored",
                &[Circulation, Lungs],
            ),
            milestone(
                365 * MS_PER_DAY,
                100.0,
                "Airways fully recovered",
                &[Lungs],
            ),
        ],
    );
    profiles.insert(
        Substance::Vape,
        AnalyticsProfile {
            cost_per_day: 5.0,
            units_per_day: 1.0,
            life_minutes_per_unit: 120.0,
            heartbeats_per_unit: 3500.0,
        },
    );

    // ========================================================================
    // Cannabis
    // ========================================================================

    milestones.insert(
        Substance::Cannabis,
        vec![
            milestone(MS_PER_DAY, 5.0, "THC levels fall steeply", &[Brain]),
            milestone(
                3 * MS_PER_DAY,
                12.0,
                "Sleep disruption peaks, then begins to ease",
                &[Brain],
            ),
            milestone(
                7 * MS_PER_DAY,
                25.0,
                "REM sleep and dreaming rebound",
                &[Brain],
            ),
            milestone(
                14 * MS_PER_DAY,
                40.0,
                "Appetite and mood stabilize",
                &[Brain],
            ),
            milestone(
                30 * MS_PER_DAY,
                60.0,
                "THC metabolites cleared from the body",
                &[Liver, Brain],
            ),
            milestone(
                60 * MS_PER_DAY,
                80.0,
                "Short-term memory and focus recover",
                &[Brain],
            ),
            milestone(
                90 * MS_PER_DAY,
                100.0,
                "Dopamine receptor density restored",
                &[Brain],
            ),
        ],
    );
    profiles.insert(
        Substance::Cannabis,
        AnalyticsProfile {
            cost_per_day: 10.0,
            units_per_day: 2.0,
            life_minutes_per_unit: 5.0,
            heartbeats_per_unit: 180.0,
        },
    );

    // ========================================================================
    // Alcohol
    // ========================================================================

    milestones.insert(
        Substance::Alcohol,
        vec![
            milestone(
                12 * MS_PER_HOUR,
                3.0,
                "Blood sugar stabilizes",
                &[Liver],
            ),
            milestone(
                MS_PER_DAY,
                8.0,
                "Withdrawal symptoms peak",
                &[Brain],
            ),
            milestone(
                3 * MS_PER_DAY,
                15.0,
                "Alcohol fully cleared from the body",
                &[Liver],
            ),
            milestone(
                7 * MS_PER_DAY,
                28.0,
                "Sleep quality improves; skin rehydrates",
                &[Brain, Skin],
            ),
            milestone(
                14 * MS_PER_DAY,
                40.0,
                "Liver fat reduction begins",
                &[Liver],
            ),
            milestone(
                30 * MS_PER_DAY,
                60.0,
                "Blood pressure falls; liver fat down noticeably",
                &[Heart, Liver],
            ),
            milestone(
                90 * MS_PER_DAY,
                85.0,
                "Liver function largely restored",
                &[Liver],
            ),
            milestone(
                365 * MS_PER_DAY,
                100.0,
                "Cardiovascular and cancer risk markedly reduced",
                &[Heart, Liver],
            ),
        ],
    );
    profiles.insert(
        Substance::Alcohol,
        AnalyticsProfile {
            cost_per_day: 15.0,
            units_per_day: 3.0,
            life_minutes_per_unit: 15.0,
            heartbeats_per_unit: 120.0,
        },
    );

    Catalog {
        milestones,
        profiles,
    }
}

impl Catalog {
    /// Milestone table for a substance; empty slice if unknown
    pub fn milestones_for(&self, substance: Substance) -> &[Milestone] {
        self.milestones
            .get(&substance)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Analytics profile for a substance, if configured
    pub fn profile_for(&self, substance: Substance) -> Option<&AnalyticsProfile> {
        self.profiles.get(&substance)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for substance in Substance::ALL {
            let Some(table) = self.milestones.get(&substance) else {
                errors.push(format!("{}: no milestone table", substance.name()));
                continue;
            };

            if table.is_empty() {
                errors.push(format!("{}: milestone table is empty", substance.name()));
                continue;
            }

            let mut prev_offset = -1i64;
            let mut prev_progress = -1.0f64;
            for (i, m) in table.iter().enumerate() {
                if m.offset_ms <= prev_offset {
                    errors.push(format!(
                        "{}: milestone {} offset {} not strictly increasing",
                        substance.name(),
                        i,
                        m.offset_ms
                    ));
                }
                if m.progress < prev_progress {
                    errors.push(format!(
                        "{}: milestone {} progress {} decreases",
                        substance.name(),
                        i,
                        m.progress
                    ));
                }
                if !(0.0..=100.0).contains(&m.progress) {
                    errors.push(format!(
                        "{}: milestone {} progress {} outside [0, 100]",
                        substance.name(),
                        i,
                        m.progress
                    ));
                }
                if m.label.is_empty() {
                    errors.push(format!("{}: milestone {} has empty label", substance.name(), i));
                }
                prev_offset = m.offset_ms;
                prev_progress = m.progress;
            }

            if let Some(last) = table.last() {
                if last.progress != 100.0 {
                    errors.push(format!(
                        "{}: final milestone progress is {}, expected 100",
                        substance.name(),
                        last.progress
                    ));
                }
            }

            match self.profiles.get(&substance) {
                None => errors.push(format!("{}: no analytics profile", substance.name())),
                Some(p) => {
                    let fields = [
                        ("cost_per_day", p.cost_per_day),
                        ("units_per_day", p.units_per_day),
                        ("life_minutes_per_unit", p.life_minutes_per_unit),
                        ("heartbeats_per_unit", p.heartbeats_per_unit),
                    ];
                    for (name, value) in fields {
                        if !value.is_finite() || value < 0.0 {
                            errors.push(format!(
                                "{}: profile {} is {}, expected finite >= 0",
                                substance.name(),
                                name,
                                value
                            ));
                        }
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_all_substances() {
        let catalog = build_default_catalog();
        for substance in Substance::ALL {
            assert!(
                !catalog.milestones_for(substance).is_empty(),
                "{} has no milestones",
                substance.name()
            );
            assert!(
                catalog.profile_for(substance).is_some(),
                "{} has no profile",
                substance.name()
            );
        }
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_milestones_end_at_full_recovery() {
        let catalog = build_default_catalog();
        for substance in Substance::ALL {
            let table = catalog.milestones_for(substance);
            assert_eq!(table.last().unwrap().progress, 100.0);
        }
    }

    #[test]
    fn test_validate_rejects_decreasing_progress() {
        let mut catalog = build_default_catalog();
        let table = catalog.milestones.get_mut(&Substance::Cigarettes).unwrap();
        table[1].progress = 0.5; // below milestone 0

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("decreases")), "{:?}", errors);
    }

    #[test]
    fn test_validate_rejects_unordered_offsets() {
        let mut catalog = build_default_catalog();
        let table = catalog.milestones.get_mut(&Substance::Alcohol).unwrap();
        table.swap(0, 1);

        let errors = catalog.validate();
        assert!(
            errors.iter().any(|e| e.contains("not strictly increasing")),
            "{:?}",
            errors
        );
    }

    #[test]
    fn test_cached_catalog_is_stable() {
        let a = get_default_catalog();
        let b = get_default_catalog();
        assert!(std::ptr::eq(a, b));
    }
}
