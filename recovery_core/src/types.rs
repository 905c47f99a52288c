//! Core domain types for the Reclaim recovery tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Substances and tracked events (quit, relapse, check-in)
//! - Milestones and the per-substance catalog
//! - Derived records produced by the engine (progress, streak, analytics)
//! - Sub-model records (mood, neurotransmitters, body systems)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Milliseconds in one minute
pub const MS_PER_MINUTE: i64 = 60_000;
/// Milliseconds in one hour
pub const MS_PER_HOUR: i64 = 3_600_000;
/// Milliseconds in one day
pub const MS_PER_DAY: i64 = 86_400_000;

// ============================================================================
// Substance and Event Types
// ============================================================================

/// A tracked substance
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Substance {
    Cigarettes,
    Vape,
    Cannabis,
    Alcohol,
}

impl Substance {
    /// All tracked substances, in display order
    pub const ALL: [Substance; 4] = [
        Substance::Cigarettes,
        Substance::Vape,
        Substance::Cannabis,
        Substance::Alcohol,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Substance::Cigarettes => "Cigarettes",
            Substance::Vape => "Vape",
            Substance::Cannabis => "Cannabis",
            Substance::Alcohol => "Alcohol",
        }
    }

    /// Parse the canonical snake_case key used in config files
    pub fn from_key(key: &str) -> Option<Substance> {
        match key {
            "cigarettes" => Some(Substance::Cigarettes),
            "vape" => Some(Substance::Vape),
            "cannabis" => Some(Substance::Cannabis),
            "alcohol" => Some(Substance::Alcohol),
            _ => None,
        }
    }
}

/// Kind of a logged event
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Started a quit protocol (sets/overwrites the quit date)
    Quit,
    /// Used the substance after quitting
    Relapse,
    /// A mood/craving check-in with no usage
    Log,
}

/// Qualitative usage amount attached to a relapse
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelapseAmount {
    Light,
    Moderate,
    Heavy,
}

/// A user-logged event. Immutable once created; may only be deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub substance: Substance,
    pub kind: EventKind,
    pub occurred_at: DateTime<Utc>,
    /// Qualitative amount for relapse events; `None` means unspecified
    pub amount: Option<RelapseAmount>,
    /// Mood score, 0 (awful) to 100 (great)
    pub feeling: Option<u8>,
    /// Craving intensity, 0 to 100
    pub craving: Option<u8>,
    pub notes: Option<String>,
}

impl Event {
    /// Create a bare event with a fresh id and no optional fields
    pub fn new(substance: Substance, kind: EventKind, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            substance,
            kind,
            occurred_at,
            amount: None,
            feeling: None,
            craving: None,
            notes: None,
        }
    }
}

/// Quit dates per substance; a substance absent from the map is inactive
pub type QuitDates = HashMap<Substance, DateTime<Utc>>;

/// User overrides for per-day spend; substances absent from the map fall
/// back to the catalog profile default
pub type CostConfig = HashMap<Substance, f64>;

// ============================================================================
// Milestone and Catalog Types
// ============================================================================

/// A body system affected by recovery milestones
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BodySystem {
    Heart,
    Lungs,
    Brain,
    Circulation,
    Liver,
    Skin,
}

impl BodySystem {
    /// All body systems, in display order
    pub const ALL: [BodySystem; 6] = [
        BodySystem::Heart,
        BodySystem::Lungs,
        BodySystem::Brain,
        BodySystem::Circulation,
        BodySystem::Liver,
        BodySystem::Skin,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            BodySystem::Heart => "Heart",
            BodySystem::Lungs => "Lungs",
            BodySystem::Brain => "Brain",
            BodySystem::Circulation => "Circulation",
            BodySystem::Liver => "Liver",
            BodySystem::Skin => "Skin",
        }
    }
}

/// A named point on a substance's recovery timeline
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    /// Offset from the effective quit date, in milliseconds
    pub offset_ms: i64,
    /// Cumulative recovery percentage reached at this milestone (0-100)
    pub progress: f64,
    pub label: String,
    /// Body systems this milestone speaks to
    pub systems: Vec<BodySystem>,
}

/// Per-substance constants for the savings/life-regained analytics
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AnalyticsProfile {
    /// Default money spent per day, in the user's currency
    pub cost_per_day: f64,
    /// Typical units consumed per day (cigarettes, pods, joints, drinks)
    pub units_per_day: f64,
    /// Estimated life-minutes lost per unit
    pub life_minutes_per_unit: f64,
    /// Estimated excess heartbeats per unit
    pub heartbeats_per_unit: f64,
}

/// The complete static configuration: milestone tables and analytics profiles
#[derive(Clone, Debug)]
pub struct Catalog {
    pub milestones: HashMap<Substance, Vec<Milestone>>,
    pub profiles: HashMap<Substance, AnalyticsProfile>,
}

// ============================================================================
// Derived Record Types
// ============================================================================

/// Per-substance recovery state, recomputed on demand and never persisted
#[derive(Clone, Debug, Serialize)]
pub struct ProgressRecord {
    /// Interpolated recovery percentage, clamped to [0, 100]
    pub progress: f64,
    /// Last milestone already reached, if any
    pub current_milestone: Option<Milestone>,
    /// First milestone not yet reached, if any
    pub next_milestone: Option<Milestone>,
    /// Time since the effective quit date, clamped to >= 0
    pub elapsed_ms: i64,
    pub effective_quit_date: Option<DateTime<Utc>>,
    /// Time remaining until the next milestone; `None` when all are done
    pub time_to_next_ms: Option<i64>,
    /// All milestones already reached, in catalog order
    pub completed: Vec<Milestone>,
    /// The next few milestones still ahead (at most 5)
    pub upcoming: Vec<Milestone>,
}

impl ProgressRecord {
    /// Neutral record for a substance with no quit date
    pub fn inactive() -> Self {
        Self {
            progress: 0.0,
            current_milestone: None,
            next_milestone: None,
            elapsed_ms: 0,
            effective_quit_date: None,
            time_to_next_ms: None,
            completed: Vec::new(),
            upcoming: Vec::new(),
        }
    }
}

/// Whole-day streak since the effective quit date
#[derive(Clone, Copy, Debug, Serialize)]
pub struct StreakRecord {
    pub days: i64,
    pub is_active: bool,
    pub effective_quit_date: Option<DateTime<Utc>>,
}

/// One entry in the combined cross-substance timeline
#[derive(Clone, Debug, Serialize)]
pub struct TimelineEntry {
    pub substance: Substance,
    pub label: String,
    pub progress: f64,
    pub is_completed: bool,
    /// `milestone.offset - elapsed`; negative for completed milestones
    pub time_to_event_ms: i64,
}

/// Per-substance analytics contribution
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SubstanceAnalytics {
    pub substance: Substance,
    pub days_clean: f64,
    pub money_saved: f64,
    pub life_minutes_regained: f64,
    pub heartbeats_saved: f64,
}

/// Cross-substance savings and life-regained totals
#[derive(Clone, Debug, Serialize, Default)]
pub struct AnalyticsRecord {
    pub money_saved: f64,
    pub life_minutes_regained: f64,
    pub heartbeats_saved: f64,
    pub breakdown: Vec<SubstanceAnalytics>,
}

// ============================================================================
// Sub-model Types
// ============================================================================

/// Withdrawal symptom indicators tracked by the mood sub-model
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoodIndicator {
    Anxiety,
    Irritability,
    Insomnia,
    Cravings,
    BrainFog,
    Appetite,
}

impl MoodIndicator {
    /// All indicators, in display order
    pub const ALL: [MoodIndicator; 6] = [
        MoodIndicator::Anxiety,
        MoodIndicator::Irritability,
        MoodIndicator::Insomnia,
        MoodIndicator::Cravings,
        MoodIndicator::BrainFog,
        MoodIndicator::Appetite,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            MoodIndicator::Anxiety => "Anxiety",
            MoodIndicator::Irritability => "Irritability",
            MoodIndicator::Insomnia => "Insomnia",
            MoodIndicator::Cravings => "Cravings",
            MoodIndicator::BrainFog => "Brain fog",
            MoodIndicator::Appetite => "Appetite changes",
        }
    }
}

/// Phase of a withdrawal symptom curve
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoodPhase {
    Building,
    Declining,
    Recovered,
    NotAffected,
}

/// Severity of one symptom for one substance at a point in time
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MoodRecord {
    pub indicator: MoodIndicator,
    /// 0 (absent) to 100 (peak)
    pub severity: f64,
    pub phase: MoodPhase,
}

/// Neurotransmitter systems tracked by the recovery sub-model
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Neurotransmitter {
    Dopamine,
    Serotonin,
    Acetylcholine,
    Gaba,
    Endorphins,
}

impl Neurotransmitter {
    /// All transmitters, in display order
    pub const ALL: [Neurotransmitter; 5] = [
        Neurotransmitter::Dopamine,
        Neurotransmitter::Serotonin,
        Neurotransmitter::Acetylcholine,
        Neurotransmitter::Gaba,
        Neurotransmitter::Endorphins,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Neurotransmitter::Dopamine => "Dopamine",
            Neurotransmitter::Serotonin => "Serotonin",
            Neurotransmitter::Acetylcholine => "Acetylcholine",
            Neurotransmitter::Gaba => "GABA",
            Neurotransmitter::Endorphins => "Endorphins",
        }
    }
}

/// Phase of a neurotransmitter recovery ramp
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NeuroPhase {
    Early,
    Progressing,
    Recovered,
    NotAffected,
}

/// Recovery of one neurotransmitter system for one substance
#[derive(Clone, Copy, Debug, Serialize)]
pub struct NeuroRecord {
    pub transmitter: Neurotransmitter,
    /// 0 to 100
    pub progress: f64,
    pub phase: NeuroPhase,
}

/// Health of one body system, aggregated across active substances
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SystemHealthRecord {
    pub system: BodySystem,
    /// Percentage of this system's milestones completed, averaged over
    /// the active substances that affect it
    pub percent: f64,
    /// Number of active substances contributing to the average
    pub contributing: usize,
}
