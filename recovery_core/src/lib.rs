#![forbid(unsafe_code)]

//! Core domain model and recovery computation engine for Reclaim.
//!
//! This crate provides:
//! - Domain types (substances, events, milestones, derived records)
//! - The milestone catalog and analytics profiles
//! - Relapse impact resolution and the progress engine
//! - Streak, cross-substance aggregators and sub-models
//! - Event log persistence (JSONL, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod relapse;
pub mod engine;
pub mod streak;
pub mod aggregate;
pub mod mood;
pub mod neuro;
pub mod systems;
pub mod snapshot;
pub mod store;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use relapse::resolve_effective_quit_date;
pub use engine::compute_progress;
pub use streak::compute_streak;
pub use aggregate::{advanced_analytics, combined_timeline, overall_health};
pub use mood::{compute_mood_progress, mood_profile};
pub use neuro::{compute_neuro_progress, neuro_profile};
pub use systems::{compute_system_health, system_health_profile};
pub use snapshot::{compute_snapshot, Snapshot, SubstanceSnapshot};
pub use store::{delete_event, quit_dates, read_events, EventSink, JsonlSink};
pub use csv_export::export_events;
