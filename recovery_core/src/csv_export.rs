//! CSV export of the event log.
//!
//! The JSONL log stays the source of truth; this module writes a flat CSV
//! copy for spreadsheets and external analysis.

use crate::{Event, Result};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    substance: String,
    kind: String,
    occurred_at: String,
    amount: Option<String>,
    feeling: Option<u8>,
    craving: Option<u8>,
    notes: Option<String>,
}

impl From<&Event> for CsvRow {
    fn from(event: &Event) -> Self {
        CsvRow {
            id: event.id.to_string(),
            substance: format!("{:?}", event.substance).to_lowercase(),
            kind: format!("{:?}", event.kind).to_lowercase(),
            occurred_at: event.occurred_at.to_rfc3339(),
            amount: event.amount.map(|a| format!("{:?}", a).to_lowercase()),
            feeling: event.feeling,
            craving: event.craving,
            notes: event.notes.clone(),
        }
    }
}

/// Write all events to a CSV file, replacing any previous export
///
/// Returns the number of rows written. The file is fsynced before return.
pub fn export_events(events: &[Event], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(csv_path)?;
    let mut writer = csv::Writer::from_writer(file);

    for event in events {
        writer.serialize(CsvRow::from(event))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} events to {:?}", events.len(), csv_path);
    Ok(events.len())
}
