//! Append-only event log.
//!
//! Events are appended to a JSONL (JSON Lines) file with file locking to
//! ensure safe concurrent access. The log is the single source of truth:
//! quit dates are derived from it, never stored separately.

use crate::{Error, Event, EventKind, QuitDates, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Event sink trait for persisting events
pub trait EventSink {
    fn append(&mut self, event: &Event) -> Result<()>;
}

/// JSONL-based event sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EventSink for JsonlSink {
    fn append(&mut self, event: &Event) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended event {} to log", event.id);
        Ok(())
    }
}

/// Read all events from the log, in the order they were recorded
///
/// Corrupt lines are skipped with a warning; the rest of the log survives.
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Event>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse event at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} events from log", events.len());
    Ok(events)
}

/// Delete one event by id, rewriting the log atomically
///
/// The surviving events are written to a temp file in the same directory
/// which is then renamed over the log. Returns an error if no event with
/// the given id exists.
pub fn delete_event(path: &Path, id: Uuid) -> Result<()> {
    let events = read_events(path)?;
    let survivors: Vec<&Event> = events.iter().filter(|e| e.id != id).collect();

    if survivors.len() == events.len() {
        return Err(Error::Store(format!("no event with id {}", id)));
    }

    let parent = path
        .parent()
        .ok_or_else(|| Error::Store("event log path missing parent".into()))?;
    let temp = NamedTempFile::new_in(parent)?;

    temp.as_file().lock_exclusive()?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        for event in &survivors {
            let line = serde_json::to_string(event)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Deleted event {}", id);
    Ok(())
}

/// Derive quit dates from the event log
///
/// The most recently *recorded* Quit event per substance wins: re-quitting
/// is a deliberate fresh start that overwrites the earlier date, regardless
/// of the events' own timestamps.
pub fn quit_dates(events: &[Event]) -> QuitDates {
    let mut dates = QuitDates::new();
    for event in events {
        if event.kind == EventKind::Quit {
            dates.insert(event.substance, event.occurred_at);
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Substance;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn quit_event(substance: Substance, days_after: i64) -> Event {
        Event::new(substance, EventKind::Quit, t0() + Duration::days(days_after))
    }

    #[test]
    fn test_append_and_read_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("events.jsonl");

        let event = quit_event(Substance::Cigarettes, 0);
        let event_id = event.id;

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&event).unwrap();

        let events = read_events(&log_path).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, event_id);
        assert_eq!(events[0].substance, Substance::Cigarettes);
    }

    #[test]
    fn test_events_preserved_in_record_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("events.jsonl");

        let mut sink = JsonlSink::new(&log_path);
        let ids: Vec<Uuid> = (0..5)
            .map(|i| {
                let event = quit_event(Substance::Alcohol, i);
                sink.append(&event).unwrap();
                event.id
            })
            .collect();

        let events = read_events(&log_path).unwrap();
        let read_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        assert_eq!(read_ids, ids);
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let events = read_events(&temp_dir.path().join("nonexistent.jsonl")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_corrupt_line_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("events.jsonl");

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&quit_event(Substance::Vape, 0)).unwrap();

        // inject garbage between two valid lines
        {
            let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        sink.append(&quit_event(Substance::Cannabis, 1)).unwrap();

        let events = read_events(&log_path).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_delete_event_removes_exactly_one() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("events.jsonl");

        let mut sink = JsonlSink::new(&log_path);
        let keep = quit_event(Substance::Cigarettes, 0);
        let remove = quit_event(Substance::Alcohol, 1);
        sink.append(&keep).unwrap();
        sink.append(&remove).unwrap();

        delete_event(&log_path, remove.id).unwrap();

        let events = read_events(&log_path).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, keep.id);
    }

    #[test]
    fn test_delete_unknown_id_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("events.jsonl");

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&quit_event(Substance::Cigarettes, 0)).unwrap();

        let result = delete_event(&log_path, Uuid::new_v4());
        assert!(result.is_err());
    }

    #[test]
    fn test_quit_dates_latest_recorded_wins() {
        // second quit is earlier in time but recorded later: it still wins
        let first = quit_event(Substance::Cigarettes, 10);
        let second = quit_event(Substance::Cigarettes, 5);
        let events = vec![first, second.clone()];

        let dates = quit_dates(&events);
        assert_eq!(dates.get(&Substance::Cigarettes), Some(&second.occurred_at));
    }

    #[test]
    fn test_quit_dates_absent_for_untracked_substance() {
        let events = vec![quit_event(Substance::Cigarettes, 0)];
        let dates = quit_dates(&events);
        assert!(!dates.contains_key(&Substance::Alcohol));
    }

    #[test]
    fn test_relapse_and_log_events_do_not_set_quit_dates() {
        let mut relapse = Event::new(Substance::Alcohol, EventKind::Relapse, t0());
        relapse.amount = None;
        let log = Event::new(Substance::Alcohol, EventKind::Log, t0());

        let dates = quit_dates(&[relapse, log]);
        assert!(dates.is_empty());
    }
}
