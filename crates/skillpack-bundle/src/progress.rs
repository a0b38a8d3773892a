//! Progress events emitted while packaging.
//!
//! The packager reports what it is doing through a [`ProgressEmitter`]
//! so the caller decides how (and whether) to show it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;

/// Standard progress event names.
pub mod event_names {
    pub const VALIDATING: &str = "validating";
    pub const VALIDATED: &str = "validated";
    pub const ENTRY_ADDED: &str = "entry_added";
    pub const COMPLETED: &str = "completed";
    pub const FAILED: &str = "failed";
    pub const PARTIAL_REMOVED: &str = "partial_removed";
}

/// A single step of a packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PackageEvent {
    /// Validation of the manifest is about to run.
    Validating { skill_dir: PathBuf },
    /// Validation passed.
    Validated { name: String, message: String },
    /// An entry was written (or would be, in a dry run).
    EntryAdded { entry: String, bytes: u64 },
    /// The archive was finalized.
    Completed {
        archive: PathBuf,
        entries: usize,
        archive_size: u64,
    },
    /// Packaging stopped with an error.
    Failed { message: String },
    /// A partially written archive was deleted after a failure.
    PartialRemoved { archive: PathBuf },
}

impl PackageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PackageEvent::Validating { .. } => event_names::VALIDATING,
            PackageEvent::Validated { .. } => event_names::VALIDATED,
            PackageEvent::EntryAdded { .. } => event_names::ENTRY_ADDED,
            PackageEvent::Completed { .. } => event_names::COMPLETED,
            PackageEvent::Failed { .. } => event_names::FAILED,
            PackageEvent::PartialRemoved { .. } => event_names::PARTIAL_REMOVED,
        }
    }

    /// Serialize as one JSON line with a timestamp.
    pub fn to_jsonl(&self) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            timestamp: DateTime<Utc>,
            #[serde(flatten)]
            event: &'a PackageEvent,
        }

        serde_json::to_string(&Line {
            timestamp: Utc::now(),
            event: self,
        })
        .unwrap_or_else(|_| {
            format!(
                r#"{{"error":"serialization_failed","event":"{}"}}"#,
                self.name()
            )
        })
    }
}

/// Sink for progress events.
pub trait ProgressEmitter {
    fn emit(&self, event: &PackageEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

impl ProgressEmitter for NullEmitter {
    fn emit(&self, _event: &PackageEvent) {}
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<PackageEvent>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PackageEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Entry names from every `EntryAdded` event.
    pub fn entries(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PackageEvent::EntryAdded { entry, .. } => Some(entry),
                _ => None,
            })
            .collect()
    }
}

impl ProgressEmitter for RecordingEmitter {
    fn emit(&self, event: &PackageEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
