//! Structured audit events: one per insertion, removal, merge, substitution or downgrade.
//!
//! Sinks are observational only: a failing sink logs a warning and never changes
//! planner control flow.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

pub const STAGE_OUTLINE: &str = "outline";
pub const STAGE_LAYOUT: &str = "layout";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerEvent {
    pub ts: DateTime<Utc>,
    pub session_id: String,
    pub stage: String,
    pub kind: String,
    pub payload: Value,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PlannerEvent);
}

// ────────────────────────────────────────────────────────────────────────────
// Sinks
// ────────────────────────────────────────────────────────────────────────────

pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &PlannerEvent) {}
}

/// Default sink: forwards every event to `tracing`.
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &PlannerEvent) {
        info!(
            session_id = %event.session_id,
            stage = %event.stage,
            kind = %event.kind,
            payload = %event.payload,
            "planner event"
        );
    }
}

/// Captures events in memory, in emission order.
#[derive(Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<PlannerEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlannerEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.kind).collect()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &PlannerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Appends events to `{dir}/logs/{session_id}.jsonl`, one JSON object per line.
pub struct JsonlEventSink {
    log_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlEventSink {
    pub fn new(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let log_dir = data_dir.as_ref().join("logs");
        fs::create_dir_all(&log_dir)?;
        Ok(Self {
            log_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn log_path(&self, session_id: &str) -> PathBuf {
        self.log_dir
            .join(format!("{}.jsonl", sanitize_session_id(session_id)))
    }

    fn append(&self, event: &PlannerEvent) -> anyhow::Result<()> {
        let line = serde_json::to_string(event)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("event log lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(&event.session_id))?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl EventSink for JsonlEventSink {
    fn emit(&self, event: &PlannerEvent) {
        if let Err(e) = self.append(event) {
            warn!(kind = %event.kind, "Failed to write planner event: {e}");
        }
    }
}

/// Session ids become file names; anything outside `[A-Za-z0-9_-]` is rejected.
fn sanitize_session_id(session_id: &str) -> &str {
    let valid = !session_id.is_empty()
        && session_id.len() <= 128
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        session_id
    } else {
        "invalid_session"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Emitter handle
// ────────────────────────────────────────────────────────────────────────────

/// A sink bound to one planning session.
#[derive(Clone)]
pub struct EventEmitter {
    sink: Arc<dyn EventSink>,
    session_id: String,
}

impl EventEmitter {
    pub fn new(sink: Arc<dyn EventSink>, session_id: impl Into<String>) -> Self {
        Self {
            sink,
            session_id: session_id.into(),
        }
    }

    pub fn noop() -> Self {
        Self::new(Arc::new(NoopEventSink), "none")
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn with_session(&self, session_id: impl Into<String>) -> Self {
        Self::new(Arc::clone(&self.sink), session_id)
    }

    pub fn emit(&self, stage: &str, kind: &str, payload: Value) {
        let event = PlannerEvent {
            ts: Utc::now(),
            session_id: self.session_id.clone(),
            stage: stage.to_string(),
            kind: kind.to_string(),
            payload,
        };
        self.sink.emit(&event);
    }
}
