//! # Stage Events
//!
//! The orchestrator reports progress through an injected [`EventSink`]
//! instead of writing to the console. Every stage transition of every entry
//! produces exactly one [`StageEvent`].
//!
//! - [`TracingEventSink`] (default) turns events into structured `tracing`
//!   records.
//! - [`RecordingEventSink`] keeps them in memory so tests can inspect the
//!   transition log.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stage of the per-entry validation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// The raw entry has been handed to the pipeline.
    Loaded,
    /// All required fields are present and well-typed.
    FieldsChecked,
    /// `chainId` parses and matches the file name.
    IdentifierChecked,
    /// RPC and REST endpoints are live and serve the declared chain.
    EndpointsChecked,
    /// Declared features equal detected capabilities.
    FeaturesChecked,
    /// Every stage passed (terminal).
    Passed,
    /// A stage failed (terminal).
    Failed,
}

impl Stage {
    /// Whether this stage is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Loaded => "LOADED",
            Self::FieldsChecked => "FIELDS_CHECKED",
            Self::IdentifierChecked => "IDENTIFIER_CHECKED",
            Self::EndpointsChecked => "ENDPOINTS_CHECKED",
            Self::FeaturesChecked => "FEATURES_CHECKED",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// One stage transition of one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageEvent {
    /// Entry key (file name without extension).
    pub entry: String,
    /// State before the transition.
    pub from: Stage,
    /// State after the transition.
    pub to: Stage,
    /// When the transition occurred (UTC).
    pub timestamp: DateTime<Utc>,
    /// The stage was passed over without running (offline or skip-features).
    pub skipped: bool,
    /// Failure message for transitions into [`Stage::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Receiver of stage transition events.
pub trait EventSink {
    /// Record one transition.
    fn record(&self, event: StageEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: StageEvent) {
        (**self).record(event)
    }
}

/// Emits each event as a `tracing` record: failures at `warn`, everything
/// else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: StageEvent) {
        match (&event.to, &event.reason) {
            (Stage::Failed, reason) => tracing::warn!(
                entry = %event.entry,
                from = %event.from,
                reason = reason.as_deref().unwrap_or(""),
                "validation failed"
            ),
            (Stage::Passed, _) => {
                tracing::info!(entry = %event.entry, "all verification stages passed")
            }
            (to, _) => tracing::info!(
                entry = %event.entry,
                from = %event.from,
                to = %to,
                skipped = event.skipped,
                "stage transition"
            ),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<StageEvent>>,
}

impl RecordingEventSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<StageEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events for one entry, in order.
    pub fn events_for(&self, entry: &str) -> Vec<StageEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.entry == entry)
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn record(&self, event: StageEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(entry: &str, from: Stage, to: Stage) -> StageEvent {
        StageEvent {
            entry: entry.to_string(),
            from,
            to,
            timestamp: Utc::now(),
            skipped: false,
            reason: None,
        }
    }

    #[test]
    fn terminal_stages() {
        assert!(Stage::Passed.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::Loaded.is_terminal());
        assert!(!Stage::FeaturesChecked.is_terminal());
    }

    #[test]
    fn stage_display_matches_serde() {
        let json = serde_json::to_value(Stage::IdentifierChecked).unwrap();
        assert_eq!(json, "IDENTIFIER_CHECKED");
        assert_eq!(Stage::IdentifierChecked.to_string(), "IDENTIFIER_CHECKED");
    }

    #[test]
    fn recorder_keeps_order_and_filters_by_entry() {
        let sink = RecordingEventSink::new();
        sink.record(event("a", Stage::Loaded, Stage::FieldsChecked));
        sink.record(event("b", Stage::Loaded, Stage::Failed));
        sink.record(event("a", Stage::FieldsChecked, Stage::IdentifierChecked));

        assert_eq!(sink.events().len(), 3);
        let a = sink.events_for("a");
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].to, Stage::IdentifierChecked);
    }

    #[test]
    fn borrowed_sink_forwards() {
        let sink = RecordingEventSink::new();
        let borrowed = &sink;
        borrowed.record(event("a", Stage::Loaded, Stage::FieldsChecked));
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn failed_event_serializes_reason() {
        let mut e = event("a", Stage::FieldsChecked, Stage::Failed);
        e.reason = Some("boom".to_string());
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["reason"], "boom");
        assert_eq!(json["to"], "FAILED");

        let ok = serde_json::to_value(event("a", Stage::Loaded, Stage::FieldsChecked)).unwrap();
        assert!(ok.get("reason").is_none());
    }
}
