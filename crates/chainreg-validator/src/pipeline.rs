//! # Validation Orchestrator
//!
//! Runs each entry through the stage sequence
//!
//! ```text
//! LOADED → FIELDS_CHECKED → IDENTIFIER_CHECKED → ENDPOINTS_CHECKED → FEATURES_CHECKED → PASSED
//!    └──────────────┴─────────────────┴───────────────────┴──────────────────┴──→ FAILED
//! ```
//!
//! The first failing stage moves the entry to `FAILED` and the remaining
//! stages are not run. Entries are validated one at a time and share no
//! state, so a batch result depends only on the entries and the network
//! responses.

use serde::{Deserialize, Serialize};

use chainreg_core::{RawEntry, ValidationError};
use chainreg_probe::Prober;

use crate::events::{EventSink, Stage, StageEvent, TracingEventSink};
use crate::features::DetectedFeatures;
use crate::{endpoints, features, fields, identity};

/// What to do with the rest of a batch once an entry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Validate every entry; the batch fails if any entry failed.
    #[default]
    ContinueOnFailure,
    /// Stop at the first failed entry.
    StopOnFirstFailure,
}

/// Which stages run, and how a batch reacts to failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Probe RPC/REST endpoints. When off, no network call is made at all.
    pub probe_endpoints: bool,
    /// Run capability detection (requires `probe_endpoints`).
    pub detect_features: bool,
    /// Batch failure handling.
    pub batch_policy: BatchPolicy,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            probe_endpoints: true,
            detect_features: true,
            batch_policy: BatchPolicy::default(),
        }
    }
}

impl ValidatorOptions {
    /// Field and identifier checks only.
    pub fn offline() -> Self {
        Self {
            probe_endpoints: false,
            detect_features: false,
            ..Self::default()
        }
    }
}

/// Result of validating one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryReport {
    /// Entry key (file name without extension).
    pub key: String,
    /// Source file name.
    pub file_name: String,
    /// Last stage completed before the terminal state.
    pub reached: Stage,
    /// `Ok` if every stage passed, otherwise the first failure.
    pub result: Result<(), ValidationError>,
    /// Capabilities seen by the detector, when detection ran.
    pub detected_features: Option<Vec<String>>,
}

impl EntryReport {
    /// Whether the entry passed every stage.
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }

    /// Terminal state: [`Stage::Passed`] or [`Stage::Failed`].
    pub fn state(&self) -> Stage {
        if self.passed() {
            Stage::Passed
        } else {
            Stage::Failed
        }
    }
}

/// Batch-level result returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// True only if every entry passed every stage.
    pub is_valid: bool,
    /// Message of the first failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-entry reports for a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Number of entries supplied.
    pub total: usize,
    /// Reports for the entries that were evaluated, in input order.
    pub entries: Vec<EntryReport>,
    /// Failure that prevented validating the batch at all.
    pub error: Option<ValidationError>,
}

impl BatchReport {
    /// A batch that could not be validated.
    pub fn from_error(error: ValidationError) -> Self {
        Self {
            total: 0,
            entries: Vec::new(),
            error: Some(error),
        }
    }

    /// True only if there was no batch error and every entry passed.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.entries.iter().all(EntryReport::passed)
    }

    /// Number of entries that passed.
    pub fn passed(&self) -> usize {
        self.entries.iter().filter(|r| r.passed()).count()
    }

    /// Entries that failed, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|r| !r.passed())
    }

    /// Entries never evaluated because the batch stopped early.
    pub fn not_evaluated(&self) -> usize {
        self.total.saturating_sub(self.entries.len())
    }

    /// Human-readable message of the first failure.
    pub fn first_error_message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.to_string());
        }
        self.failures().find_map(|report| {
            report
                .result
                .as_ref()
                .err()
                .map(|e| format!("{}: {e}", report.key))
        })
    }

    /// The `{isValid, error?}` result object.
    pub fn outcome(&self) -> ValidationOutcome {
        ValidationOutcome {
            is_valid: self.is_valid(),
            error: self.first_error_message(),
        }
    }
}

/// Tracks one entry's position in the state machine and reports transitions.
struct EntryRun<'a, E: EventSink> {
    events: &'a E,
    entry: String,
    current: Stage,
}

impl<'a, E: EventSink> EntryRun<'a, E> {
    fn new(events: &'a E, entry: &str) -> Self {
        Self {
            events,
            entry: entry.to_string(),
            current: Stage::Loaded,
        }
    }

    fn transition(&mut self, to: Stage, skipped: bool, reason: Option<String>) {
        self.events.record(StageEvent {
            entry: self.entry.clone(),
            from: self.current,
            to,
            timestamp: chrono::Utc::now(),
            skipped,
            reason,
        });
        if to != Stage::Failed {
            self.current = to;
        }
    }

    fn advance(&mut self, to: Stage) {
        self.transition(to, false, None);
    }

    fn skip(&mut self, to: Stage) {
        self.transition(to, true, None);
    }

    fn fail(&mut self, error: &ValidationError) {
        tracing::debug!(entry = %self.entry, kind = error.kind(), "stage failed");
        self.transition(Stage::Failed, false, Some(error.to_string()));
    }
}

/// The validation pipeline.
#[derive(Debug)]
pub struct Validator<P, E = TracingEventSink> {
    prober: P,
    events: E,
    options: ValidatorOptions,
}

impl<P: Prober> Validator<P, TracingEventSink> {
    /// A validator that logs stage events through `tracing`.
    pub fn new(prober: P, options: ValidatorOptions) -> Self {
        Self::with_events(prober, TracingEventSink, options)
    }
}

impl<P: Prober, E: EventSink> Validator<P, E> {
    /// A validator reporting stage events to `events`.
    pub fn with_events(prober: P, events: E, options: ValidatorOptions) -> Self {
        Self {
            prober,
            events,
            options,
        }
    }

    /// The active options.
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate a single entry through every enabled stage.
    pub async fn validate_entry(&self, raw: &RawEntry) -> EntryReport {
        let mut run = EntryRun::new(&self.events, raw.key());
        let mut detected = None;

        let result = self.run_stages(raw, &mut run, &mut detected).await;
        let reached = run.current;
        match &result {
            Ok(()) => run.advance(Stage::Passed),
            Err(error) => run.fail(error),
        }

        EntryReport {
            key: raw.key().to_string(),
            file_name: raw.file_name.clone(),
            reached,
            result,
            detected_features: detected.map(DetectedFeatures::into_vec),
        }
    }

    async fn run_stages(
        &self,
        raw: &RawEntry,
        run: &mut EntryRun<'_, E>,
        detected: &mut Option<DetectedFeatures>,
    ) -> Result<(), ValidationError> {
        let entry = fields::validate_fields(raw)?;
        run.advance(Stage::FieldsChecked);

        identity::check_identifier(&entry)?;
        run.advance(Stage::IdentifierChecked);

        if !self.options.probe_endpoints {
            run.skip(Stage::EndpointsChecked);
            run.skip(Stage::FeaturesChecked);
            return Ok(());
        }

        endpoints::verify_endpoints(&self.prober, &entry).await?;
        run.advance(Stage::EndpointsChecked);

        if !self.options.detect_features {
            run.skip(Stage::FeaturesChecked);
            return Ok(());
        }

        let found = features::detect_features(&self.prober, &entry.rest).await?;
        let reconciled = features::reconcile(&found, entry.features.as_deref());
        *detected = Some(found);
        reconciled?;
        run.advance(Stage::FeaturesChecked);

        Ok(())
    }

    /// Validate a batch of entries in order.
    ///
    /// An empty batch fails with [`ValidationError::NoEntriesFound`]. With
    /// [`BatchPolicy::StopOnFirstFailure`] the entries after the first failure
    /// are not evaluated.
    pub async fn validate_batch(&self, entries: &[RawEntry]) -> BatchReport {
        if entries.is_empty() {
            tracing::warn!("no chain entries to validate");
            return BatchReport::from_error(ValidationError::NoEntriesFound);
        }

        tracing::info!(count = entries.len(), "chain entries loaded");

        let mut reports = Vec::with_capacity(entries.len());
        for raw in entries {
            tracing::info!(entry = raw.key(), file = %raw.file_name, "start verification");
            let report = self.validate_entry(raw).await;
            let stop = !report.passed()
                && self.options.batch_policy == BatchPolicy::StopOnFirstFailure;
            reports.push(report);
            if stop {
                tracing::info!(
                    remaining = entries.len() - reports.len(),
                    "stopping batch at first failure"
                );
                break;
            }
        }

        let report = BatchReport {
            total: entries.len(),
            entries: reports,
            error: None,
        };
        tracing::info!(
            passed = report.passed(),
            total = report.total,
            "batch validation finished"
        );
        report
    }
}
