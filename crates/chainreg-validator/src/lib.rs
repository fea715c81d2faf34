#![deny(missing_docs)]

//! # chainreg-validator -- Chain Registry Validation Pipeline
//!
//! Takes registry entries from disk to a batch verdict.
//!
//! ## Stages
//!
//! - **Fields** (`fields.rs`): required fields present and well-typed; turns a
//!   [`RawEntry`](chainreg_core::RawEntry) into a
//!   [`ChainEntry`](chainreg_core::ChainEntry). No network access.
//!
//! - **Identity** (`identity.rs`): `chainId` parses as `name-version` and the
//!   name equals the file name.
//!
//! - **Endpoints** (`endpoints.rs`): RPC `/status` reports the declared chain,
//!   REST `/staking/parameters` answers.
//!
//! - **Features** (`features.rs`): a fixed battery of REST probes infers the
//!   chain's capabilities, which must equal the declared `features`.
//!
//! The orchestrator (`pipeline.rs`) runs the stages in that order, stops an
//! entry at its first failure, and reports each transition to an
//! [`EventSink`]. `discovery.rs` loads entries from a registry checkout.
//!
//! All network access goes through the [`Prober`](chainreg_probe::Prober)
//! trait, so every stage can be tested against canned responses.

pub mod discovery;
pub mod endpoints;
pub mod events;
pub mod features;
pub mod fields;
pub mod identity;
pub mod pipeline;

#[cfg(test)]
mod test_support;

pub use discovery::{discover_entries, DiscoveryError};
pub use events::{EventSink, RecordingEventSink, Stage, StageEvent, TracingEventSink};
pub use features::{DetectedFeatures, FeatureProbeSpec, FEATURE_PROBES};
pub use pipeline::{
    BatchPolicy, BatchReport, EntryReport, ValidationOutcome, Validator, ValidatorOptions,
};
