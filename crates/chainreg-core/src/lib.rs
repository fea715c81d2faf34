#![deny(missing_docs)]

//! # chainreg-core -- Foundational Types for the Chain Registry Validator
//!
//! This crate defines the types every other crate in the workspace depends on.
//! It has no internal crate dependencies: only `serde`, `serde_json` and
//! `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Parse, don't re-check.** A registry file arrives as a [`RawEntry`]
//!    (file name plus untyped JSON). The field validator turns it into a
//!    [`ChainEntry`] exactly once; every later stage works on the typed value.
//!
//! 2. **[`ChainIdentifier`] is the sole path to a chain's name/version.** The
//!    `name-version` grammar lives in one place and is shared by the file-name
//!    cross-check and the RPC identity check.
//!
//! 3. **[`ValidationError`] is the single error vocabulary.** Every pipeline
//!    stage fails with one of its variants; the message embeds the offending
//!    JSON so a registry contributor can fix the entry without guesswork.

pub mod entry;
pub mod error;
pub mod identifier;

// Re-export primary types at crate root for ergonomic imports.
pub use entry::{Bech32Config, Bip44, ChainEntry, CurrencyDescriptor, RawEntry};
pub use error::ValidationError;
pub use identifier::ChainIdentifier;
