//! # Error Hierarchy
//!
//! Structured error type for the whole validation pipeline, built with
//! `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every variant carries the context a registry contributor needs to fix the
//! entry: the field path or URL involved, and where relevant the serialized
//! JSON that violated the rule.

use thiserror::Error;

/// A single reason why a chain entry (or a batch of entries) failed validation.
///
/// Stages fail fast: the first violated rule is reported and the remaining
/// stages for that entry are not run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The chain identifier does not follow the `name-version` grammar.
    #[error("unsupported format of chainId: \"{0}\" (expected <name>-<version>)")]
    MalformedIdentifier(String),

    /// A required field is absent, null, or empty.
    #[error("there is no {field}: {context}")]
    MissingField {
        /// Path of the missing field, e.g. `bech32Config.bech32PrefixAccAddr`.
        field: String,
        /// Serialized JSON of the object the field was expected in.
        context: String,
    },

    /// A field is present but has the wrong type or an unusable value.
    #[error("{field} must be {expected}: {context}")]
    InvalidFieldType {
        /// Path of the offending field.
        field: String,
        /// Description of the accepted shape.
        expected: &'static str,
        /// Serialized JSON of the object containing the field.
        context: String,
    },

    /// The name part of the chain identifier differs from the file name.
    #[error(
        "chain identifier and file name do not match: identifier \"{identifier}\", file name \"{file_name}\""
    )]
    IdentifierFileMismatch {
        /// Name component parsed from `chainId`.
        identifier: String,
        /// File name without its extension.
        file_name: String,
    },

    /// The HTTP call could not complete (connection failure, timeout, ...).
    #[error("endpoint unreachable: {url} ({reason})")]
    EndpointUnreachable {
        /// The full URL that was requested.
        url: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// The RPC node reports a different network than the entry declares.
    #[error("invalid rpc server: declared chainId \"{declared}\", rpc node network \"{reported}\"")]
    EndpointMismatch {
        /// The entry's declared `chainId`.
        declared: String,
        /// The network reported by `/status`, or `<absent>`.
        reported: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("endpoint check failed: {url} returned {status}")]
    EndpointError {
        /// The full URL that was requested.
        url: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// The live network exposes capabilities the entry does not declare.
    #[error("there are missing features, please add: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    /// The entry declares capabilities the live network does not expose.
    #[error("there are features not implemented by the network, please remove: {}", .0.join(", "))]
    UndeclaredFeatures(Vec<String>),

    /// Discovery found nothing to validate.
    #[error("there is no chain entry to validate")]
    NoEntriesFound,

    /// A registry file name breaks the `<name>.json` rule.
    #[error("the file name does not match the rules: \"{0}\" (expected <name>.json)")]
    InvalidFileName(String),

    /// A registry file is not parseable JSON.
    #[error("chain entry is not in json format: \"{file}\" ({reason})")]
    InvalidJson {
        /// The offending file name.
        file: String,
        /// Parser diagnostic.
        reason: String,
    },
}

impl ValidationError {
    /// Stable name of the error kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedIdentifier(_) => "MalformedIdentifier",
            Self::MissingField { .. } => "MissingField",
            Self::InvalidFieldType { .. } => "InvalidFieldType",
            Self::IdentifierFileMismatch { .. } => "IdentifierFileMismatch",
            Self::EndpointUnreachable { .. } => "EndpointUnreachable",
            Self::EndpointMismatch { .. } => "EndpointMismatch",
            Self::EndpointError { .. } => "EndpointError",
            Self::MissingFeatures(_) => "MissingFeatures",
            Self::UndeclaredFeatures(_) => "UndeclaredFeatures",
            Self::NoEntriesFound => "NoEntriesFound",
            Self::InvalidFileName(_) => "InvalidFileName",
            Self::InvalidJson { .. } => "InvalidJson",
        }
    }
}
