//! # Chain Identifier
//!
//! A registry chain identifier has the form `<name>-<version>`, e.g.
//! `cosmoshub-4` or `axelar-dojo-1`. The version is the run of ASCII digits
//! after the final `-`; everything before it is the name.
//!
//! ## Validation
//!
//! - The final `-` separator must be present
//! - Version must be non-empty ASCII digits that fit in a `u64`
//! - Name must be non-empty, start and end with an ASCII alphanumeric, and
//!   contain only ASCII alphanumerics, `-` and `_`
//!
//! Parsing is pure: no I/O, same input always yields the same result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A parsed chain identifier: name plus numeric version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainIdentifier {
    name: String,
    version: u64,
}

impl ChainIdentifier {
    /// Parse a chain identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedIdentifier`] if the string does not
    /// match the `name-version` grammar.
    pub fn parse(chain_id: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedIdentifier(chain_id.to_string());

        let (name, version) = chain_id.rsplit_once('-').ok_or_else(malformed)?;

        if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let version: u64 = version.parse().map_err(|_| malformed())?;

        if !is_valid_name(name) {
            return Err(malformed());
        }

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }

    /// The name component (`cosmoshub` for `cosmoshub-4`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version component (`4` for `cosmoshub-4`).
    pub fn version(&self) -> u64 {
        self.version
    }
}

fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
        }
        _ => false,
    }
}

impl FromStr for ChainIdentifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChainIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}
