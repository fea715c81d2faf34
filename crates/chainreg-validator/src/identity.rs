//! Chain identifier cross-check.
//!
//! A registry file must be named after its chain: `cosmoshub-4` lives in
//! `cosmoshub.json`. The version is free to change without a rename.

use chainreg_core::{ChainEntry, ChainIdentifier, ValidationError};

/// Parse the entry's `chainId` and require its name to equal the file stem.
///
/// # Errors
///
/// [`ValidationError::MalformedIdentifier`] if `chainId` does not parse,
/// [`ValidationError::IdentifierFileMismatch`] if the names differ.
pub fn check_identifier(entry: &ChainEntry) -> Result<ChainIdentifier, ValidationError> {
    let identifier = ChainIdentifier::parse(&entry.chain_id)?;
    let file_name = entry.file_stem();

    if identifier.name() != file_name {
        return Err(ValidationError::IdentifierFileMismatch {
            identifier: identifier.name().to_string(),
            file_name: file_name.to_string(),
        });
    }

    tracing::debug!(chain_id = %identifier, "chain identifier matches file name");
    Ok(identifier)
}
