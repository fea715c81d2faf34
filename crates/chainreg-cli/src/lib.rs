//! # chainreg-cli -- CLI Tool for the Chain Registry
//!
//! Provides the `chainreg` command-line interface used by registry CI to
//! check submitted entries before merge.
//!
//! ```bash
//! chainreg validate                  # full pipeline, registry at CWD
//! chainreg validate path/to/registry --json
//! chainreg validate --offline        # fields and identifier only
//! chainreg validate --skip-features  # no capability detection
//! ```
//!
//! Exit codes: 0 when every entry passed, 1 when any entry failed, 2 when the
//! registry could not be read or the tool was misconfigured.

pub mod validate;
