//! # Validate Subcommand
//!
//! Discovers registry entries under a registry checkout and runs them through
//! the validation pipeline.
//!
//! Output goes to stdout: one `OK`/`FAIL` line per entry and a summary, or the
//! `{isValid, error?}` outcome as JSON with `--json`. Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use chainreg_core::{RawEntry, ValidationError};
use chainreg_probe::{HttpProber, ProbeConfig};
use chainreg_validator::{
    discover_entries, BatchPolicy, BatchReport, DiscoveryError, Validator, ValidatorOptions,
};

/// Arguments for the `chainreg validate` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Registry checkout to validate.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Check fields and identifiers only; make no network calls.
    #[arg(long)]
    pub offline: bool,

    /// Verify endpoints but skip capability detection.
    #[arg(long)]
    pub skip_features: bool,

    /// Stop at the first failed entry.
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-request timeout in seconds (overrides CHAINREG_TIMEOUT_SECS).
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    /// Orchestrator options selected by the flags.
    pub fn options(&self) -> ValidatorOptions {
        ValidatorOptions {
            probe_endpoints: !self.offline,
            detect_features: !self.offline && !self.skip_features,
            batch_policy: if self.fail_fast {
                BatchPolicy::StopOnFirstFailure
            } else {
                BatchPolicy::ContinueOnFailure
            },
        }
    }

    /// Probe configuration: environment first, then the `--timeout-secs` flag.
    pub fn probe_config(&self) -> Result<ProbeConfig> {
        let config = ProbeConfig::from_env().context("invalid probe configuration")?;
        match self.timeout_secs {
            Some(secs) => config
                .with_timeout_secs(secs)
                .context("invalid --timeout-secs"),
            None => Ok(config),
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure. Operational
/// errors (unreadable registry, bad configuration) are returned as `Err`.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let config = args.probe_config()?;

    let entries = match load_entries(&args.root)? {
        Ok(entries) => entries,
        Err(error) => {
            print!("{}", render(&BatchReport::from_error(error), args.json));
            return Ok(1);
        }
    };

    let prober = HttpProber::new(config).context("failed to initialize HTTP prober")?;
    let validator = Validator::new(prober, args.options());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = runtime.block_on(validator.validate_batch(&entries));

    print!("{}", render(&report, args.json));
    Ok(if report.is_valid() { 0 } else { 1 })
}

/// Load entries, separating registry content errors (a validation verdict)
/// from I/O errors (an operational failure).
fn load_entries(root: &Path) -> Result<Result<Vec<RawEntry>, ValidationError>> {
    match discover_entries(root) {
        Ok(entries) => Ok(Ok(entries)),
        Err(DiscoveryError::Validation(error)) => Ok(Err(error)),
        Err(e @ DiscoveryError::Io { .. }) => {
            Err(e).with_context(|| format!("failed to load registry at {}", root.display()))
        }
    }
}

/// Render a batch report for the terminal.
pub fn render(report: &BatchReport, json: bool) -> String {
    let outcome = report.outcome();
    if json {
        let text = serde_json::to_string_pretty(&outcome)
            .unwrap_or_else(|_| format!("{{\"isValid\": {}}}", outcome.is_valid));
        return format!("{text}\n");
    }

    let mut out = String::new();
    if let Some(error) = &report.error {
        out.push_str(&format!("FAIL: {error}\n"));
        return out;
    }

    for entry in &report.entries {
        match &entry.result {
            Ok(()) => out.push_str(&format!("  OK: {}\n", entry.file_name)),
            Err(e) => out.push_str(&format!(
                "  FAIL: {} ({}) {e}\n",
                entry.file_name, entry.reached
            )),
        }
    }
    out.push_str(&format!("Chains: {}/{} passed\n", report.passed(), report.total));
    if report.not_evaluated() > 0 {
        out.push_str(&format!(
            "{} chain(s) not evaluated after the first failure.\n",
            report.not_evaluated()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainreg_validator::{EntryReport, Stage};

    const ENTRY: &str = r#"{
        "chainId": "cosmoshub-4",
        "chainName": "Cosmos Hub",
        "stakeCurrency": {"coinDenom": "ATOM", "coinMinimalDenom": "uatom", "coinDecimals": 6},
        "bip44": {"coinType": 118},
        "bech32Config": {
            "bech32PrefixAccAddr": "cosmos",
            "bech32PrefixAccPub": "cosmospub",
            "bech32PrefixValAddr": "cosmosvaloper",
            "bech32PrefixValPub": "cosmosvaloperpub",
            "bech32PrefixConsAddr": "cosmosvalcons",
            "bech32PrefixConsPub": "cosmosvalconspub"
        },
        "currencies": [{"coinDenom": "ATOM", "coinMinimalDenom": "uatom", "coinDecimals": 6}],
        "feeCurrencies": [{"coinDenom": "ATOM", "coinMinimalDenom": "uatom", "coinDecimals": 6}],
        "rpc": "http://127.0.0.1:1",
        "rest": "http://127.0.0.1:1"
    }"#;

    fn registry(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            let path = dir.path().join("cosmos").join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }
        dir
    }

    fn args(root: &Path) -> ValidateArgs {
        ValidateArgs {
            root: root.to_path_buf(),
            offline: true,
            timeout_secs: Some(1),
            ..ValidateArgs::default()
        }
    }

    #[test]
    fn flags_map_to_options() {
        let defaults = ValidateArgs::default().options();
        assert_eq!(defaults, ValidatorOptions::default());

        let offline = ValidateArgs {
            offline: true,
            ..ValidateArgs::default()
        }
        .options();
        assert_eq!(offline, ValidatorOptions::offline());

        let skip = ValidateArgs {
            skip_features: true,
            fail_fast: true,
            ..ValidateArgs::default()
        }
        .options();
        assert!(skip.probe_endpoints);
        assert!(!skip.detect_features);
        assert_eq!(skip.batch_policy, BatchPolicy::StopOnFirstFailure);
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let args = ValidateArgs {
            timeout_secs: Some(0),
            ..ValidateArgs::default()
        };
        assert!(args.probe_config().is_err());
    }

    #[test]
    fn offline_run_on_valid_registry_exits_zero() {
        let dir = registry(&[("cosmoshub.json", ENTRY)]);
        assert_eq!(run_validate(&args(dir.path())).unwrap(), 0);
    }

    #[test]
    fn mismatched_file_name_exits_one() {
        let dir = registry(&[("osmosis.json", ENTRY)]);
        assert_eq!(run_validate(&args(dir.path())).unwrap(), 1);
    }

    #[test]
    fn bad_file_name_exits_one() {
        let dir = registry(&[("cosmoshub.json", ENTRY), ("notes.txt", "hello")]);
        assert_eq!(run_validate(&args(dir.path())).unwrap(), 1);
    }

    #[test]
    fn unreadable_root_is_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_validate(&args(&dir.path().join("absent")));
        assert!(result.is_err());
    }

    #[test]
    fn unreachable_endpoints_fail_online_run() {
        let dir = registry(&[("cosmoshub.json", ENTRY)]);
        let args = ValidateArgs {
            offline: false,
            ..args(dir.path())
        };
        assert_eq!(run_validate(&args).unwrap(), 1);
    }

    #[test]
    fn render_text_summary() {
        let report = BatchReport {
            total: 2,
            entries: vec![
                EntryReport {
                    key: "cosmoshub".to_string(),
                    file_name: "cosmoshub.json".to_string(),
                    reached: Stage::FeaturesChecked,
                    result: Ok(()),
                    detected_features: Some(vec![]),
                },
                EntryReport {
                    key: "osmosis".to_string(),
                    file_name: "osmosis.json".to_string(),
                    reached: Stage::FieldsChecked,
                    result: Err(ValidationError::MalformedIdentifier("osmosis".to_string())),
                    detected_features: None,
                },
            ],
            error: None,
        };

        let text = render(&report, false);
        assert!(text.contains("  OK: cosmoshub.json"));
        assert!(text.contains("  FAIL: osmosis.json (FIELDS_CHECKED)"));
        assert!(text.contains("Chains: 1/2 passed"));
    }

    #[test]
    fn render_json_outcome() {
        let report = BatchReport::from_error(ValidationError::NoEntriesFound);
        let value: serde_json::Value = serde_json::from_str(&render(&report, true)).unwrap();
        assert_eq!(value["isValid"], false);
        assert_eq!(value["error"], "there is no chain entry to validate");
    }

    #[test]
    fn render_reports_entries_not_evaluated() {
        let entry = RawEntry::new("cosmoshub.json", serde_json::json!({}));
        let report = BatchReport {
            total: 3,
            entries: vec![EntryReport {
                key: entry.key().to_string(),
                file_name: entry.file_name.clone(),
                reached: Stage::Loaded,
                result: Err(ValidationError::NoEntriesFound),
                detected_features: None,
            }],
            error: None,
        };
        assert!(render(&report, false).contains("2 chain(s) not evaluated"));
    }
}
