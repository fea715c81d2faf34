//! # Capability Detection
//!
//! Infers which optional protocol extensions a chain supports by probing its
//! REST endpoint, then reconciles the result with the entry's declared
//! `features` list. Declared and detected must match exactly: a capability
//! the network exposes but the entry omits is as wrong as one the entry
//! claims but the network lacks.
//!
//! ## Probe table
//!
//! [`FEATURE_PROBES`] is an ordered, constant table. Each row computes its path
//! from the features detected so far, which is how later probes depend on
//! earlier ones:
//!
//! | Feature(s) | Path | Present when |
//! |------------|------|--------------|
//! | `ibc-go` | `/ibc/apps/transfer/v1/params` | 200 |
//! | `ibc-transfer` | ibc-go path if `ibc-go`, else `/ibc/applications/transfer/v1beta1/params` | 200 |
//! | `cosmwasm`, `wasmd_0.24+` | `/cosmwasm/wasm/v1/contract/test/smart/test` | 400 |
//! | `cosmwasm` | `/wasm/v1/contract/test/smart/test` (skipped after `wasmd_0.24+`) | 400 |
//! | `osmosis-txfees` | `/osmosis/txfees/v1beta1/base_denom` | 200 |
//! | `axelar-evm-bridge` | `/axelar/evm/v1beta1/token_info/test` | 400 |
//!
//! A 400 means the route exists and rejected the deliberately bogus `test`
//! argument; an unregistered route answers 404/501 instead.

use chainreg_core::ValidationError;
use chainreg_probe::Prober;

use crate::endpoints::endpoint_url;

/// IBC transfer served by the ibc-go module.
pub const IBC_GO: &str = "ibc-go";
/// IBC fungible token transfer.
pub const IBC_TRANSFER: &str = "ibc-transfer";
/// CosmWasm smart contracts.
pub const COSMWASM: &str = "cosmwasm";
/// CosmWasm served by wasmd 0.24 or later.
pub const WASMD_0_24: &str = "wasmd_0.24+";
/// Osmosis fee-token module.
pub const OSMOSIS_TXFEES: &str = "osmosis-txfees";
/// Axelar EVM bridge module.
pub const AXELAR_EVM_BRIDGE: &str = "axelar-evm-bridge";

const IBC_GO_TRANSFER_PARAMS: &str = "/ibc/apps/transfer/v1/params";
const LEGACY_IBC_TRANSFER_PARAMS: &str = "/ibc/applications/transfer/v1beta1/params";

/// One row of the probe battery.
#[derive(Clone, Copy)]
pub struct FeatureProbeSpec {
    /// Name used in logs; usually the first granted feature.
    pub name: &'static str,
    /// Path to request given the features detected so far, or `None` to skip.
    pub path: fn(&DetectedFeatures) -> Option<&'static str>,
    /// Status code that signals the feature is present.
    pub expected_status: u16,
    /// Features recorded when the probe sees `expected_status`.
    pub grants: &'static [&'static str],
}

impl std::fmt::Debug for FeatureProbeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureProbeSpec")
            .field("name", &self.name)
            .field("expected_status", &self.expected_status)
            .field("grants", &self.grants)
            .finish()
    }
}

/// The probe battery, in execution order.
pub const FEATURE_PROBES: &[FeatureProbeSpec] = &[
    FeatureProbeSpec {
        name: IBC_GO,
        path: ibc_go_path,
        expected_status: 200,
        grants: &[IBC_GO],
    },
    FeatureProbeSpec {
        name: IBC_TRANSFER,
        path: ibc_transfer_path,
        expected_status: 200,
        grants: &[IBC_TRANSFER],
    },
    FeatureProbeSpec {
        name: WASMD_0_24,
        path: wasmd_path,
        expected_status: 400,
        grants: &[COSMWASM, WASMD_0_24],
    },
    FeatureProbeSpec {
        name: COSMWASM,
        path: legacy_cosmwasm_path,
        expected_status: 400,
        grants: &[COSMWASM],
    },
    FeatureProbeSpec {
        name: OSMOSIS_TXFEES,
        path: osmosis_txfees_path,
        expected_status: 200,
        grants: &[OSMOSIS_TXFEES],
    },
    FeatureProbeSpec {
        name: AXELAR_EVM_BRIDGE,
        path: axelar_evm_bridge_path,
        expected_status: 400,
        grants: &[AXELAR_EVM_BRIDGE],
    },
];

fn ibc_go_path(_: &DetectedFeatures) -> Option<&'static str> {
    Some(IBC_GO_TRANSFER_PARAMS)
}

fn ibc_transfer_path(detected: &DetectedFeatures) -> Option<&'static str> {
    if detected.contains(IBC_GO) {
        Some(IBC_GO_TRANSFER_PARAMS)
    } else {
        Some(LEGACY_IBC_TRANSFER_PARAMS)
    }
}

fn wasmd_path(_: &DetectedFeatures) -> Option<&'static str> {
    Some("/cosmwasm/wasm/v1/contract/test/smart/test")
}

fn legacy_cosmwasm_path(detected: &DetectedFeatures) -> Option<&'static str> {
    if detected.contains(WASMD_0_24) {
        None
    } else {
        Some("/wasm/v1/contract/test/smart/test")
    }
}

fn osmosis_txfees_path(_: &DetectedFeatures) -> Option<&'static str> {
    Some("/osmosis/txfees/v1beta1/base_denom")
}

fn axelar_evm_bridge_path(_: &DetectedFeatures) -> Option<&'static str> {
    Some("/axelar/evm/v1beta1/token_info/test")
}

/// Features confirmed by probes, in detection order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedFeatures(Vec<String>);

impl DetectedFeatures {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `feature` has been detected.
    pub fn contains(&self, feature: &str) -> bool {
        self.0.iter().any(|f| f == feature)
    }

    /// Record `feature`; a repeat is ignored.
    pub fn insert(&mut self, feature: &str) {
        if !self.contains(feature) {
            self.0.push(feature.to_string());
        }
    }

    /// Detected feature names in detection order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying list.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> FromIterator<&'a str> for DetectedFeatures {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut detected = Self::new();
        for feature in iter {
            detected.insert(feature);
        }
        detected
    }
}

/// Run the probe battery against `rest`.
///
/// Probes run one at a time in table order. A status other than the expected
/// one means the feature is absent.
///
/// # Errors
///
/// [`ValidationError::EndpointUnreachable`] when a probe gets no response
/// (connection failure or timeout). Detection stops there: a capability that
/// cannot be checked must not be reported as absent.
pub async fn detect_features<P: Prober>(
    prober: &P,
    rest: &str,
) -> Result<DetectedFeatures, ValidationError> {
    let mut detected = DetectedFeatures::new();

    for probe in FEATURE_PROBES {
        let Some(path) = (probe.path)(&detected) else {
            tracing::debug!(feature = probe.name, "probe skipped");
            continue;
        };

        let result = prober.get(&endpoint_url(rest, path)).await;
        match result.status {
            Some(status) if status == probe.expected_status => {
                tracing::debug!(feature = probe.name, url = %result.url, status, "feature detected");
                for feature in probe.grants {
                    detected.insert(feature);
                }
            }
            Some(status) => {
                tracing::debug!(feature = probe.name, url = %result.url, status, "feature not detected");
            }
            None => {
                let reason = result
                    .failure
                    .unwrap_or_else(|| "no response".to_string());
                tracing::warn!(feature = probe.name, url = %result.url, %reason, "feature probe failed");
                return Err(ValidationError::EndpointUnreachable {
                    url: result.url,
                    reason,
                });
            }
        }
    }

    tracing::info!(rest, detected = ?detected.as_slice(), "capability detection finished");
    Ok(detected)
}

/// Compare detected capabilities with the declared list.
///
/// # Errors
///
/// [`ValidationError::MissingFeatures`] lists detected features absent from
/// `declared` (all of them when `declared` is `None`). It is checked first.
/// [`ValidationError::UndeclaredFeatures`] lists declared features no probe
/// confirmed.
pub fn reconcile(
    detected: &DetectedFeatures,
    declared: Option<&[String]>,
) -> Result<(), ValidationError> {
    let declared = declared.unwrap_or_default();

    let missing: Vec<String> = detected
        .as_slice()
        .iter()
        .filter(|feature| !declared.contains(feature))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFeatures(missing));
    }

    let mut extraneous: Vec<String> = Vec::new();
    for feature in declared {
        if !detected.contains(feature) && !extraneous.contains(feature) {
            extraneous.push(feature.clone());
        }
    }
    if !extraneous.is_empty() {
        return Err(ValidationError::UndeclaredFeatures(extraneous));
    }

    Ok(())
}
