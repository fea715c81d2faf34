//! # Registry Entries
//!
//! Two representations of one registry file:
//!
//! - [`RawEntry`]: the file name plus its parsed, untyped JSON, exactly as
//!   discovery hands it over.
//! - [`ChainEntry`]: the typed entry produced by the field validator once every
//!   required field has been checked.
//!
//! JSON field names follow the registry's camelCase convention
//! (`chainId`, `stakeCurrency`, `bech32Config`, ...).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registry file as loaded from disk, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// File name including extension, e.g. `cosmoshub.json`.
    pub file_name: String,
    /// Parsed JSON content of the file.
    pub content: Value,
}

impl RawEntry {
    /// Create a raw entry from a file name and its parsed content.
    pub fn new(file_name: impl Into<String>, content: Value) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// The entry key: the file name without its extension.
    pub fn key(&self) -> &str {
        file_stem(&self.file_name)
    }

    /// Serialized JSON of the whole entry, for diagnostics.
    pub fn describe(&self) -> String {
        self.content.to_string()
    }
}

/// Return everything before the first `.` of a file name.
pub(crate) fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Currency metadata: display denom, base denom and decimal precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyDescriptor {
    /// Display denomination, e.g. `ATOM`.
    pub coin_denom: String,
    /// Base (minimal) denomination, e.g. `uatom`.
    pub coin_minimal_denom: String,
    /// Number of decimals between the base and display denominations.
    pub coin_decimals: u32,
}

/// BIP-44 derivation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    /// SLIP-44 coin type, e.g. `118` for the Cosmos Hub.
    pub coin_type: u32,
}

/// Bech32 human-readable prefixes for the six address kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    /// Account address prefix.
    pub bech32_prefix_acc_addr: String,
    /// Account public key prefix.
    pub bech32_prefix_acc_pub: String,
    /// Validator operator address prefix.
    pub bech32_prefix_val_addr: String,
    /// Validator operator public key prefix.
    pub bech32_prefix_val_pub: String,
    /// Consensus node address prefix.
    pub bech32_prefix_cons_addr: String,
    /// Consensus node public key prefix.
    pub bech32_prefix_cons_pub: String,
}

/// A registry entry whose required fields have all been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    /// Declared chain identifier, e.g. `cosmoshub-4`.
    pub chain_id: String,
    /// Human-readable chain name.
    pub chain_name: String,
    /// Staking currency.
    pub stake_currency: CurrencyDescriptor,
    /// Derivation settings.
    pub bip44: Bip44,
    /// Address prefixes.
    pub bech32_config: Bech32Config,
    /// All currencies of the chain, in declared order.
    pub currencies: Vec<CurrencyDescriptor>,
    /// Currencies accepted for fees, in declared order.
    pub fee_currencies: Vec<CurrencyDescriptor>,
    /// Tendermint RPC base URL.
    pub rpc: String,
    /// Cosmos SDK REST (LCD) base URL.
    pub rest: String,
    /// Declared capability flags; `None` when the entry has no `features` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    /// Name of the file the entry was loaded from.
    #[serde(skip)]
    pub file_name: String,
}

impl ChainEntry {
    /// The file name without its extension.
    pub fn file_stem(&self) -> &str {
        file_stem(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_entry_key_strips_extension() {
        let raw = RawEntry::new("cosmoshub.json", json!({}));
        assert_eq!(raw.key(), "cosmoshub");
    }

    #[test]
    fn raw_entry_key_without_extension() {
        let raw = RawEntry::new("cosmoshub", json!({}));
        assert_eq!(raw.key(), "cosmoshub");
    }

    #[test]
    fn raw_entry_describe_is_compact_json() {
        let raw = RawEntry::new("osmosis.json", json!({"chainId": "osmosis-1"}));
        assert_eq!(raw.describe(), r#"{"chainId":"osmosis-1"}"#);
    }

    #[test]
    fn chain_entry_deserializes_registry_shape() {
        let value = json!({
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
            "rpc": "https://rpc.example.com",
            "rest": "https://lcd.example.com"
        });
        let entry: ChainEntry = serde_json::from_value(value).unwrap();
        assert_eq!(entry.bip44.coin_type, 118);
        assert_eq!(entry.bech32_config.bech32_prefix_val_addr, "cosmosvaloper");
        assert!(entry.features.is_none());
        assert!(entry.file_name.is_empty());
    }

    #[test]
    fn chain_entry_file_stem() {
        let value = json!({
            "chainId": "osmosis-1",
            "chainName": "Osmosis",
            "stakeCurrency": {"coinDenom": "OSMO", "coinMinimalDenom": "uosmo", "coinDecimals": 6},
            "bip44": {"coinType": 118},
            "bech32Config": {
                "bech32PrefixAccAddr": "osmo",
                "bech32PrefixAccPub": "osmopub",
                "bech32PrefixValAddr": "osmovaloper",
                "bech32PrefixValPub": "osmovaloperpub",
                "bech32PrefixConsAddr": "osmovalcons",
                "bech32PrefixConsPub": "osmovalconspub"
            },
            "currencies": [],
            "feeCurrencies": [],
            "rpc": "https://rpc.osmosis.zone",
            "rest": "https://lcd.osmosis.zone",
            "features": ["ibc-transfer"]
        });
        let mut entry: ChainEntry = serde_json::from_value(value).unwrap();
        entry.file_name = "osmosis.json".to_string();
        assert_eq!(entry.file_stem(), "osmosis");
        assert_eq!(entry.features.as_deref(), Some(&["ibc-transfer".to_string()][..]));
    }
}
