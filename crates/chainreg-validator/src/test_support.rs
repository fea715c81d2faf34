//! Shared fixtures for unit tests: a canned-response prober and a valid
//! registry entry.

use std::collections::HashMap;
use std::sync::Mutex;

use chainreg_probe::{ProbeResult, Prober};
use serde_json::{json, Value};

/// Prober that answers from a fixed URL → result table. Unknown URLs get a
/// 501, the status a Cosmos SDK gateway returns for unregistered routes.
#[derive(Debug, Default)]
pub(crate) struct StaticProber {
    responses: HashMap<String, ProbeResult>,
    calls: Mutex<Vec<String>>,
}

impl StaticProber {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, url: &str, status: u16, body: Value) -> Self {
        self.responses
            .insert(url.to_string(), ProbeResult::response(url, status, body));
        self
    }

    pub(crate) fn unreachable(mut self, url: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            ProbeResult::unreachable(url, "connection failed: refused"),
        );
        self
    }

    /// A healthy node at `rpc`/`rest` reporting `network`.
    pub(crate) fn healthy(self, rpc: &str, rest: &str, network: &str) -> Self {
        self.respond(
            &format!("{rpc}/status"),
            200,
            json!({"result": {"node_info": {"network": network}}}),
        )
        .respond(&format!("{rest}/staking/parameters"), 200, json!({}))
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Prober for StaticProber {
    async fn get(&self, url: &str) -> ProbeResult {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| ProbeResult::response(url, 501, json!({"code": 12})))
    }
}

pub(crate) const RPC: &str = "https://rpc.example.com";
pub(crate) const REST: &str = "https://lcd.example.com";

/// A registry entry that passes every field check.
pub(crate) fn valid_entry_json(chain_id: &str) -> Value {
    json!({
        "chainId": chain_id,
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
        "rpc": RPC,
        "rest": REST
    })
}
