//! # Endpoint Verification
//!
//! Confirms that an entry's declared endpoints are live and serve the chain
//! the entry describes:
//!
//! | Probe | Requirement |
//! |-------|-------------|
//! | `GET {rpc}/status` | 2xx, and `result.node_info.network` equals `chainId` exactly |
//! | `GET {rest}/staking/parameters` | 2xx |
//!
//! Exactly two requests per entry, sent sequentially, never retried.

use chainreg_core::{ChainEntry, ValidationError};
use chainreg_probe::{ProbeResult, Prober};

/// Tendermint RPC node status path.
pub const RPC_STATUS_PATH: &str = "/status";

/// Cosmos SDK REST staking parameters path.
pub const REST_STAKING_PARAMS_PATH: &str = "/staking/parameters";

/// JSON Pointer to the network identity in an RPC `/status` body.
const NETWORK_POINTER: &str = "/result/node_info/network";

/// Join a declared base URL with a fixed path.
///
/// A trailing `/` on the base is dropped so `https://rpc.example.com/` and
/// `https://rpc.example.com` probe the same URL.
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Verify the RPC endpoint, then the REST endpoint.
pub async fn verify_endpoints<P: Prober>(
    prober: &P,
    entry: &ChainEntry,
) -> Result<(), ValidationError> {
    verify_rpc(prober, &entry.rpc, &entry.chain_id).await?;
    verify_rest(prober, &entry.rest).await
}

/// Probe `{rpc}/status` and compare the reported network with `chain_id`.
pub async fn verify_rpc<P: Prober>(
    prober: &P,
    rpc: &str,
    chain_id: &str,
) -> Result<(), ValidationError> {
    let result = prober.get(&endpoint_url(rpc, RPC_STATUS_PATH)).await;
    require_success(&result)?;

    match result.body_str(NETWORK_POINTER) {
        Some(network) if network == chain_id => {
            tracing::info!(url = %result.url, %chain_id, "rpc verification successful");
            Ok(())
        }
        reported => Err(ValidationError::EndpointMismatch {
            declared: chain_id.to_string(),
            reported: reported.unwrap_or("<absent>").to_string(),
        }),
    }
}

/// Probe `{rest}/staking/parameters`.
pub async fn verify_rest<P: Prober>(prober: &P, rest: &str) -> Result<(), ValidationError> {
    let result = prober
        .get(&endpoint_url(rest, REST_STAKING_PARAMS_PATH))
        .await;
    require_success(&result)?;
    tracing::info!(url = %result.url, "rest verification successful");
    Ok(())
}

fn require_success(result: &ProbeResult) -> Result<(), ValidationError> {
    match result.status {
        None => Err(ValidationError::EndpointUnreachable {
            url: result.url.clone(),
            reason: result
                .failure
                .clone()
                .unwrap_or_else(|| "no response".to_string()),
        }),
        Some(_) if result.is_success() => Ok(()),
        Some(status) => Err(ValidationError::EndpointError {
            url: result.url.clone(),
            status,
        }),
    }
}
