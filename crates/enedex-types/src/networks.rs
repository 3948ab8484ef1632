//! Network configuration types.
//!
//! Each network the harness can run against is keyed by its chain id. TOML
//! tables cannot have numeric keys, so chain ids arrive as strings and are
//! converted while deserializing.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Configuration for a single EVM network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC endpoint.
	pub rpc_url: String,
	/// Human readable name, e.g. "moonbase".
	#[serde(default)]
	pub name: Option<String>,
	/// Seconds between receipt polls.
	#[serde(default = "default_poll_interval_seconds")]
	pub poll_interval_seconds: u64,
	/// Maximum seconds to wait for a receipt before giving up.
	#[serde(default = "default_receipt_timeout_seconds")]
	pub receipt_timeout_seconds: u64,
}

fn default_poll_interval_seconds() -> u64 {
	2
}

fn default_receipt_timeout_seconds() -> u64 {
	120
}

/// Chain id to network configuration.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// Deserializes a networks table whose keys are chain ids written as strings.
///
/// # Errors
///
/// Fails if a key is not a valid `u64` or a network entry is malformed.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::with_capacity(string_map.len());

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain_id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}
