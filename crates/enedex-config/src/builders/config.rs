//! Configuration builder for tests and local runs.

use crate::{AccountConfig, ArtifactsConfig, Config, HarnessConfig, TokenConfig};
use alloy_primitives::{address, Address};
use enedex_types::{NetworkConfig, SecretString};
use std::collections::HashMap;
use std::path::PathBuf;

/// Builder for `Config` instances, pre-filled for a local development node.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	harness_id: String,
	chain_id: u64,
	rpc_url: String,
	confirmations: u64,
	expected_create_pair_gas: Option<u64>,
	private_key: String,
	counterparty: Address,
	counterparty_private_key: Option<String>,
	token_name: String,
	token_version: String,
	total_supply: String,
	permit_value: String,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a builder with the development node defaults.
	pub fn new() -> Self {
		Self {
			harness_id: "enedex-test".to_string(),
			chain_id: 1281,
			rpc_url: "http://127.0.0.1:9933".to_string(),
			confirmations: 1,
			expected_create_pair_gas: None,
			private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
				.to_string(),
			counterparty: address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
			counterparty_private_key: None,
			token_name: "ENEDEX LP Token".to_string(),
			token_version: "1".to_string(),
			total_supply: "10000".to_string(),
			permit_value: "10".to_string(),
		}
	}

	pub fn harness_id(mut self, id: impl Into<String>) -> Self {
		self.harness_id = id.into();
		self
	}

	/// Sets the chain id of the single configured network.
	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
		self.rpc_url = rpc_url.into();
		self
	}

	pub fn confirmations(mut self, confirmations: u64) -> Self {
		self.confirmations = confirmations;
		self
	}

	pub fn expected_create_pair_gas(mut self, gas: Option<u64>) -> Self {
		self.expected_create_pair_gas = gas;
		self
	}

	pub fn private_key(mut self, key: impl Into<String>) -> Self {
		self.private_key = key.into();
		self
	}

	pub fn counterparty(mut self, counterparty: Address) -> Self {
		self.counterparty = counterparty;
		self
	}

	/// Lets the harness sign as the counterparty.
	pub fn counterparty_private_key(mut self, key: Option<&str>) -> Self {
		self.counterparty_private_key = key.map(str::to_string);
		self
	}

	pub fn token_name(mut self, name: impl Into<String>) -> Self {
		self.token_name = name.into();
		self
	}

	pub fn token_version(mut self, version: impl Into<String>) -> Self {
		self.token_version = version.into();
		self
	}

	/// Sets supply and permit value in whole tokens.
	pub fn amounts(mut self, total_supply: &str, permit_value: &str) -> Self {
		self.total_supply = total_supply.to_string();
		self.permit_value = permit_value.to_string();
		self
	}

	/// Builds the `Config`. Validation is not run.
	pub fn build(self) -> Config {
		let mut networks = HashMap::new();
		networks.insert(
			self.chain_id,
			NetworkConfig {
				rpc_url: self.rpc_url,
				name: Some("dev".to_string()),
				poll_interval_seconds: 1,
				receipt_timeout_seconds: 10,
			},
		);

		Config {
			harness: HarnessConfig {
				id: self.harness_id,
				network: self.chain_id,
				confirmations: self.confirmations,
				expected_create_pair_gas: self.expected_create_pair_gas,
			},
			networks,
			account: AccountConfig {
				private_key: SecretString::from(self.private_key),
				counterparty: self.counterparty,
				counterparty_private_key: self.counterparty_private_key.map(SecretString::from),
			},
			token: TokenConfig {
				name: self.token_name,
				symbol: "DLP".to_string(),
				decimals: 18,
				version: self.token_version,
				total_supply: self.total_supply,
				permit_value: self.permit_value,
			},
			artifacts: ArtifactsConfig {
				factory: PathBuf::from("artifacts/UniswapV2Factory.json"),
				pair: PathBuf::from("artifacts/UniswapV2Pair.json"),
				token: PathBuf::from("artifacts/TestUniswapV2ERC20.json"),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_built_config_is_valid() {
		let config = ConfigBuilder::new()
			.chain_id(1287)
			.expected_create_pair_gas(Some(2_068_206))
			.build();
		config.validate().unwrap();
		assert_eq!(config.active_network().unwrap().rpc_url, "http://127.0.0.1:9933");
		assert_eq!(config.harness.expected_create_pair_gas, Some(2_068_206));
	}
}
