//! Configuration for the ENEDEX contract harness.
//!
//! The harness is driven by a single TOML file. Values may reference
//! environment variables with `${VAR}` or `${VAR:-default}`, which keeps
//! private keys out of the file itself.
//!
//! ```toml
//! [harness]
//! id = "enedex-local"
//! network = 1281
//!
//! [networks.1281]
//! rpc_url = "http://127.0.0.1:9933"
//!
//! [account]
//! private_key = "${ENEDEX_PRIVATE_KEY}"
//! counterparty = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
//!
//! [token]
//! name = "ENEDEX LP Token"
//! symbol = "DLP"
//! decimals = 18
//! total_supply = "10000"
//! permit_value = "10"
//!
//! [artifacts]
//! factory = "artifacts/UniswapV2Factory.json"
//! pair = "artifacts/UniswapV2Pair.json"
//! token = "artifacts/TestUniswapV2ERC20.json"
//! ```

#[cfg(feature = "testing")]
pub mod builders;

use alloy_primitives::{Address, U256};
use enedex_types::{
	networks::deserialize_networks, parse_units, NetworkConfig, NetworksConfig, SecretString,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Only the message, not the whole input.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level harness configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Run identity and behaviour.
	pub harness: HarnessConfig,
	/// Networks the harness knows about, keyed by chain id.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Wallets used to deploy, sign and receive permits.
	pub account: AccountConfig,
	/// Constructor and permit parameters of the LP token.
	pub token: TokenConfig,
	/// Locations of the compiled contract artifacts.
	pub artifacts: ArtifactsConfig,
}

/// Run identity and behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarnessConfig {
	/// Identifier attached to every log line of the run.
	pub id: String,
	/// Chain id of the network to run against. Must exist in `[networks]`.
	pub network: u64,
	/// Confirmations to wait for after each transaction.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
	/// Gas `createPair` is expected to use. When unset the gas scenario only
	/// reports the measured value.
	#[serde(default)]
	pub expected_create_pair_gas: Option<u64>,
}

fn default_confirmations() -> u64 {
	1
}

/// Wallets used by the harness.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex private key of the deploying wallet (the permit owner).
	pub private_key: SecretString,
	/// Second wallet, used as permit spender.
	pub counterparty: Address,
	/// Key of `counterparty`. Only scenarios that send transactions as the
	/// counterparty (`transferFrom`) need it; they are skipped without it.
	#[serde(default)]
	pub counterparty_private_key: Option<SecretString>,
}

/// LP token parameters. Amounts are whole tokens, scaled by `decimals`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
	/// EIP-712 domain name, as returned by `name()`.
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	/// EIP-712 domain version.
	#[serde(default = "default_token_version")]
	pub version: String,
	/// Supply minted to the deployer, e.g. `"10000"`.
	pub total_supply: String,
	/// Allowance granted through `permit`, e.g. `"10"`.
	pub permit_value: String,
}

fn default_token_version() -> String {
	"1".to_string()
}

impl TokenConfig {
	/// Total supply in base units.
	pub fn total_supply_units(&self) -> Result<U256, ConfigError> {
		parse_units(&self.total_supply, self.decimals, "token.total_supply")
			.map_err(|e| ConfigError::Validation(e.to_string()))
	}

	/// Permit value in base units.
	pub fn permit_value_units(&self) -> Result<U256, ConfigError> {
		parse_units(&self.permit_value, self.decimals, "token.permit_value")
			.map_err(|e| ConfigError::Validation(e.to_string()))
	}
}

/// Paths to hardhat artifact JSON files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
	pub factory: PathBuf,
	pub pair: PathBuf,
	pub token: PathBuf,
}

impl ArtifactsConfig {
	/// Makes relative paths relative to `base` instead of the working directory.
	fn rebase(&mut self, base: &Path) {
		for path in [&mut self.factory, &mut self.pair, &mut self.token] {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		}
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input is limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads the configuration file at `path`.
	///
	/// Relative artifact paths are resolved against the directory holding the
	/// configuration file.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path = Path::new(path);
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;

		let mut config: Config = content.parse()?;
		if let Some(base_dir) = path.parent() {
			config.artifacts.rebase(base_dir);
		}
		Ok(config)
	}

	/// The network selected by `harness.network`.
	pub fn active_network(&self) -> Result<&NetworkConfig, ConfigError> {
		self.networks.get(&self.harness.network).ok_or_else(|| {
			ConfigError::Validation(format!(
				"Network {} is not configured",
				self.harness.network
			))
		})
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.harness.id.trim().is_empty() {
			return Err(ConfigError::Validation("Harness ID cannot be empty".into()));
		}
		if self.harness.confirmations == 0 {
			return Err(ConfigError::Validation(
				"confirmations must be at least 1".into(),
			));
		}
		if self.harness.confirmations > 100 {
			return Err(ConfigError::Validation(
				"confirmations cannot exceed 100".into(),
			));
		}

		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}
		for (chain_id, network) in &self.networks {
			if network.rpc_url.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have an rpc_url",
					chain_id
				)));
			}
			if network.poll_interval_seconds == 0 {
				return Err(ConfigError::Validation(format!(
					"Network {} poll_interval_seconds must be greater than 0",
					chain_id
				)));
			}
			if network.receipt_timeout_seconds < network.poll_interval_seconds {
				return Err(ConfigError::Validation(format!(
					"Network {} receipt_timeout_seconds must be at least poll_interval_seconds",
					chain_id
				)));
			}
		}
		self.active_network()?;

		if self.account.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"Account private_key cannot be empty".into(),
			));
		}
		if self.account.counterparty == Address::ZERO {
			return Err(ConfigError::Validation(
				"Account counterparty cannot be the zero address".into(),
			));
		}
		if let Some(key) = &self.account.counterparty_private_key {
			if key.is_empty() {
				return Err(ConfigError::Validation(
					"Account counterparty_private_key cannot be empty when set".into(),
				));
			}
			if key == &self.account.private_key {
				return Err(ConfigError::Validation(
					"Account counterparty_private_key must differ from private_key".into(),
				));
			}
		}

		if self.token.name.is_empty() || self.token.symbol.is_empty() {
			return Err(ConfigError::Validation(
				"Token name and symbol cannot be empty".into(),
			));
		}
		let supply = self.token.total_supply_units()?;
		let permit_value = self.token.permit_value_units()?;
		if permit_value > supply {
			return Err(ConfigError::Validation(format!(
				"Token permit_value {} exceeds total_supply {}",
				self.token.permit_value, self.token.total_supply
			)));
		}

		for (name, path) in [
			("factory", &self.artifacts.factory),
			("pair", &self.artifacts.pair),
			("token", &self.artifacts.token),
		] {
			if path.as_os_str().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Artifact path for '{}' cannot be empty",
					name
				)));
			}
		}

		Ok(())
	}
}

/// Parses and validates a configuration string after resolving environment
/// variables.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
