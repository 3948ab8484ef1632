//! Hardhat artifact loading.
//!
//! Only the creation bytecode is used. Link references are not supported:
//! none of the contracts under test link libraries.

use crate::error::ScenarioError;
use enedex_config::ArtifactsConfig;
use enedex_types::Bytecode;
use serde::Deserialize;
use std::path::Path;

/// The parts of a hardhat artifact JSON file the harness reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
	pub contract_name: String,
	/// Creation bytecode as a 0x-prefixed hex string.
	pub bytecode: String,
}

impl HardhatArtifact {
	pub fn parse(json: &str) -> Result<Self, ScenarioError> {
		serde_json::from_str(json)
			.map_err(|e| ScenarioError::Artifact(format!("Invalid artifact JSON: {}", e)))
	}

	/// Decodes the creation bytecode, rejecting empty or unlinked code.
	pub fn creation_code(&self) -> Result<Bytecode, ScenarioError> {
		if self.bytecode.contains("__") {
			return Err(ScenarioError::Artifact(format!(
				"{} has unlinked library references",
				self.contract_name
			)));
		}
		Bytecode::from_hex(&self.bytecode).map_err(|e| {
			ScenarioError::Artifact(format!("{} bytecode: {}", self.contract_name, e))
		})
	}
}

/// Reads and decodes the artifact at `path`.
pub async fn load_artifact(path: &Path) -> Result<Bytecode, ScenarioError> {
	let json = tokio::fs::read_to_string(path)
		.await
		.map_err(|e| ScenarioError::Artifact(format!("Cannot read {}: {}", path.display(), e)))?;
	let artifact = HardhatArtifact::parse(&json)?;
	let code = artifact.creation_code()?;

	tracing::debug!(
		contract = %artifact.contract_name,
		bytes = code.len(),
		path = %path.display(),
		"Loaded artifact"
	);
	Ok(code)
}

/// Creation code of every contract the scenarios deploy.
#[derive(Debug, Clone)]
pub struct ContractArtifacts {
	pub factory: Bytecode,
	pub pair: Bytecode,
	pub token: Bytecode,
}

impl ContractArtifacts {
	pub async fn load(config: &ArtifactsConfig) -> Result<Self, ScenarioError> {
		Ok(Self {
			factory: load_artifact(&config.factory).await?,
			pair: load_artifact(&config.pair).await?,
			token: load_artifact(&config.token).await?,
		})
	}
}
