//! Scenario error taxonomy.

use enedex_account::AccountError;
use enedex_chain::ChainError;
use enedex_config::ConfigError;
use enedex_types::DerivationError;
use std::fmt::Display;
use thiserror::Error;

/// Errors that make a scenario fail.
#[derive(Debug, Error)]
pub enum ScenarioError {
	#[error("Chain error: {0}")]
	Chain(#[from] ChainError),
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	#[error("Derivation error: {0}")]
	Derivation(#[from] DerivationError),
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),
	/// Return data or an event could not be ABI-decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	/// A contract artifact is missing or malformed.
	#[error("Artifact error: {0}")]
	Artifact(String),
	/// An on-chain value differs from the expected one.
	#[error("{what}: expected {expected}, got {actual}")]
	Mismatch {
		what: String,
		expected: String,
		actual: String,
	},
	/// A call that must revert succeeded.
	#[error("Expected {0} to revert, but it succeeded")]
	ExpectedRevert(String),
	#[error("Unknown scenario '{0}'")]
	UnknownScenario(String),
}

/// Fails with [`ScenarioError::Mismatch`] unless `actual == expected`.
pub fn ensure_eq<T>(what: &str, expected: T, actual: T) -> Result<(), ScenarioError>
where
	T: PartialEq + Display,
{
	if expected == actual {
		return Ok(());
	}
	Err(ScenarioError::Mismatch {
		what: what.to_string(),
		expected: expected.to_string(),
		actual: actual.to_string(),
	})
}

/// Fails with [`ScenarioError::Mismatch`] unless the revert message of
/// `call` mentions `expected`.
pub fn ensure_revert_reason(call: &str, reason: &str, expected: &str) -> Result<(), ScenarioError> {
	if reason.contains(expected) {
		return Ok(());
	}
	Err(ScenarioError::Mismatch {
		what: format!("{} revert reason", call),
		expected: expected.to_string(),
		actual: reason.to_string(),
	})
}
