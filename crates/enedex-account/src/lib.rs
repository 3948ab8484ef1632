//! Signing accounts for the ENEDEX harness.
//!
//! The harness needs a wallet for two things: paying for deployments and
//! transactions, and signing permit digests off-chain. Both go through
//! [`AccountInterface`] so scenarios never handle raw keys themselves.

use async_trait::async_trait;
use enedex_config::AccountConfig;
use enedex_types::{Address, PermitSignature, SecretString, B256};
use thiserror::Error;

pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Interface every account implementation provides.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Address controlled by this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a 32-byte digest as-is, without the EIP-191 message prefix.
	///
	/// This is what `permit` expects: the EIP-712 digest is already final.
	async fn sign_digest(&self, digest: &B256) -> Result<PermitSignature, AccountError>;

	/// Returns the private key with 0x prefix.
	///
	/// Needed by the chain client, which signs transactions itself.
	fn get_private_key(&self) -> SecretString;
}

/// Creates the account described by `config`.
pub fn create_account(config: &AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError> {
	implementations::local::create_account(config)
}

/// Creates the counterparty account when `config` carries its key.
pub fn create_counterparty_account(
	config: &AccountConfig,
) -> Result<Option<Box<dyn AccountInterface>>, AccountError> {
	implementations::local::create_counterparty_account(config)
}

/// Service that manages account operations.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs a permit digest with the managed account.
	pub async fn sign_digest(&self, digest: &B256) -> Result<PermitSignature, AccountError> {
		self.implementation.sign_digest(digest).await
	}

	pub fn get_private_key(&self) -> SecretString {
		self.implementation.get_private_key()
	}
}
