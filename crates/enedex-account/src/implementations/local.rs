//! Local wallet backed by an in-memory private key.

use crate::{AccountError, AccountInterface};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use enedex_config::AccountConfig;
use enedex_types::{with_0x_prefix, Address, PermitSignature, SecretString, B256};

/// Account that signs with a private key held in process memory.
pub struct LocalWallet {
	signer: PrivateKeySigner,
	private_key: SecretString,
}

impl LocalWallet {
	/// Parses a hex private key, with or without 0x prefix.
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		let (signer, normalized) = private_key.with_exposed(|key| {
			let key = key.trim();
			let signer = key
				.parse::<PrivateKeySigner>()
				.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;
			Ok::<_, AccountError>((signer, SecretString::from(with_0x_prefix(key))))
		})?;
		Ok(Self {
			signer,
			private_key: normalized,
		})
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_digest(&self, digest: &B256) -> Result<PermitSignature, AccountError> {
		let signature = self
			.signer
			.sign_hash(digest)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		tracing::debug!(signer = %self.signer.address(), digest = %digest, "Signed digest");

		PermitSignature::from_bytes(&signature.as_bytes())
			.map_err(|e| AccountError::SigningFailed(e.to_string()))
	}

	fn get_private_key(&self) -> SecretString {
		self.private_key.clone()
	}
}

/// Factory for [`LocalWallet`] from the `[account]` section.
pub fn create_account(config: &AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError> {
	Ok(Box::new(LocalWallet::new(&config.private_key)?))
}

/// Wallet for the counterparty, if its key is configured.
///
/// The key must control `config.counterparty`.
pub fn create_counterparty_account(
	config: &AccountConfig,
) -> Result<Option<Box<dyn AccountInterface>>, AccountError> {
	let Some(key) = &config.counterparty_private_key else {
		return Ok(None);
	};
	let wallet = LocalWallet::new(key)?;
	let address = wallet.signer.address();
	if address != config.counterparty {
		return Err(AccountError::InvalidKey(format!(
			"counterparty_private_key controls {}, not counterparty {}",
			address, config.counterparty
		)));
	}
	Ok(Some(Box::new(wallet)))
}
