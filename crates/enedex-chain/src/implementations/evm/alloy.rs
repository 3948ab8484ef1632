//! Alloy-based chain client.
//!
//! Talks to one HTTP JSON-RPC endpoint. Transactions are signed locally by
//! the provider's wallet filler, which also fills nonce, gas and fees.

use crate::{creation_payload, ChainClient, ChainError};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, TxKind, B256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use enedex_types::{
	Bytecode, Deployment, EventLog, NetworkConfig, SecretString, Transaction, TransactionHash,
	TransactionReceipt,
};
use std::sync::Arc;
use std::time::Duration;

type HttpProvider = Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>;

/// Chain client backed by an alloy HTTP provider with a local wallet.
pub struct AlloyChainClient {
	provider: HttpProvider,
	sender: Address,
	/// Every address the wallet can sign for, primary sender first.
	signers: Vec<Address>,
	confirmations: u64,
	poll_interval: Duration,
	receipt_timeout: Duration,
}

impl AlloyChainClient {
	/// Builds a client for `network`, signing as `signer` on `chain_id`.
	///
	/// `extra_signers` are registered with the wallet so transactions may
	/// name them in [`Transaction::from`].
	pub fn new(
		network: &NetworkConfig,
		chain_id: u64,
		signer: PrivateKeySigner,
		extra_signers: Vec<PrivateKeySigner>,
		confirmations: u64,
	) -> Result<Self, ChainError> {
		let url = network.rpc_url.parse().map_err(|e| {
			ChainError::Network(format!("Invalid RPC URL for network {}: {}", chain_id, e))
		})?;

		let sender = signer.address();
		let mut signers = vec![sender];
		let mut wallet = EthereumWallet::from(signer.with_chain_id(Some(chain_id)));
		for extra in extra_signers {
			signers.push(extra.address());
			wallet.register_signer(extra.with_chain_id(Some(chain_id)));
		}
		let poll_interval = Duration::from_secs(network.poll_interval_seconds);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);
		provider.client().set_poll_interval(poll_interval);

		tracing::debug!(
			chain_id,
			sender = %sender,
			signers = signers.len(),
			rpc = %network.rpc_url,
			"Created chain client"
		);

		Ok(Self {
			provider: Arc::new(provider),
			sender,
			signers,
			confirmations: confirmations.max(1),
			poll_interval,
			receipt_timeout: Duration::from_secs(network.receipt_timeout_seconds),
		})
	}

	/// Sender for `tx`, which must be one of the registered signers.
	fn sender_for(&self, tx: &Transaction) -> Result<Address, ChainError> {
		match tx.from {
			None => Ok(self.sender),
			Some(from) if self.signers.contains(&from) => Ok(from),
			Some(from) => Err(ChainError::UnknownSender(from)),
		}
	}

	/// Polls until the receipt of `tx_hash` has enough confirmations.
	async fn poll_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt, ChainError> {
		loop {
			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					tokio::time::sleep(self.poll_interval).await;
					continue;
				},
				Err(e) => {
					return Err(ChainError::Network(format!(
						"Failed to get receipt: {}",
						e
					)));
				},
			};

			let tx_block = receipt.block_number.unwrap_or(0);
			let current_block = self.provider.get_block_number().await.map_err(|e| {
				ChainError::Network(format!("Failed to get block number: {}", e))
			})?;
			let current_confirmations = confirmations_at(tx_block, current_block);

			if current_confirmations >= self.confirmations {
				return Ok(convert_receipt(&receipt));
			}

			tracing::debug!(
				tx_hash = %tx_hash,
				"Waiting for {} more confirmations",
				self.confirmations - current_confirmations
			);
			tokio::time::sleep(self.poll_interval).await;
		}
	}
}

/// Confirmations of a transaction mined in `tx_block` once the chain head is
/// `current_block`.
///
/// The inclusion block counts as the first confirmation. A head behind the
/// inclusion block (a lagging load-balanced node) counts as none.
fn confirmations_at(tx_block: u64, current_block: u64) -> u64 {
	if current_block < tx_block {
		0
	} else {
		current_block - tx_block + 1
	}
}

/// Converts a harness transaction into an RPC request.
fn to_request(tx: &Transaction, from: Address) -> TransactionRequest {
	let mut request = TransactionRequest::default()
		.from(from)
		.value(tx.value)
		.input(TransactionInput::new(Bytes::from(tx.data.clone())));
	request.to = Some(match tx.to {
		Some(to) => TxKind::Call(to),
		None => TxKind::Create,
	});
	request.chain_id = Some(tx.chain_id);
	if let Some(gas) = tx.gas_limit {
		request = request.gas_limit(gas);
	}
	request
}

/// Maps an RPC error, separating execution reverts from transport failures.
fn classify_rpc_error(context: &str, err: impl std::fmt::Display) -> ChainError {
	let message = err.to_string();
	if message.contains("revert") {
		ChainError::Reverted(message)
	} else {
		ChainError::Network(format!("{}: {}", context, message))
	}
}

fn convert_receipt(receipt: &alloy_rpc_types::TransactionReceipt) -> TransactionReceipt {
	let logs = receipt
		.inner
		.logs()
		.iter()
		.map(|log| EventLog {
			address: log.address(),
			topics: log.topics().to_vec(),
			data: log.data().data.clone(),
		})
		.collect();

	TransactionReceipt {
		hash: TransactionHash::from(receipt.transaction_hash),
		block_number: receipt.block_number.unwrap_or(0),
		success: receipt.status(),
		gas_used: receipt.gas_used as u64,
		contract_address: receipt.contract_address,
		logs,
	}
}

#[async_trait]
impl ChainClient for AlloyChainClient {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn deploy_contract(
		&self,
		bytecode: &Bytecode,
		constructor_args: &[u8],
	) -> Result<Deployment, ChainError> {
		let chain_id = self.chain_id().await?;
		let tx = Transaction::deploy(chain_id, creation_payload(bytecode, constructor_args));

		let hash = self.send_transaction(tx).await?;
		let receipt = self.wait_for_receipt(&hash).await?;
		if !receipt.success {
			return Err(ChainError::TransactionFailed(format!(
				"Deployment {} reverted",
				hash.to_hex()
			)));
		}

		let address = receipt
			.contract_address
			.ok_or_else(|| ChainError::MissingContractAddress(hash.to_hex()))?;
		tracing::info!(address = %address, gas_used = receipt.gas_used, "Deployed contract");

		Ok(Deployment { address, receipt })
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
		self.call_from(self.sender, to, data).await
	}

	async fn call_from(
		&self,
		from: Address,
		to: Address,
		data: Bytes,
	) -> Result<Bytes, ChainError> {
		let request = TransactionRequest::default()
			.from(from)
			.to(to)
			.input(TransactionInput::new(data));

		self.provider
			.call(&request)
			.await
			.map_err(|e| classify_rpc_error("Call failed", e))
	}

	async fn send_transaction(&self, tx: Transaction) -> Result<TransactionHash, ChainError> {
		let chain_id = tx.chain_id;
		let from = self.sender_for(&tx)?;
		let request = to_request(&tx, from);

		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| classify_rpc_error("Failed to send transaction", e))?;

		let hash = TransactionHash::from(*pending_tx.tx_hash());
		tracing::info!(tx_hash = %hash.to_hex(), chain_id, from = %from, "Submitted transaction");

		Ok(hash)
	}

	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, ChainError> {
		if hash.0.len() != 32 {
			return Err(ChainError::Network(format!(
				"Invalid transaction hash length {}",
				hash.0.len()
			)));
		}
		let tx_hash = B256::from_slice(&hash.0);

		tokio::time::timeout(self.receipt_timeout, self.poll_receipt(tx_hash))
			.await
			.map_err(|_| ChainError::Timeout {
				hash: hash.to_hex(),
				seconds: self.receipt_timeout.as_secs(),
			})?
	}
}

fn parse_signer(private_key: &SecretString) -> Result<PrivateKeySigner, ChainError> {
	private_key.with_exposed(|key| {
		key.trim()
			.parse()
			.map_err(|_| ChainError::Network("Invalid private key format".to_string()))
	})
}

/// Creates an HTTP chain client for `network`.
///
/// `private_key` signs every transaction that does not name a sender.
/// `extra_keys` sign transactions that name their address.
pub fn create_http_client(
	network: &NetworkConfig,
	chain_id: u64,
	private_key: &SecretString,
	extra_keys: &[SecretString],
	confirmations: u64,
) -> Result<Box<dyn ChainClient>, ChainError> {
	let signer = parse_signer(private_key)?;
	let extra_signers = extra_keys
		.iter()
		.map(parse_signer)
		.collect::<Result<Vec<_>, _>>()?;

	Ok(Box::new(AlloyChainClient::new(
		network,
		chain_id,
		signer,
		extra_signers,
		confirmations,
	)?))
}
