//! Chain access for the ENEDEX harness.
//!
//! [`ChainClient`] is the typed seam between the scenarios and a JSON-RPC
//! node: deploy creation code, run read-only calls, submit transactions and
//! wait for their receipts. The pure derivations in `enedex-core` never go
//! through it.

use async_trait::async_trait;
use enedex_types::{
	Address, Bytecode, Bytes, Deployment, Transaction, TransactionHash, TransactionReceipt,
};
use thiserror::Error;

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use implementations::evm::alloy::{create_http_client, AlloyChainClient};

/// Errors that can occur while talking to a node.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The node rejected a call or transaction because execution reverted.
	#[error("Execution reverted: {0}")]
	Reverted(String),
	/// A mined transaction has status 0.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// A deployment receipt carries no contract address.
	#[error("Deployment receipt {0} has no contract address")]
	MissingContractAddress(String),
	/// A transaction names a sender the client holds no key for.
	#[error("No signer registered for {0}")]
	UnknownSender(Address),
	/// No receipt arrived within the configured timeout.
	#[error("Timed out after {seconds}s waiting for {hash}")]
	Timeout { hash: String, seconds: u64 },
}

impl ChainError {
	/// Revert reason, if this error is a revert.
	pub fn revert_reason(&self) -> Option<&str> {
		match self {
			ChainError::Reverted(reason) => Some(reason),
			_ => None,
		}
	}
}

/// Interface to a single EVM chain.
///
/// A client signs with one primary wallet and may hold extra keys for
/// transactions that set [`Transaction::from`].
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// Chain id reported by the node.
	async fn chain_id(&self) -> Result<u64, ChainError>;

	/// Deploys `bytecode` followed by ABI-encoded `constructor_args` and waits
	/// for the receipt.
	async fn deploy_contract(
		&self,
		bytecode: &Bytecode,
		constructor_args: &[u8],
	) -> Result<Deployment, ChainError>;

	/// Executes a read-only call from the primary signer against the latest block.
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;

	/// Executes a read-only call with `from` as `msg.sender`.
	///
	/// No key for `from` is needed.
	async fn call_from(&self, from: Address, to: Address, data: Bytes)
		-> Result<Bytes, ChainError>;

	/// Signs and submits a transaction, returning as soon as the node accepts it.
	async fn send_transaction(&self, tx: Transaction) -> Result<TransactionHash, ChainError>;

	/// Waits until `hash` is mined with the configured confirmations.
	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, ChainError>;
}

/// Appends ABI-encoded constructor arguments to creation code.
pub fn creation_payload(bytecode: &Bytecode, constructor_args: &[u8]) -> Vec<u8> {
	let mut payload = Vec::with_capacity(bytecode.len() + constructor_args.len());
	payload.extend_from_slice(bytecode.as_slice());
	payload.extend_from_slice(constructor_args);
	payload
}
