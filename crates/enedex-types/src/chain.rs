//! Chain interaction types for the harness.
//!
//! These types are the typed counterpart of the RPC objects a node returns:
//! transactions to submit, their hashes, receipts and the event logs those
//! receipts carry.

use alloy_primitives::{Address, Bytes, B256, U256};

/// Transaction hash as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl TransactionHash {
	pub fn to_hex(&self) -> String {
		crate::with_0x_prefix(&hex::encode(&self.0))
	}
}

impl From<B256> for TransactionHash {
	fn from(hash: B256) -> Self {
		Self(hash.0.to_vec())
	}
}

/// A transaction to be signed and submitted by a chain client.
///
/// `to == None` deploys `data` as creation code. `from == None` sends from
/// the client's primary signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	pub chain_id: u64,
	pub from: Option<Address>,
	pub to: Option<Address>,
	pub data: Vec<u8>,
	pub value: U256,
	pub gas_limit: Option<u64>,
}

impl Transaction {
	/// A plain contract call with no value attached.
	pub fn call(chain_id: u64, to: Address, data: Vec<u8>) -> Self {
		Self {
			chain_id,
			from: None,
			to: Some(to),
			data,
			value: U256::ZERO,
			gas_limit: None,
		}
	}

	/// A contract creation transaction.
	pub fn deploy(chain_id: u64, creation_code: Vec<u8>) -> Self {
		Self {
			chain_id,
			from: None,
			to: None,
			data: creation_code,
			value: U256::ZERO,
			gas_limit: None,
		}
	}

	/// Sends the transaction from `from` instead of the primary signer.
	pub fn with_from(mut self, from: Address) -> Self {
		self.from = Some(from);
		self
	}
}

/// A log emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
	/// Contract that emitted the log.
	pub address: Address,
	/// Indexed topics, the first one being the event signature hash.
	pub topics: Vec<B256>,
	/// ABI-encoded non-indexed data.
	pub data: Bytes,
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	pub hash: TransactionHash,
	pub block_number: u64,
	/// Whether execution succeeded (status 1).
	pub success: bool,
	pub gas_used: u64,
	/// Address of the created contract for deployment transactions.
	pub contract_address: Option<Address>,
	pub logs: Vec<EventLog>,
}

impl TransactionReceipt {
	/// Logs emitted by `emitter` whose first topic is `signature`.
	pub fn logs_matching(
		&self,
		emitter: Address,
		signature: B256,
	) -> impl Iterator<Item = &EventLog> + '_ {
		self.logs.iter().filter(move |log| {
			log.address == emitter && log.topics.first() == Some(&signature)
		})
	}
}

/// Result of a successful contract deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
	pub address: Address,
	pub receipt: TransactionReceipt,
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, b256};

	#[test]
	fn test_logs_matching_filters_emitter_and_topic() {
		let emitter = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
		let topic = b256!("0d3648bd0f6ba80134a33ba9275ac585d9d315f0ad8355cddefde31afa28d0e9");
		let log = |address, topics| EventLog {
			address,
			topics,
			data: Bytes::new(),
		};
		let receipt = TransactionReceipt {
			hash: TransactionHash(vec![0u8; 32]),
			block_number: 1,
			success: true,
			gas_used: 21_000,
			contract_address: None,
			logs: vec![
				log(emitter, vec![topic]),
				log(Address::ZERO, vec![topic]),
				log(emitter, vec![B256::ZERO]),
				log(emitter, vec![]),
			],
		};

		assert_eq!(receipt.logs_matching(emitter, topic).count(), 1);
	}

	#[test]
	fn test_transaction_sender_override() {
		let to = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
		let other = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

		let tx = Transaction::call(31337, to, vec![0xa9]);
		assert_eq!(tx.from, None);
		assert_eq!(tx.with_from(other).from, Some(other));
		assert_eq!(Transaction::deploy(31337, vec![0x60]).from, None);
	}

	#[test]
	fn test_transaction_hash_hex() {
		let hash = TransactionHash(vec![0xab, 0xcd]);
		assert_eq!(hash.to_hex(), "0xabcd");
	}
}
