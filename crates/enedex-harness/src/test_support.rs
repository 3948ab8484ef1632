//! Mock chain and fixtures shared by scenario tests.

use crate::artifacts::ContractArtifacts;
use crate::context::HarnessContext;
use alloy_primitives::{address, hex, Address, Bytes, B256};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use enedex_account::{implementations::local::LocalWallet, AccountService};
use enedex_chain::{ChainClient, ChainError};
use enedex_config::builders::ConfigBuilder;
use enedex_types::{
	Bytecode, Deployment, EventLog, SecretString, Transaction, TransactionHash, TransactionReceipt,
};
use mockall::mock;
use std::sync::Arc;

mock! {
	pub Chain {}

	#[async_trait]
	impl ChainClient for Chain {
		async fn chain_id(&self) -> Result<u64, ChainError>;
		async fn deploy_contract(
			&self,
			bytecode: &Bytecode,
			constructor_args: &[u8],
		) -> Result<Deployment, ChainError>;
		async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;
		async fn call_from(
			&self,
			from: Address,
			to: Address,
			data: Bytes,
		) -> Result<Bytes, ChainError>;
		async fn send_transaction(&self, tx: Transaction) -> Result<TransactionHash, ChainError>;
		async fn wait_for_receipt(
			&self,
			hash: &TransactionHash,
		) -> Result<TransactionReceipt, ChainError>;
	}
}

pub const OWNER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const OTHER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const OTHER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
/// First contract address of the owner on a fresh chain.
pub const DEPLOYED: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const TX_HASH: B256 = B256::repeat_byte(0xab);

/// Minimal creation code standing in for every artifact.
pub fn fixture_bytecode() -> Bytecode {
	Bytecode::new(
		hex!("6080604052348015600f57600080fd5b50603f80601d6000396000f3fe6080604052600080fdfea164736f6c634300060c000a")
			.to_vec(),
	)
	.unwrap()
}

pub fn fixture_artifacts() -> ContractArtifacts {
	ContractArtifacts {
		factory: fixture_bytecode(),
		pair: fixture_bytecode(),
		token: fixture_bytecode(),
	}
}

/// Builds a context on the default development config around `chain`.
pub async fn context(chain: MockChain) -> HarnessContext {
	context_with(chain, ConfigBuilder::new()).await
}

/// Builds a context whose client also signs as [`OTHER`].
pub async fn counterparty_context(chain: MockChain) -> HarnessContext {
	context_with(chain, ConfigBuilder::new().counterparty_private_key(Some(OTHER_KEY))).await
}

pub async fn context_with(chain: MockChain, builder: ConfigBuilder) -> HarnessContext {
	let wallet = LocalWallet::new(&SecretString::from(OWNER_KEY)).unwrap();
	HarnessContext::new(
		Arc::new(chain),
		AccountService::new(Box::new(wallet)),
		builder.build(),
		fixture_artifacts(),
	)
	.await
	.unwrap()
}

/// Successful receipt carrying `logs`.
pub fn receipt(gas_used: u64, logs: Vec<EventLog>) -> TransactionReceipt {
	TransactionReceipt {
		hash: TransactionHash::from(TX_HASH),
		block_number: 7,
		success: true,
		gas_used,
		contract_address: None,
		logs,
	}
}

/// Deployment of a contract at [`DEPLOYED`].
pub fn deployment() -> Deployment {
	let mut receipt = receipt(1_000_000, Vec::new());
	receipt.contract_address = Some(DEPLOYED);
	Deployment {
		address: DEPLOYED,
		receipt,
	}
}

/// Event log as emitted by `emitter`.
pub fn event_log<E: SolEvent>(emitter: Address, event: &E) -> EventLog {
	let data = event.encode_log_data();
	EventLog {
		address: emitter,
		topics: data.topics().to_vec(),
		data: data.data,
	}
}

pub fn selector(data: &Bytes) -> [u8; 4] {
	let mut out = [0u8; 4];
	out.copy_from_slice(&data[..4]);
	out
}

pub fn reverted(reason: &str) -> ChainError {
	ChainError::Reverted(format!("execution reverted: {}", reason))
}
