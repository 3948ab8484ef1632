//! Shared state handed to every scenario.

use crate::artifacts::ContractArtifacts;
use crate::error::ScenarioError;
use alloy_sol_types::abi::TokenSeq;
use alloy_sol_types::{SolCall, SolEvent, SolType, SolValue};
use enedex_account::AccountService;
use enedex_chain::{ChainClient, ChainError};
use enedex_config::Config;
use enedex_types::{Address, Bytecode, Bytes, Transaction, TransactionReceipt};
use std::sync::Arc;

/// Everything a scenario may use: chain access, the signing account, the
/// loaded configuration and artifacts, and the two wallet addresses.
pub struct HarnessContext {
	pub client: Arc<dyn ChainClient>,
	pub account: AccountService,
	pub config: Config,
	pub artifacts: ContractArtifacts,
	/// Deployer and permit owner.
	pub owner: Address,
	/// Permit spender and transfer recipient.
	pub other: Address,
	/// Whether the client can sign transactions as [`Self::other`].
	pub counterparty_signs: bool,
}

impl HarnessContext {
	pub async fn new(
		client: Arc<dyn ChainClient>,
		account: AccountService,
		config: Config,
		artifacts: ContractArtifacts,
	) -> Result<Self, ScenarioError> {
		let owner = account.get_address().await?;
		let other = config.account.counterparty;
		let counterparty_signs = config.account.counterparty_private_key.is_some();
		Ok(Self {
			client,
			account,
			config,
			artifacts,
			owner,
			other,
			counterparty_signs,
		})
	}

	/// Chain id transactions are signed for.
	pub fn chain_id(&self) -> u64 {
		self.config.harness.network
	}

	/// Deploys `bytecode` with ABI-encoded constructor arguments.
	pub async fn deploy<A>(
		&self,
		contract: &str,
		bytecode: &Bytecode,
		args: &A,
	) -> Result<Address, ScenarioError>
	where
		A: SolValue,
		for<'a> <A::SolType as SolType>::Token<'a>: TokenSeq<'a>,
	{
		let deployment = self
			.client
			.deploy_contract(bytecode, &args.abi_encode_params())
			.await?;
		tracing::debug!(contract, address = %deployment.address, "Deployed");
		Ok(deployment.address)
	}

	/// Executes a view call and decodes its return value.
	pub async fn view<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return, ScenarioError> {
		let output = self.client.call(to, call.abi_encode().into()).await?;
		C::abi_decode_returns(&output, true).map_err(|e| {
			ScenarioError::Decode(format!("{} returned undecodable data: {}", C::SIGNATURE, e))
		})
	}

	/// Sends a transaction from the owner and waits for a successful receipt.
	pub async fn transact<C: SolCall>(
		&self,
		to: Address,
		call: &C,
	) -> Result<TransactionReceipt, ScenarioError> {
		self.send(Transaction::call(self.chain_id(), to, call.abi_encode()), C::SIGNATURE)
			.await
	}

	/// Sends a transaction from `from`, which the client must hold a key for.
	pub async fn transact_from<C: SolCall>(
		&self,
		from: Address,
		to: Address,
		call: &C,
	) -> Result<TransactionReceipt, ScenarioError> {
		let tx = Transaction::call(self.chain_id(), to, call.abi_encode()).with_from(from);
		self.send(tx, C::SIGNATURE).await
	}

	async fn send(
		&self,
		tx: Transaction,
		signature: &str,
	) -> Result<TransactionReceipt, ScenarioError> {
		let hash = self.client.send_transaction(tx).await?;
		let receipt = self.client.wait_for_receipt(&hash).await?;
		if !receipt.success {
			return Err(ChainError::TransactionFailed(format!(
				"{} in {} reverted",
				signature,
				hash.to_hex()
			))
			.into());
		}
		Ok(receipt)
	}

	/// Requires `call` to revert, returning the node's revert message.
	pub async fn expect_revert<C: SolCall>(
		&self,
		to: Address,
		call: &C,
	) -> Result<String, ScenarioError> {
		let result = self.client.call(to, call.abi_encode().into()).await;
		reverted::<C>(result)
	}

	/// Requires `call` to revert when sent by `from`.
	///
	/// Runs as `eth_call`, so no key for `from` is needed.
	pub async fn expect_revert_from<C: SolCall>(
		&self,
		from: Address,
		to: Address,
		call: &C,
	) -> Result<String, ScenarioError> {
		let result = self.client.call_from(from, to, call.abi_encode().into()).await;
		reverted::<C>(result)
	}
}

fn reverted<C: SolCall>(result: Result<Bytes, ChainError>) -> Result<String, ScenarioError> {
	match result {
		Err(ChainError::Reverted(reason)) => {
			tracing::debug!(call = C::SIGNATURE, %reason, "Reverted as expected");
			Ok(reason)
		},
		Err(e) => Err(e.into()),
		Ok(_) => Err(ScenarioError::ExpectedRevert(C::SIGNATURE.to_string())),
	}
}

/// Decodes every `E` event `emitter` logged in `receipt`.
pub fn decode_events<E: SolEvent>(
	receipt: &TransactionReceipt,
	emitter: Address,
) -> Result<Vec<E>, ScenarioError> {
	receipt
		.logs_matching(emitter, E::SIGNATURE_HASH)
		.map(|log| {
			E::decode_raw_log(log.topics.iter().copied(), &log.data, true).map_err(|e| {
				ScenarioError::Decode(format!("Invalid {} event: {}", E::SIGNATURE, e))
			})
		})
		.collect()
}

/// Decodes the single `E` event `emitter` logged in `receipt`.
pub fn single_event<E: SolEvent>(
	receipt: &TransactionReceipt,
	emitter: Address,
) -> Result<E, ScenarioError> {
	let mut events = decode_events::<E>(receipt, emitter)?;
	if events.len() != 1 {
		return Err(ScenarioError::Mismatch {
			what: format!("{} events", E::SIGNATURE),
			expected: "1".to_string(),
			actual: events.len().to_string(),
		});
	}
	Ok(events.remove(0))
}
