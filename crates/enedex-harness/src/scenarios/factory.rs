//! Pair factory scenarios.
//!
//! Every scenario deploys a fresh factory with the owner as `feeToSetter`.

use super::Scenario;
use crate::context::{single_event, HarnessContext};
use crate::contracts::{IUniswapV2Factory, IUniswapV2Pair};
use crate::error::{ensure_eq, ensure_revert_reason, ScenarioError};
use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use enedex_core::{derive_address, init_code_hash, sort_tokens};

/// Placeholder token addresses. No code lives there; the factory only
/// records them.
pub const TEST_ADDRESSES: [Address; 2] = [
	address!("1000000000000000000000000000000000000000"),
	address!("2000000000000000000000000000000000000000"),
];

const FORBIDDEN: &str = "UniswapV2: FORBIDDEN";
const PAIR_EXISTS: &str = "UniswapV2: PAIR_EXISTS";

pub fn scenarios() -> Vec<Box<dyn Scenario>> {
	vec![
		Box::new(Defaults),
		Box::new(PairCodeHash),
		Box::new(CreatePair { reverse: false }),
		Box::new(CreatePair { reverse: true }),
		Box::new(CreatePairGas),
		Box::new(SetFeeTo),
		Box::new(SetFeeToSetter),
	]
}

async fn deploy_factory(ctx: &HarnessContext) -> Result<Address, ScenarioError> {
	ctx.deploy("UniswapV2Factory", &ctx.artifacts.factory, &(ctx.owner,))
		.await
}

/// `feeTo`, `feeToSetter` and `allPairsLength` right after deployment.
pub struct Defaults;

#[async_trait]
impl Scenario for Defaults {
	fn name(&self) -> &'static str {
		"factory:defaults"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let factory = deploy_factory(ctx).await?;

		let fee_to = ctx.view(factory, &IUniswapV2Factory::feeToCall {}).await?._0;
		ensure_eq("feeTo", Address::ZERO, fee_to)?;

		let setter = ctx
			.view(factory, &IUniswapV2Factory::feeToSetterCall {})
			.await?
			._0;
		ensure_eq("feeToSetter", ctx.owner, setter)?;

		let length = ctx
			.view(factory, &IUniswapV2Factory::allPairsLengthCall {})
			.await?
			._0;
		ensure_eq("allPairsLength", U256::ZERO, length)
	}
}

/// The factory's `pairCodeHash()` matches the hash of the pair artifact.
pub struct PairCodeHash;

#[async_trait]
impl Scenario for PairCodeHash {
	fn name(&self) -> &'static str {
		"factory:pair-code-hash"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let factory = deploy_factory(ctx).await?;
		let expected = init_code_hash(&ctx.artifacts.pair)?;
		let on_chain = ctx
			.view(factory, &IUniswapV2Factory::pairCodeHashCall {})
			.await?
			._0;
		tracing::info!(init_code_hash = %on_chain, "Pair init code hash");
		ensure_eq("pairCodeHash", expected, on_chain)
	}
}

/// Creates a pair and checks it landed at the locally derived address.
pub struct CreatePair {
	/// Pass the tokens to `createPair` in descending order.
	pub reverse: bool,
}

#[async_trait]
impl Scenario for CreatePair {
	fn name(&self) -> &'static str {
		if self.reverse {
			"factory:create-pair-reverse"
		} else {
			"factory:create-pair"
		}
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let factory = deploy_factory(ctx).await?;
		let (token_a, token_b) = if self.reverse {
			(TEST_ADDRESSES[1], TEST_ADDRESSES[0])
		} else {
			(TEST_ADDRESSES[0], TEST_ADDRESSES[1])
		};
		let (token0, token1) = sort_tokens(token_a, token_b);
		let expected = derive_address(factory, token_a, token_b, &ctx.artifacts.pair)?;
		tracing::info!(pair = %expected, "Derived pair address");

		let receipt = ctx
			.transact(
				factory,
				&IUniswapV2Factory::createPairCall {
					tokenA: token_a,
					tokenB: token_b,
				},
			)
			.await?;

		let created: IUniswapV2Factory::PairCreated = single_event(&receipt, factory)?;
		ensure_eq("PairCreated.token0", token0, created.token0)?;
		ensure_eq("PairCreated.token1", token1, created.token1)?;
		ensure_eq("PairCreated.pair", expected, created.pair)?;
		ensure_eq("PairCreated.allPairsLength", U256::from(1), created.allPairsLength)?;

		// A second pair for the same tokens must be refused in either order.
		for (a, b) in [(token_a, token_b), (token_b, token_a)] {
			let duplicate = IUniswapV2Factory::createPairCall { tokenA: a, tokenB: b };
			let reason = ctx.expect_revert(factory, &duplicate).await?;
			ensure_revert_reason(
				IUniswapV2Factory::createPairCall::SIGNATURE,
				&reason,
				PAIR_EXISTS,
			)?;
			let pair = ctx
				.view(factory, &IUniswapV2Factory::getPairCall { tokenA: a, tokenB: b })
				.await?
				.pair;
			ensure_eq("getPair", expected, pair)?;
		}

		let first = ctx
			.view(
				factory,
				&IUniswapV2Factory::allPairsCall {
					index: U256::ZERO,
				},
			)
			.await?
			.pair;
		ensure_eq("allPairs(0)", expected, first)?;

		let length = ctx
			.view(factory, &IUniswapV2Factory::allPairsLengthCall {})
			.await?
			._0;
		ensure_eq("allPairsLength", U256::from(1), length)?;

		let pair_factory = ctx.view(expected, &IUniswapV2Pair::factoryCall {}).await?._0;
		ensure_eq("pair.factory", factory, pair_factory)?;
		let pair_token0 = ctx.view(expected, &IUniswapV2Pair::token0Call {}).await?._0;
		ensure_eq("pair.token0", token0, pair_token0)?;
		let pair_token1 = ctx.view(expected, &IUniswapV2Pair::token1Call {}).await?._0;
		ensure_eq("pair.token1", token1, pair_token1)
	}
}

/// Reports the gas `createPair` uses, and compares it when a value is pinned.
pub struct CreatePairGas;

#[async_trait]
impl Scenario for CreatePairGas {
	fn name(&self) -> &'static str {
		"factory:create-pair-gas"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let factory = deploy_factory(ctx).await?;
		let receipt = ctx
			.transact(
				factory,
				&IUniswapV2Factory::createPairCall {
					tokenA: TEST_ADDRESSES[0],
					tokenB: TEST_ADDRESSES[1],
				},
			)
			.await?;

		tracing::info!(gas_used = receipt.gas_used, "createPair gas");
		match ctx.config.harness.expected_create_pair_gas {
			Some(expected) => ensure_eq("createPair gasUsed", expected, receipt.gas_used),
			None => Ok(()),
		}
	}
}

/// Only `feeToSetter` may change `feeTo`.
pub struct SetFeeTo;

#[async_trait]
impl Scenario for SetFeeTo {
	fn name(&self) -> &'static str {
		"factory:set-fee-to"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let factory = deploy_factory(ctx).await?;

		let refused = IUniswapV2Factory::setFeeToCall { _feeTo: ctx.other };
		let reason = ctx.expect_revert_from(ctx.other, factory, &refused).await?;
		ensure_revert_reason(IUniswapV2Factory::setFeeToCall::SIGNATURE, &reason, FORBIDDEN)?;

		ctx.transact(factory, &IUniswapV2Factory::setFeeToCall { _feeTo: ctx.owner })
			.await?;
		let fee_to = ctx.view(factory, &IUniswapV2Factory::feeToCall {}).await?._0;
		ensure_eq("feeTo", ctx.owner, fee_to)
	}
}

/// `feeToSetter` hands its role over and loses it.
pub struct SetFeeToSetter;

#[async_trait]
impl Scenario for SetFeeToSetter {
	fn name(&self) -> &'static str {
		"factory:set-fee-to-setter"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let factory = deploy_factory(ctx).await?;
		let signature = IUniswapV2Factory::setFeeToSetterCall::SIGNATURE;

		let to_other = IUniswapV2Factory::setFeeToSetterCall {
			_feeToSetter: ctx.other,
		};
		let reason = ctx.expect_revert_from(ctx.other, factory, &to_other).await?;
		ensure_revert_reason(signature, &reason, FORBIDDEN)?;

		ctx.transact(factory, &to_other).await?;
		let setter = ctx
			.view(factory, &IUniswapV2Factory::feeToSetterCall {})
			.await?
			._0;
		ensure_eq("feeToSetter", ctx.other, setter)?;

		// The former setter is locked out.
		let back = IUniswapV2Factory::setFeeToSetterCall {
			_feeToSetter: ctx.owner,
		};
		let reason = ctx.expect_revert(factory, &back).await?;
		ensure_revert_reason(signature, &reason, FORBIDDEN)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::{
		context, context_with, deployment, event_log, fixture_bytecode, receipt, reverted, selector,
		MockChain, DEPLOYED, OTHER, OWNER, TX_HASH,
	};
	use alloy_sol_types::SolValue;
	use enedex_chain::ChainError;
	use enedex_config::builders::ConfigBuilder;
	use enedex_types::{Bytes, TransactionHash};

	fn factory_views(
		fee_to_setter: Address,
	) -> impl Fn(Address, Bytes) -> Result<Bytes, ChainError> + Send + 'static {
		move |_, data| {
			let out = match selector(&data) {
				IUniswapV2Factory::feeToCall::SELECTOR => Address::ZERO.abi_encode(),
				IUniswapV2Factory::feeToSetterCall::SELECTOR => fee_to_setter.abi_encode(),
				IUniswapV2Factory::allPairsLengthCall::SELECTOR => U256::ZERO.abi_encode(),
				other => panic!("unexpected call {:?}", other),
			};
			Ok(out.into())
		}
	}

	#[tokio::test]
	async fn test_defaults_pass() {
		let mut chain = MockChain::new();
		chain
			.expect_deploy_contract()
			.withf(|_, args| args == OWNER.abi_encode().as_slice())
			.times(1)
			.returning(|_, _| Ok(deployment()));
		chain.expect_call().returning(factory_views(OWNER));

		let ctx = context(chain).await;
		Defaults.run(&ctx).await.unwrap();
	}

	#[tokio::test]
	async fn test_defaults_wrong_setter() {
		let mut chain = MockChain::new();
		chain.expect_deploy_contract().returning(|_, _| Ok(deployment()));
		chain.expect_call().returning(factory_views(Address::ZERO));

		let ctx = context(chain).await;
		let err = Defaults.run(&ctx).await.unwrap_err();
		assert!(matches!(err, ScenarioError::Mismatch { ref what, .. } if what == "feeToSetter"));
	}

	#[tokio::test]
	async fn test_pair_code_hash() {
		let mut chain = MockChain::new();
		chain.expect_deploy_contract().returning(|_, _| Ok(deployment()));
		chain.expect_call().returning(|_, _| {
			let hash = init_code_hash(fixture_bytecode()).unwrap();
			Ok(hash.abi_encode().into())
		});

		let ctx = context(chain).await;
		PairCodeHash.run(&ctx).await.unwrap();
	}

	/// Mock chain behaving like a factory at [`DEPLOYED`] that creates the
	/// pair for [`TEST_ADDRESSES`].
	fn pair_factory_chain() -> MockChain {
		pair_factory_with_revert(PAIR_EXISTS)
	}

	/// Same as [`pair_factory_chain`], refusing duplicates with `duplicate_reason`.
	fn pair_factory_with_revert(duplicate_reason: &'static str) -> MockChain {
		let pair = derive_address(
			DEPLOYED,
			TEST_ADDRESSES[0],
			TEST_ADDRESSES[1],
			fixture_bytecode(),
		)
		.unwrap();

		let mut chain = MockChain::new();
		chain.expect_deploy_contract().returning(|_, _| Ok(deployment()));
		chain
			.expect_send_transaction()
			.withf(|tx| {
				tx.to == Some(DEPLOYED)
					&& tx.chain_id == 1281
					&& tx.data[..4] == IUniswapV2Factory::createPairCall::SELECTOR
			})
			.times(1)
			.returning(|_| Ok(TransactionHash::from(TX_HASH)));
		chain.expect_wait_for_receipt().returning(move |_| {
			let event = IUniswapV2Factory::PairCreated {
				token0: TEST_ADDRESSES[0],
				token1: TEST_ADDRESSES[1],
				pair,
				allPairsLength: U256::from(1),
			};
			Ok(receipt(2_068_206, vec![event_log(DEPLOYED, &event)]))
		});
		chain.expect_call().returning(move |to, data| {
			if to == pair {
				let out = match selector(&data) {
					IUniswapV2Pair::factoryCall::SELECTOR => DEPLOYED,
					IUniswapV2Pair::token0Call::SELECTOR => TEST_ADDRESSES[0],
					IUniswapV2Pair::token1Call::SELECTOR => TEST_ADDRESSES[1],
					other => panic!("unexpected pair call {:?}", other),
				};
				return Ok(out.abi_encode().into());
			}
			let out = match selector(&data) {
				IUniswapV2Factory::createPairCall::SELECTOR => {
					return Err(reverted(duplicate_reason))
				},
				IUniswapV2Factory::getPairCall::SELECTOR => pair.abi_encode(),
				IUniswapV2Factory::allPairsCall::SELECTOR => pair.abi_encode(),
				IUniswapV2Factory::allPairsLengthCall::SELECTOR => U256::from(1).abi_encode(),
				other => panic!("unexpected factory call {:?}", other),
			};
			Ok(out.into())
		});
		chain
	}

	#[tokio::test]
	async fn test_create_pair_both_orders() {
		for reverse in [false, true] {
			let ctx = context(pair_factory_chain()).await;
			CreatePair { reverse }.run(&ctx).await.unwrap();
		}
	}

	#[tokio::test]
	async fn test_create_pair_wrong_address() {
		let mut chain = MockChain::new();
		chain.expect_deploy_contract().returning(|_, _| Ok(deployment()));
		chain
			.expect_send_transaction()
			.returning(|_| Ok(TransactionHash::from(TX_HASH)));
		chain.expect_wait_for_receipt().returning(|_| {
			let event = IUniswapV2Factory::PairCreated {
				token0: TEST_ADDRESSES[0],
				token1: TEST_ADDRESSES[1],
				pair: address!("84ebe11ee632a2b0ac029371b8bf862c0ed57042"),
				allPairsLength: U256::from(1),
			};
			Ok(receipt(2_068_206, vec![event_log(DEPLOYED, &event)]))
		});

		let ctx = context(chain).await;
		let err = CreatePair { reverse: false }.run(&ctx).await.unwrap_err();
		assert!(matches!(err, ScenarioError::Mismatch { ref what, .. } if what == "PairCreated.pair"));
	}

	#[tokio::test]
	async fn test_duplicate_pair_must_revert() {
		let pair = derive_address(
			DEPLOYED,
			TEST_ADDRESSES[0],
			TEST_ADDRESSES[1],
			fixture_bytecode(),
		)
		.unwrap();

		let mut chain = MockChain::new();
		chain.expect_deploy_contract().returning(|_, _| Ok(deployment()));
		chain
			.expect_send_transaction()
			.returning(|_| Ok(TransactionHash::from(TX_HASH)));
		chain.expect_wait_for_receipt().returning(move |_| {
			let event = IUniswapV2Factory::PairCreated {
				token0: TEST_ADDRESSES[0],
				token1: TEST_ADDRESSES[1],
				pair,
				allPairsLength: U256::from(1),
			};
			Ok(receipt(2_068_206, vec![event_log(DEPLOYED, &event)]))
		});
		// The factory accepts the duplicate.
		chain
			.expect_call()
			.returning(move |_, _| Ok(pair.abi_encode().into()));

		let ctx = context(chain).await;
		let err = CreatePair { reverse: false }.run(&ctx).await.unwrap_err();
		assert!(
			matches!(err, ScenarioError::ExpectedRevert(ref call) if call.starts_with("createPair"))
		);
	}

	#[tokio::test]
	async fn test_gas_guard_is_opt_in() {
		let ctx = context(pair_factory_chain()).await;
		CreatePairGas.run(&ctx).await.unwrap();

		let pinned = ConfigBuilder::new().expected_create_pair_gas(Some(2_068_206));
		let ctx = context_with(pair_factory_chain(), pinned).await;
		CreatePairGas.run(&ctx).await.unwrap();

		let wrong = ConfigBuilder::new().expected_create_pair_gas(Some(2_000_000));
		let ctx = context_with(pair_factory_chain(), wrong).await;
		let err = CreatePairGas.run(&ctx).await.unwrap_err();
		assert_eq!(
			err.to_string(),
			"createPair gasUsed: expected 2000000, got 2068206"
		);
	}

	#[tokio::test]
	async fn test_duplicate_pair_wrong_reason() {
		let ctx = context(pair_factory_with_revert("UniswapV2: IDENTICAL_ADDRESSES")).await;
		let err = CreatePair { reverse: false }.run(&ctx).await.unwrap_err();
		assert!(matches!(
			err,
			ScenarioError::Mismatch { ref what, ref expected, .. }
				if what == "createPair(address,address) revert reason" && expected == PAIR_EXISTS
		));
	}

	/// Factory at [`DEPLOYED`] with `setFeeTo` and `setFeeToSetter` wired
	/// like the real contract, `feeToSetter` already handed to [`OTHER`].
	fn fee_chain(other_call: Result<(), &'static str>) -> MockChain {
		let mut chain = MockChain::new();
		chain.expect_deploy_contract().returning(|_, _| Ok(deployment()));
		chain
			.expect_call_from()
			.withf(|from, to, _| *from == OTHER && *to == DEPLOYED)
			.returning(move |_, _, _| match other_call {
				Ok(()) => Ok(Bytes::new()),
				Err(reason) => Err(reverted(reason)),
			});
		chain
			.expect_send_transaction()
			.withf(|tx| tx.from.is_none() && tx.to == Some(DEPLOYED))
			.times(1)
			.returning(|_| Ok(TransactionHash::from(TX_HASH)));
		chain
			.expect_wait_for_receipt()
			.returning(|_| Ok(receipt(45_000, Vec::new())));
		chain.expect_call().returning(|_, data| {
			let out = match selector(&data) {
				IUniswapV2Factory::feeToCall::SELECTOR => OWNER.abi_encode(),
				IUniswapV2Factory::feeToSetterCall::SELECTOR => OTHER.abi_encode(),
				IUniswapV2Factory::setFeeToSetterCall::SELECTOR => return Err(reverted(FORBIDDEN)),
				other => panic!("unexpected call {:?}", other),
			};
			Ok(out.into())
		});
		chain
	}

	#[tokio::test]
	async fn test_set_fee_to() {
		let ctx = context(fee_chain(Err(FORBIDDEN))).await;
		SetFeeTo.run(&ctx).await.unwrap();
	}

	#[tokio::test]
	async fn test_set_fee_to_open_to_anyone() {
		let ctx = context(fee_chain(Ok(()))).await;
		let err = SetFeeTo.run(&ctx).await.unwrap_err();
		assert!(matches!(err, ScenarioError::ExpectedRevert(ref call) if call == "setFeeTo(address)"));
	}

	#[tokio::test]
	async fn test_set_fee_to_wrong_reason() {
		let ctx = context(fee_chain(Err("UniswapV2: LOCKED"))).await;
		let err = SetFeeTo.run(&ctx).await.unwrap_err();
		assert!(matches!(
			err,
			ScenarioError::Mismatch { ref what, .. } if what == "setFeeTo(address) revert reason"
		));
	}

	#[tokio::test]
	async fn test_set_fee_to_setter() {
		let ctx = context(fee_chain(Err(FORBIDDEN))).await;
		SetFeeToSetter.run(&ctx).await.unwrap();
	}
}
