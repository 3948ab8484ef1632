//! LP token scenarios: metadata, EIP-712 domain, permit and transfers.
//!
//! The token is deployed with the whole configured supply minted to the owner.

use super::Scenario;
use crate::context::{single_event, HarnessContext};
use crate::contracts::IUniswapV2ERC20;
use crate::error::{ensure_eq, ScenarioError};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use enedex_core::{build_permit_digest, domain_separator, permit_typehash, verify_signer};
use enedex_types::{format_token_amount, Deadline, Eip712Domain, PermitMessage};

pub fn scenarios() -> Vec<Box<dyn Scenario>> {
	vec![
		Box::new(Network),
		Box::new(Metadata),
		Box::new(Permit),
		Box::new(Transfer),
		Box::new(TransferInsufficient),
		Box::new(TransferFrom { max: false }),
		Box::new(TransferFrom { max: true }),
	]
}

async fn deploy_token(ctx: &HarnessContext) -> Result<(Address, U256), ScenarioError> {
	let supply = ctx.config.token.total_supply_units()?;
	let token = ctx
		.deploy("TestUniswapV2ERC20", &ctx.artifacts.token, &(supply,))
		.await?;
	Ok((token, supply))
}

fn token_domain(ctx: &HarnessContext, token: Address) -> Eip712Domain {
	Eip712Domain::new(
		ctx.config.token.name.clone(),
		ctx.config.token.version.clone(),
		ctx.chain_id(),
		token,
	)
}

async fn balance_of(
	ctx: &HarnessContext,
	token: Address,
	owner: Address,
) -> Result<U256, ScenarioError> {
	Ok(ctx
		.view(token, &IUniswapV2ERC20::balanceOfCall { owner })
		.await?
		._0)
}

/// The node serves the chain the configuration targets.
pub struct Network;

#[async_trait]
impl Scenario for Network {
	fn name(&self) -> &'static str {
		"erc20:network"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let chain_id = ctx.client.chain_id().await?;
		ensure_eq("chainId", ctx.chain_id(), chain_id)
	}
}

/// Name, symbol, decimals, supply and the EIP-712 constants.
pub struct Metadata;

#[async_trait]
impl Scenario for Metadata {
	fn name(&self) -> &'static str {
		"erc20:metadata"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let (token, supply) = deploy_token(ctx).await?;
		let expected = &ctx.config.token;

		let name = ctx.view(token, &IUniswapV2ERC20::nameCall {}).await?._0;
		ensure_eq("name", expected.name.as_str(), name.as_str())?;
		let symbol = ctx.view(token, &IUniswapV2ERC20::symbolCall {}).await?._0;
		ensure_eq("symbol", expected.symbol.as_str(), symbol.as_str())?;
		let decimals = ctx.view(token, &IUniswapV2ERC20::decimalsCall {}).await?._0;
		ensure_eq("decimals", expected.decimals, decimals)?;

		let total = ctx
			.view(token, &IUniswapV2ERC20::totalSupplyCall {})
			.await?
			._0;
		ensure_eq("totalSupply", supply, total)?;
		ensure_eq("balanceOf(owner)", supply, balance_of(ctx, token, ctx.owner).await?)?;

		let separator = ctx
			.view(token, &IUniswapV2ERC20::DOMAIN_SEPARATORCall {})
			.await?
			._0;
		ensure_eq(
			"DOMAIN_SEPARATOR",
			domain_separator(&token_domain(ctx, token)),
			separator,
		)?;

		let typehash = ctx
			.view(token, &IUniswapV2ERC20::PERMIT_TYPEHASHCall {})
			.await?
			._0;
		ensure_eq("PERMIT_TYPEHASH", permit_typehash(), typehash)
	}
}

/// Signs a permit off-chain and submits it on the owner's behalf.
pub struct Permit;

#[async_trait]
impl Scenario for Permit {
	fn name(&self) -> &'static str {
		"erc20:permit"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let (token, _) = deploy_token(ctx).await?;
		let value = ctx.config.token.permit_value_units()?;

		let nonce = ctx
			.view(token, &IUniswapV2ERC20::noncesCall { owner: ctx.owner })
			.await?
			._0;
		let message = PermitMessage::new(ctx.owner, ctx.other, value, nonce, Deadline::Never);
		let digest = build_permit_digest(
			domain_separator(&token_domain(ctx, token)),
			&message,
			permit_typehash(),
		);

		let signature = ctx.account.sign_digest(&digest).await?;
		if !verify_signer(&digest, &signature, ctx.owner)? {
			return Err(ScenarioError::Mismatch {
				what: "permit signer".to_string(),
				expected: ctx.owner.to_string(),
				actual: enedex_core::recover_signer(&digest, &signature)?.to_string(),
			});
		}
		tracing::debug!(%digest, v = signature.v, "Signed permit");

		let receipt = ctx
			.transact(
				token,
				&IUniswapV2ERC20::permitCall {
					owner: message.owner,
					spender: message.spender,
					value: message.value,
					deadline: message.deadline.as_u256(),
					v: signature.v,
					r: signature.r,
					s: signature.s,
				},
			)
			.await?;

		let approval: IUniswapV2ERC20::Approval = single_event(&receipt, token)?;
		ensure_eq("Approval.owner", ctx.owner, approval.owner)?;
		ensure_eq("Approval.spender", ctx.other, approval.spender)?;
		ensure_eq("Approval.value", value, approval.value)?;

		ensure_eq("allowance", value, allowance(ctx, token).await?)?;

		let next = ctx
			.view(token, &IUniswapV2ERC20::noncesCall { owner: ctx.owner })
			.await?
			._0;
		ensure_eq("nonces(owner)", nonce + U256::from(1), next)
	}
}

/// Moves the permit amount from the owner to the counterparty.
pub struct Transfer;

#[async_trait]
impl Scenario for Transfer {
	fn name(&self) -> &'static str {
		"erc20:transfer"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let (token, supply) = deploy_token(ctx).await?;
		let value = ctx.config.token.permit_value_units()?;
		tracing::info!(
			amount = %format_token_amount(&value.to_string(), ctx.config.token.decimals),
			symbol = %ctx.config.token.symbol,
			"Transferring to counterparty"
		);

		let receipt = ctx
			.transact(
				token,
				&IUniswapV2ERC20::transferCall {
					to: ctx.other,
					value,
				},
			)
			.await?;

		let transfer: IUniswapV2ERC20::Transfer = single_event(&receipt, token)?;
		ensure_eq("Transfer.from", ctx.owner, transfer.from)?;
		ensure_eq("Transfer.to", ctx.other, transfer.to)?;
		ensure_eq("Transfer.value", value, transfer.value)?;

		ensure_eq(
			"balanceOf(owner)",
			supply - value,
			balance_of(ctx, token, ctx.owner).await?,
		)?;
		ensure_eq(
			"balanceOf(other)",
			value,
			balance_of(ctx, token, ctx.other).await?,
		)
	}
}

async fn allowance(ctx: &HarnessContext, token: Address) -> Result<U256, ScenarioError> {
	Ok(ctx
		.view(
			token,
			&IUniswapV2ERC20::allowanceCall {
				owner: ctx.owner,
				spender: ctx.other,
			},
		)
		.await?
		._0)
}

/// Transferring more than the balance reverts, for the owner and for an
/// account holding nothing.
pub struct TransferInsufficient;

#[async_trait]
impl Scenario for TransferInsufficient {
	fn name(&self) -> &'static str {
		"erc20:transfer-insufficient"
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let (token, supply) = deploy_token(ctx).await?;
		ctx.expect_revert(
			token,
			&IUniswapV2ERC20::transferCall {
				to: ctx.other,
				value: supply + U256::from(1),
			},
		)
		.await?;

		ctx.expect_revert_from(
			ctx.other,
			token,
			&IUniswapV2ERC20::transferCall {
				to: ctx.owner,
				value: U256::from(1),
			},
		)
		.await?;
		Ok(())
	}
}

/// The counterparty spends an allowance the owner approved.
///
/// With `max` the allowance is `type(uint256).max`, which `transferFrom`
/// leaves untouched.
pub struct TransferFrom {
	pub max: bool,
}

#[async_trait]
impl Scenario for TransferFrom {
	fn name(&self) -> &'static str {
		if self.max {
			"erc20:transfer-from-max"
		} else {
			"erc20:transfer-from"
		}
	}

	fn needs_counterparty_key(&self) -> bool {
		true
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError> {
		let (token, supply) = deploy_token(ctx).await?;
		let value = ctx.config.token.permit_value_units()?;
		let approved = if self.max { U256::MAX } else { value };

		let receipt = ctx
			.transact(
				token,
				&IUniswapV2ERC20::approveCall {
					spender: ctx.other,
					value: approved,
				},
			)
			.await?;
		let approval: IUniswapV2ERC20::Approval = single_event(&receipt, token)?;
		ensure_eq("Approval.value", approved, approval.value)?;

		let receipt = ctx
			.transact_from(
				ctx.other,
				token,
				&IUniswapV2ERC20::transferFromCall {
					from: ctx.owner,
					to: ctx.other,
					value,
				},
			)
			.await?;
		let transfer: IUniswapV2ERC20::Transfer = single_event(&receipt, token)?;
		ensure_eq("Transfer.from", ctx.owner, transfer.from)?;
		ensure_eq("Transfer.to", ctx.other, transfer.to)?;
		ensure_eq("Transfer.value", value, transfer.value)?;

		let remaining = if self.max { U256::MAX } else { U256::ZERO };
		ensure_eq("allowance", remaining, allowance(ctx, token).await?)?;
		ensure_eq(
			"balanceOf(owner)",
			supply - value,
			balance_of(ctx, token, ctx.owner).await?,
		)?;
		ensure_eq(
			"balanceOf(other)",
			value,
			balance_of(ctx, token, ctx.other).await?,
		)
	}
}
