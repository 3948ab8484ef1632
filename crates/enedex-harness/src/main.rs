//! Conformance harness for the ENEDEX pair factory and LP token.
//!
//! Deploys the compiled contracts to the configured network and checks their
//! on-chain behavior against locally derived values: CREATE2 pair addresses,
//! EIP-712 domain separators and permit signatures.

use clap::Parser;
use enedex_account::{create_account, create_counterparty_account, AccountService};
use enedex_chain::create_http_client;
use enedex_config::Config;
use std::path::PathBuf;
use std::sync::Arc;

mod artifacts;
mod context;
mod contracts;
mod error;
mod scenarios;
#[cfg(test)]
mod test_support;

use artifacts::ContractArtifacts;
use context::HarnessContext;
use scenarios::{all_scenarios, run_scenarios, select_scenarios};

/// Command-line arguments for the harness.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Scenario name or group to run; repeatable. Runs everything when omitted.
	#[arg(short, long = "scenario")]
	scenarios: Vec<String>,

	/// Print the scenario names and exit
	#[arg(long)]
	list: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if args.list {
		for scenario in all_scenarios() {
			println!("{}", scenario.name());
		}
		return Ok(());
	}

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.harness.id);

	let selected = select_scenarios(&args.scenarios)?;
	let context = build_context(config).await?;
	tracing::info!(
		chain_id = context.chain_id(),
		owner = %context.owner,
		other = %context.other,
		"Running {} scenarios",
		selected.len()
	);

	let summary = run_scenarios(&context, &selected).await;
	summary.log();

	if !summary.is_success() {
		return Err(format!("{} of {} scenarios failed", summary.failed(), summary.reports.len()).into());
	}
	Ok(())
}

/// Wires the signing account, chain client and artifacts into a context.
async fn build_context(config: Config) -> Result<HarnessContext, Box<dyn std::error::Error>> {
	let network = config.active_network()?;
	let account = AccountService::new(create_account(&config.account)?);
	let extra_keys: Vec<_> = create_counterparty_account(&config.account)?
		.map(|counterparty| counterparty.get_private_key())
		.into_iter()
		.collect();
	if extra_keys.is_empty() {
		tracing::info!("No counterparty key; scenarios sending as the counterparty will be skipped");
	}
	let client = create_http_client(
		network,
		config.harness.network,
		&account.get_private_key(),
		&extra_keys,
		config.harness.confirmations,
	)?;
	tracing::info!(rpc_url = %network.rpc_url, "Connected chain client");

	let artifacts = ContractArtifacts::load(&config.artifacts).await?;
	Ok(HarnessContext::new(Arc::from(client), account, config, artifacts).await?)
}
