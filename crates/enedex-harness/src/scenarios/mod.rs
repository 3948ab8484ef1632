//! Scenario registry and runner.
//!
//! Scenarios are named `<group>:<case>`. Each one deploys fresh contracts,
//! so they can run in any order and any subset.

use crate::context::HarnessContext;
use crate::error::ScenarioError;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::Instrument;

pub mod erc20;
pub mod factory;

/// A single check against deployed contracts.
#[async_trait]
pub trait Scenario: Send + Sync {
	fn name(&self) -> &'static str;

	/// Whether the scenario sends transactions as the counterparty.
	///
	/// Such scenarios are skipped unless `counterparty_private_key` is set.
	fn needs_counterparty_key(&self) -> bool {
		false
	}

	async fn run(&self, ctx: &HarnessContext) -> Result<(), ScenarioError>;
}

/// Every scenario, in execution order.
pub fn all_scenarios() -> Vec<Box<dyn Scenario>> {
	let mut scenarios = factory::scenarios();
	scenarios.extend(erc20::scenarios());
	scenarios
}

/// Picks scenarios by exact name or by group (`factory`, `erc20`).
///
/// An empty selection means all scenarios.
pub fn select_scenarios(names: &[String]) -> Result<Vec<Box<dyn Scenario>>, ScenarioError> {
	if names.is_empty() {
		return Ok(all_scenarios());
	}

	for name in names {
		let known = all_scenarios().iter().any(|s| matches_name(s.name(), name));
		if !known {
			return Err(ScenarioError::UnknownScenario(name.clone()));
		}
	}

	Ok(all_scenarios()
		.into_iter()
		.filter(|s| names.iter().any(|name| matches_name(s.name(), name)))
		.collect())
}

fn matches_name(scenario: &str, selector: &str) -> bool {
	scenario == selector || scenario.split(':').next() == Some(selector)
}

/// Outcome of one scenario.
#[derive(Debug)]
pub struct ScenarioReport {
	pub name: &'static str,
	pub elapsed: Duration,
	/// Not run because a required key is missing.
	pub skipped: bool,
	pub result: Result<(), ScenarioError>,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
	pub reports: Vec<ScenarioReport>,
}

impl RunSummary {
	pub fn passed(&self) -> usize {
		self.reports
			.iter()
			.filter(|r| !r.skipped && r.result.is_ok())
			.count()
	}

	pub fn failed(&self) -> usize {
		self.reports.iter().filter(|r| r.result.is_err()).count()
	}

	pub fn skipped(&self) -> usize {
		self.reports.iter().filter(|r| r.skipped).count()
	}

	pub fn is_success(&self) -> bool {
		self.failed() == 0
	}

	/// Logs one line per scenario and a total.
	pub fn log(&self) {
		for report in &self.reports {
			match &report.result {
				Ok(()) if report.skipped => tracing::warn!(
					scenario = report.name,
					"SKIP: needs [account] counterparty_private_key"
				),
				Ok(()) => tracing::info!(
					scenario = report.name,
					elapsed_ms = report.elapsed.as_millis() as u64,
					"PASS"
				),
				Err(e) => tracing::error!(
					scenario = report.name,
					elapsed_ms = report.elapsed.as_millis() as u64,
					error = %e,
					"FAIL"
				),
			}
		}
		tracing::info!(
			passed = self.passed(),
			failed = self.failed(),
			skipped = self.skipped(),
			"{} of {} scenarios passed",
			self.passed(),
			self.reports.len()
		);
	}
}

/// Runs `scenarios` one after another. A failing scenario does not stop the run.
pub async fn run_scenarios(ctx: &HarnessContext, scenarios: &[Box<dyn Scenario>]) -> RunSummary {
	let mut summary = RunSummary::default();

	for scenario in scenarios {
		if scenario.needs_counterparty_key() && !ctx.counterparty_signs {
			summary.reports.push(ScenarioReport {
				name: scenario.name(),
				elapsed: Duration::ZERO,
				skipped: true,
				result: Ok(()),
			});
			continue;
		}

		let span = tracing::info_span!("scenario", name = scenario.name());
		tracing::info!(parent: &span, "Running");

		let started = Instant::now();
		let result = scenario.run(ctx).instrument(span).await;

		summary.reports.push(ScenarioReport {
			name: scenario.name(),
			elapsed: started.elapsed(),
			skipped: false,
			result,
		});
	}

	summary
}
