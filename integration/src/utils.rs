//! Utilities for running integration tests

use std::fs;

use alloy_primitives::Address;
use deploy_common::types::{Plan, RunReport, StepStatus};
use deploy_scripts::{
    devnet::DevnetClient,
    engine::{build_report, execute},
    errors::ScriptError,
    ledger::RunLedger,
    resolver::resolve,
};
use eyre::{eyre, Result, WrapErr};

use crate::test_inventory::TestArgs;

/// Read the rollout plan under test
pub(crate) fn read_plan(path: &str) -> Result<Plan> {
    let contents = fs::read_to_string(path).wrap_err_with(|| format!("reading plan {path}"))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("parsing plan {path}"))
}

/// Execute the full plan against `client`, expecting every step to confirm
pub(crate) async fn run_to_completion(args: &TestArgs, client: &DevnetClient) -> Result<RunReport> {
    let order = resolve(&args.plan)?;
    let mut ledger = RunLedger::load_or_create(&args.deployments_path)?;

    Ok(execute(&args.plan, &order, client, &mut ledger).await?)
}

/// Execute the plan against `client`, expecting the run to abort
pub(crate) async fn run_expecting_failure(
    args: &TestArgs,
    client: &DevnetClient,
) -> Result<ScriptError> {
    let order = resolve(&args.plan)?;
    let mut ledger = RunLedger::load_or_create(&args.deployments_path)?;

    match execute(&args.plan, &order, client, &mut ledger).await {
        Ok(_) => Err(eyre!("run succeeded despite injected failure")),
        Err(e) => Ok(e),
    }
}

/// Rebuild the run report from the test's persisted deployments file
pub(crate) fn report_from_ledger(args: &TestArgs) -> Result<RunReport> {
    let ledger = RunLedger::load_or_create(&args.deployments_path)?;
    Ok(build_report(&args.plan, &ledger))
}

/// The recorded status of a component in a report
pub(crate) fn status_of(report: &RunReport, id: &str) -> Result<StepStatus> {
    report
        .components
        .iter()
        .find(|component| component.id == id)
        .map(|component| component.status)
        .ok_or_else(|| eyre!("{id} missing from report"))
}

/// The confirmed address of a component in a report
pub(crate) fn address_of(report: &RunReport, id: &str) -> Result<Address> {
    report
        .components
        .iter()
        .find(|component| component.id == id)
        .and_then(|component| component.address)
        .ok_or_else(|| eyre!("{id} has no address in report"))
}
