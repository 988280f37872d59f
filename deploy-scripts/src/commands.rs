//! Implementations of the deploy script subcommands

use itertools::Itertools;
use tracing::info;

use crate::{
    cli::RunArgs,
    devnet::DevnetClient,
    engine::{build_report, execute},
    errors::ScriptError,
    ledger::RunLedger,
    resolver::resolve,
    utils::read_plan_from_file,
};

/// Validate the plan and print the derived deployment order
pub fn check_plan(plan_path: &str) -> Result<(), ScriptError> {
    let plan = read_plan_from_file(plan_path)?;
    let order = resolve(&plan)?;

    println!("deployment order: {}", order.iter().join(", "));

    Ok(())
}

/// Execute or resume the plan against an in-process devnet.
///
/// Rehearses the rollout end to end: the devnet assigns addresses the way a
/// real node would, and the deployments file records progress exactly as a
/// live run does. Pointing a node-backed ledger client at the same plan is
/// the production path.
pub async fn run(args: RunArgs, plan_path: &str, deployments_path: &str) -> Result<(), ScriptError> {
    let plan = read_plan_from_file(plan_path)?;
    let order = resolve(&plan)?;

    if args.reset {
        RunLedger::reset(deployments_path)?;
    }
    let mut ledger = RunLedger::load_or_create(deployments_path)?;

    let client = DevnetClient::new();
    info!("rehearsing rollout with deployer {:#x}", client.deployer());

    let report = execute(&plan, &order, &client, &mut ledger).await?;
    println!("{report}");

    Ok(())
}

/// Print the run report recorded in the deployments file
pub fn report(plan_path: &str, deployments_path: &str) -> Result<(), ScriptError> {
    let plan = read_plan_from_file(plan_path)?;
    let ledger = RunLedger::load_or_create(deployments_path)?;

    println!("{}", build_report(&plan, &ledger));

    Ok(())
}
