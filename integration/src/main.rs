//! Integration tests for the UCPI deployment orchestrator. Each test drives
//! a full or partial rollout of the shipped plan against an in-process
//! devnet, with its own scratch deployments file.

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use test_inventory::{IntegrationTest, TestArgs};
use utils::read_plan;

mod cli;
mod constants;
mod test_inventory;
mod tests;
mod utils;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let Cli { test, plan_path } = Cli::parse();

    let plan = read_plan(&plan_path)?;
    let scratch = tempfile::tempdir()?;

    let mut failures = 0;
    for case in inventory::iter::<IntegrationTest> {
        if let Some(filter) = &test {
            if !case.name.contains(filter.as_str()) {
                continue;
            }
        }

        let args = TestArgs {
            plan: plan.clone(),
            deployments_path: scratch.path().join(format!("{}.json", case.name)),
        };

        print!("{}... ", case.name);
        match (case.test_fn)(args).await {
            Ok(()) => println!("{}", "PASS".green()),
            Err(e) => {
                failures += 1;
                println!("{}\n{e:?}", "FAIL".red());
            }
        }
    }

    if failures > 0 {
        eyre::bail!("{failures} integration test(s) failed");
    }

    Ok(())
}
