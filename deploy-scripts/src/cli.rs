//! Definitions of CLI arguments and commands for the deploy scripts

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{check_plan, report, run},
    constants::{
        DEFAULT_DEPLOYMENTS_PATH, DEFAULT_PLAN_PATH, DEPLOYMENTS_PATH_ENV_VAR, PLAN_PATH_ENV_VAR,
    },
    errors::ScriptError,
};

/// CLI tool for orchestrating deployments of the UCPI contract system
#[derive(Parser)]
pub struct Cli {
    /// Path to the rollout plan
    #[arg(short, long, default_value = DEFAULT_PLAN_PATH, env = PLAN_PATH_ENV_VAR)]
    pub plan_path: String,

    /// Path to the deployments file recording run progress
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH, env = DEPLOYMENTS_PATH_ENV_VAR)]
    pub deployments_path: String,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deploy script subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Validate the rollout plan and print the derived deployment order
    CheckPlan,
    /// Execute the rollout plan against an in-process devnet, resuming any
    /// progress recorded in the deployments file
    Run(RunArgs),
    /// Print the run report recorded in the deployments file
    Report,
}

/// Arguments to the `run` subcommand
#[derive(Args)]
pub struct RunArgs {
    /// Discard recorded progress and start a fresh run
    #[arg(long)]
    pub reset: bool,
}

impl Command {
    /// Dispatch the parsed subcommand
    pub async fn run(self, plan_path: &str, deployments_path: &str) -> Result<(), ScriptError> {
        match self {
            Command::CheckPlan => check_plan(plan_path),
            Command::Run(args) => run(args, plan_path, deployments_path).await,
            Command::Report => report(plan_path, deployments_path),
        }
    }
}
