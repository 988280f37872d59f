//! Definition of the CLI arguments for integration tests

use clap::Parser;

use crate::constants::DEFAULT_PLAN_PATH;

/// CLI tool for running integration tests against an in-process devnet
#[derive(Parser)]
pub(crate) struct Cli {
    /// Substring filter selecting which tests to run; runs all tests when
    /// omitted
    #[arg(short, long)]
    pub(crate) test: Option<String>,

    /// Path to the rollout plan under test
    #[arg(short, long, default_value = DEFAULT_PLAN_PATH)]
    pub(crate) plan_path: String,
}
