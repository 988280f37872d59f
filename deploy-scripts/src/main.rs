use clap::Parser;
use deploy_scripts::{cli::Cli, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli { plan_path, deployments_path, command } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    command.run(&plan_path, &deployments_path).await
}
