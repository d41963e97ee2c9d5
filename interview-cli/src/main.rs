use anyhow::Result;
use clap::Parser;
use interview_cli::cli::{Cli, Command};
use interview_cli::config::AppConfig;
use interview_cli::{commands, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Interview(args) => {
            commands::interview(&config, &args).await?;
        }
        Command::Evaluate(args) => {
            commands::evaluate(&config, &args).await?;
        }
    }
    Ok(())
}
