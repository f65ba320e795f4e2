use clap::Parser;
use deploy_scripts::{cli::Cli, config::ProjectConfig, errors::ScriptError};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli { config, command } = Cli::parse();

    // Logs go to stderr, leaving stdout to the deployed addresses
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let config = ProjectConfig::load(&config)?;
    command.run(&config).await
}
