//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{bindings, compile, deploy},
    config::ProjectConfig,
    constants::{
        DEFAULT_CONFIG_PATH, DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_DEPLOY_CONFIRMATIONS,
        DEFAULT_RPC_URL,
    },
    errors::ScriptError,
};

/// Compile, generate bindings for, and deploy the token & NFT contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the project configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the ERC-20 token, then the ERC-721 NFT
    Deploy(DeployArgs),
    /// Compile the Solidity sources into artifacts
    Compile,
    /// Generate typed bindings from the compiled artifacts
    Bindings,
}

impl Command {
    /// Run the command against the given project configuration
    pub async fn run(self, config: &ProjectConfig) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, config).await,
            Command::Compile => compile(config),
            Command::Bindings => bindings(config),
        }
    }
}

/// Deploy the token and NFT contracts
#[derive(Args)]
pub struct DeployArgs {
    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Number of confirmations to wait for on each deployment
    #[arg(long, default_value_t = DEFAULT_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Seconds to wait for each deployment to be confirmed
    #[arg(long, default_value_t = DEFAULT_CONFIRMATION_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Optional path to a JSON file in which to record deployed addresses
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,
}
