//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading a file
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
    /// Invalid project configuration
    Config(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing the creation calldata for a contract
    CalldataConstruction(String),
    /// Error submitting a contract deployment
    ContractDeployment(String),
    /// Error waiting for a deployment to be confirmed
    DeploymentConfirmation(String),
    /// Error compiling the Solidity sources
    ContractCompilation(String),
    /// Error generating typed bindings
    BindingGeneration(String),
    /// Error de/serializing JSON
    Serde(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::Config(s) => write!(f, "invalid project config: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::DeploymentConfirmation(s) => {
                write!(f, "error confirming deployment: {}", s)
            }
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contracts: {}", s),
            ScriptError::BindingGeneration(s) => write!(f, "error generating bindings: {}", s),
            ScriptError::Serde(s) => write!(f, "error de/serializing json: {}", s),
        }
    }
}

impl Error for ScriptError {}
