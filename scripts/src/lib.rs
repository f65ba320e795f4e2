//! Scripts for compiling, generating bindings for, and deploying the
//! token & NFT contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod bindings;
pub mod cli;
mod commands;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod solidity;
pub mod types;
pub mod utils;

pub use commands::deploy_contracts;
