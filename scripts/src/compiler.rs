//! Invocation of the Solidity compiler and parsing of its output

use std::{collections::BTreeMap, path::PathBuf, process::Command};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::ProjectConfig,
    constants::{ARTIFACT_FORMAT, SOLC_COMBINED_OUTPUTS, SOLC_COMMAND, SOLC_VERSION_PREFIX},
    errors::ScriptError,
    types::ContractArtifact,
    utils::command_output_or,
};

/// The output of `solc --combined-json`
#[derive(Deserialize)]
struct CombinedJson {
    /// The compiled contracts, keyed by `<source>:<name>`
    contracts: BTreeMap<String, CombinedContract>,
}

/// A single contract in the output of `solc --combined-json`
#[derive(Deserialize)]
struct CombinedContract {
    /// The ABI, either inline or as a JSON-encoded string on older compilers
    abi: Value,
    /// The hex creation bytecode, without a `0x` prefix
    #[serde(default)]
    bin: String,
    /// The hex runtime bytecode, without a `0x` prefix
    #[serde(default, rename = "bin-runtime")]
    bin_runtime: String,
}

/// Extract the `MAJOR.MINOR.PATCH` version from the output of `solc --version`
pub fn parse_solc_version(output: &str) -> Option<String> {
    let line = output
        .lines()
        .find_map(|line| line.trim().strip_prefix(SOLC_VERSION_PREFIX))?;
    let version = line.split(['+', '-']).next()?.trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// Check that the locally available `solc` matches the configured version
pub fn check_solc_version(config: &ProjectConfig) -> Result<(), ScriptError> {
    let mut cmd = Command::new(SOLC_COMMAND);
    cmd.arg("--version");
    let output = command_output_or(cmd, "Failed to query solc version")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let found = parse_solc_version(&stdout).ok_or_else(|| {
        ScriptError::ContractCompilation("could not parse `solc --version` output".to_string())
    })?;

    if found != config.solidity {
        return Err(ScriptError::ContractCompilation(format!(
            "solc {found} found, but the project requires {}",
            config.solidity
        )));
    }

    Ok(())
}

/// Build the `solc` invocation compiling the given sources
pub fn solc_command(config: &ProjectConfig, sources: &[PathBuf]) -> Command {
    let mut cmd = Command::new(SOLC_COMMAND);
    cmd.args(&config.remappings);
    cmd.arg("--combined-json");
    cmd.arg(SOLC_COMBINED_OUTPUTS);
    cmd.args(sources);
    cmd
}

/// Compile the given sources, returning an artifact per contract
pub fn compile_sources(
    config: &ProjectConfig,
    sources: &[PathBuf],
) -> Result<Vec<ContractArtifact>, ScriptError> {
    let output = command_output_or(solc_command(config, sources), "Failed to compile contracts")?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_combined_json(&stdout)
}

/// Parse the output of `solc --combined-json` into artifacts
pub fn parse_combined_json(output: &str) -> Result<Vec<ContractArtifact>, ScriptError> {
    let combined: CombinedJson =
        serde_json::from_str(output).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    combined
        .contracts
        .into_iter()
        .map(|(key, contract)| {
            let (source_name, contract_name) = key.rsplit_once(':').ok_or_else(|| {
                ScriptError::ArtifactParsing(format!("malformed contract key `{key}`"))
            })?;

            let abi: JsonAbi = match contract.abi {
                Value::String(s) => serde_json::from_str::<JsonAbi>(&s),
                other => serde_json::from_value::<JsonAbi>(other),
            }
            .map_err(|e| ScriptError::ArtifactParsing(format!("{key}: {e}")))?;

            Ok(ContractArtifact {
                format: ARTIFACT_FORMAT.to_string(),
                contract_name: contract_name.to_string(),
                source_name: source_name.to_string(),
                abi,
                bytecode: parse_hex(&key, &contract.bin)?,
                deployed_bytecode: parse_hex(&key, &contract.bin_runtime)?,
            })
        })
        .collect()
}

/// Parse hex bytecode, which may be unlinked if the contract uses libraries
fn parse_hex(key: &str, hex: &str) -> Result<Bytes, ScriptError> {
    alloy::hex::decode(hex)
        .map(Bytes::from)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{key} bytecode: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_release_version() {
        let output = "solc, the solidity compiler commandline interface\n\
                      Version: 0.8.19+commit.7dd6d404.Linux.g++\n";
        assert_eq!(parse_solc_version(output).as_deref(), Some("0.8.19"));
    }

    #[test]
    fn parses_prerelease_version() {
        let output = "Version: 0.8.20-develop.2023.4.1+commit.abcdef\n";
        assert_eq!(parse_solc_version(output).as_deref(), Some("0.8.20"));
    }

    #[test]
    fn unrecognized_version_output() {
        assert_eq!(parse_solc_version("command not found"), None);
    }

    #[test]
    fn command_passes_remappings_before_sources() {
        let config = ProjectConfig {
            remappings: vec!["@openzeppelin/=node_modules/@openzeppelin/".to_string()],
            ..Default::default()
        };
        let cmd = solc_command(&config, &[PathBuf::from("contracts/MyERC20.sol")]);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(
            args,
            vec![
                "@openzeppelin/=node_modules/@openzeppelin/",
                "--combined-json",
                "abi,bin,bin-runtime",
                "contracts/MyERC20.sol",
            ]
        );
    }

    #[test]
    fn parses_combined_json_with_inline_and_string_abis() {
        let output = r#"{
            "contracts": {
                "contracts/MyERC20.sol:MyERC20": {
                    "abi": [{ "type": "function", "name": "totalSupply", "inputs": [],
                              "outputs": [{ "name": "", "type": "uint256" }],
                              "stateMutability": "view" }],
                    "bin": "6080",
                    "bin-runtime": "60"
                },
                "contracts/IERC20.sol:IERC20": {
                    "abi": "[]",
                    "bin": "",
                    "bin-runtime": ""
                }
            },
            "version": "0.8.19+commit.7dd6d404.Linux.g++"
        }"#;

        let artifacts = parse_combined_json(output).unwrap();
        assert_eq!(artifacts.len(), 2);

        let interface = &artifacts[0];
        assert_eq!(interface.contract_name, "IERC20");
        assert!(interface.bytecode.is_empty());

        let token = &artifacts[1];
        assert_eq!(token.contract_name, "MyERC20");
        assert_eq!(token.source_name, "contracts/MyERC20.sol");
        assert_eq!(token.bytecode, Bytes::from(vec![0x60, 0x80]));
        assert_eq!(token.deployed_bytecode, Bytes::from(vec![0x60]));
        assert!(token.abi.function("totalSupply").is_some());
    }

    #[test]
    fn malformed_key_is_an_error() {
        let output = r#"{ "contracts": { "MyERC20": { "abi": [], "bin": "" } } }"#;
        assert!(matches!(parse_combined_json(output), Err(ScriptError::ArtifactParsing(_))));
    }
}
