//! Utilities for the deploy scripts.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    str::FromStr,
};

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    constants::{DEBUG_ARTIFACT_SUFFIX, DEPLOYMENTS_KEY, JSON_EXTENSION},
    errors::ScriptError,
    types::ContractArtifact,
};

/// Sets up the client with which to deploy contracts, signing with the given
/// private key and sending transactions to the given RPC url.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<DynProvider<Ethereum>, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer_address = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    info!("connected to chain {chain_id} as {deployer_address}");

    Ok(DynProvider::new(provider))
}

// -------------
// | Artifacts |
// -------------

/// Recursively collect the files under `dir` with the given extension,
/// in sorted order
pub fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ScriptError> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry.map_err(|e| ScriptError::ReadFile(e.to_string()))?.path();
        if path.is_dir() {
            files.extend(collect_files(&path, extension)?);
        } else if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Collect every contract artifact file under the artifacts directory
pub fn collect_artifact_files(artifacts_dir: &Path) -> Result<Vec<PathBuf>, ScriptError> {
    let files = collect_files(artifacts_dir, JSON_EXTENSION)?;
    Ok(files
        .into_iter()
        .filter(|path| {
            !path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(DEBUG_ARTIFACT_SUFFIX))
        })
        .collect())
}

/// Read and parse the artifact at the given path
pub fn read_artifact(path: &Path) -> Result<ContractArtifact, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))
}

/// Expand an external artifact entry into the files it names.
///
/// `*` and `?` wildcards are allowed in the file name, e.g.
/// `externalArtifacts/*.json`; an entry without wildcards names one file.
pub fn expand_artifact_pattern(pattern: &Path) -> Result<Vec<PathBuf>, ScriptError> {
    let file_pattern = pattern.file_name().map(|name| name.to_string_lossy().into_owned());
    let Some(file_pattern) = file_pattern.filter(|name| name.contains(&['*', '?'][..])) else {
        return Ok(vec![pattern.to_path_buf()]);
    };

    let dir = match pattern.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if dir.to_string_lossy().contains(&['*', '?'][..]) {
        return Err(ScriptError::Config(format!(
            "`{}`: wildcards are only supported in the file name",
            pattern.display()
        )));
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ScriptError::ReadFile(e.to_string()))?.path();
        let matched = path
            .file_name()
            .is_some_and(|name| wildcard_match(&file_pattern, &name.to_string_lossy()));
        if matched && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Whether `name` matches `pattern`, where `*` matches any run of characters
/// and `?` any single character
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    // Backtrack to the last `*` on a mismatch
    let (mut p, mut n) = (0, 0);
    let mut last_star: Option<(usize, usize)> = None;
    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                last_star = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match last_star {
                Some((star_p, star_n)) => {
                    p = star_p + 1;
                    n = star_n + 1;
                    last_star = Some((star_p, star_n + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Find and parse the artifact of the named contract in the artifacts directory
pub fn find_artifact(artifacts_dir: &Path, contract: &str) -> Result<ContractArtifact, ScriptError> {
    if !artifacts_dir.exists() {
        return Err(ScriptError::ArtifactParsing(format!(
            "artifacts directory {} does not exist, have the contracts been compiled?",
            artifacts_dir.display()
        )));
    }

    let file_name = format!("{contract}.{JSON_EXTENSION}");
    let path = collect_artifact_files(artifacts_dir)?
        .into_iter()
        .find(|path| path.file_name().is_some_and(|name| name == file_name.as_str()))
        .ok_or_else(|| {
            ScriptError::ArtifactParsing(format!(
                "no artifact for `{contract}` under {}, have the contracts been compiled?",
                artifacts_dir.display()
            ))
        })?;

    let artifact = read_artifact(&path)?;
    if artifact.contract_name != contract {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} holds `{}`, expected `{contract}`",
            path.display(),
            artifact.contract_name
        )));
    }

    Ok(artifact)
}

/// Write the artifact to `<artifacts_dir>/<source_name>/<contract_name>.json`,
/// returning the path written
pub fn write_artifact(
    artifacts_dir: &Path,
    artifact: &ContractArtifact,
) -> Result<PathBuf, ScriptError> {
    let dir = artifacts_dir.join(&artifact.source_name);
    fs::create_dir_all(&dir).map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    let path = dir.join(format!("{}.{JSON_EXTENSION}", artifact.contract_name));
    let contents =
        serde_json::to_string_pretty(artifact).map_err(|e| ScriptError::Serde(e.to_string()))?;
    fs::write(&path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    Ok(path)
}

// ---------------
// | Deployments |
// ---------------

/// Read the deployments record file, returning an empty record if it
/// does not exist
fn read_deployments(file_path: &Path) -> Result<Value, ScriptError> {
    if !file_path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadFile(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Record the deployed address under the given key, creating the
/// deployments record file if needed
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut deployments = read_deployments(file_path)?;
    if !deployments.is_object() {
        return Err(ScriptError::Serde("deployments file is not a JSON object".to_string()));
    }

    if !deployments[DEPLOYMENTS_KEY].is_object() {
        deployments[DEPLOYMENTS_KEY] = Value::Object(Map::new());
    }
    deployments[DEPLOYMENTS_KEY][contract_key] = Value::String(format!("{address:#x}"));

    let contents = serde_json::to_string_pretty(&deployments)
        .map_err(|e| ScriptError::Serde(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))
}

// ------------
// | Commands |
// ------------

/// Run the command to completion, capturing its stdout and forwarding its
/// stderr, and fail with the given message if it does not succeed
pub fn command_output_or(mut cmd: Command, err_msg: &str) -> Result<Output, ScriptError> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
    let output = cmd
        .output()
        .map_err(|e| ScriptError::ContractCompilation(format!("{err_msg}: {e}")))?;

    if !output.status.success() {
        return Err(ScriptError::ContractCompilation(format!(
            "{err_msg}: exited with {}",
            output.status
        )));
    }

    Ok(output)
}
